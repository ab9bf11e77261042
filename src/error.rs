use thiserror::Error;

use crate::types::Platform;

/// Boxed cause carried by mapping failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum GardenError {
    /// The response body is not JSON, or not the list/object shape the
    /// extraction expects.
    #[error("Malformed {what} payload: {source}")]
    MalformedPayload {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An element decoded as JSON but could not be mapped into the canonical model.
    #[error("Failed to map {what}: {source}")]
    UnexpectedMappingFailure {
        what: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Token exchange with {platform} failed: {reason}")]
    TokenExchangeFailed { platform: Platform, reason: String },

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("{platform} API error {status}: {body}")]
    Upstream {
        platform: Platform,
        status: u16,
        body: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("No {platform} token stored for user {user_id}")]
    TokenNotFound { user_id: i64, platform: Platform },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GardenError {
    pub(crate) fn malformed(what: &'static str, source: serde_json::Error) -> Self {
        Self::MalformedPayload { what, source }
    }

    pub(crate) fn mapping(what: &'static str, source: impl Into<BoxError>) -> Self {
        Self::UnexpectedMappingFailure {
            what,
            source: source.into(),
        }
    }

    pub(crate) fn exchange(platform: Platform, reason: impl Into<String>) -> Self {
        Self::TokenExchangeFailed {
            platform,
            reason: reason.into(),
        }
    }

    /// Whether the fault lies with the remote platform rather than the caller.
    ///
    /// Controllers typically answer these with a 502-style status.
    pub fn is_upstream_fault(&self) -> bool {
        matches!(
            self,
            Self::MalformedPayload { .. }
                | Self::UnexpectedMappingFailure { .. }
                | Self::Upstream { .. }
                | Self::Network(_)
        )
    }
}

pub type GardenResult<T> = std::result::Result<T, GardenError>;
