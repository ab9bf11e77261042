//! OAuth authorization-code exchange for all platforms.
//!
//! Every platform issues access tokens from its own endpoint, with its own
//! body encoding and its own response envelope:
//!
//! | Platform | Body | Endpoint                                  |
//! |----------|------|-------------------------------------------|
//! | GitHub   | form | `https://github.com/login/oauth/access_token` |
//! | GitLab   | JSON | `https://gitlab.com/oauth/token`          |
//! | Gitea    | form | `https://gitea.com/login/oauth/access_token`  |
//!
//! An [`OAuthExchanger`] hides those differences behind one call, and the
//! [`OAuthExchangerFactory`] is the single place a platform name turns into
//! an exchanger. Exchanges are never retried: authorization codes are
//! single-use.

mod factory;
pub mod gitea;
pub mod github;
pub mod gitlab;

use async_trait::async_trait;
use std::fmt;

use crate::bridge::RawResponse;
use crate::config::OAuthCredentials;
use crate::error::{GardenError, GardenResult};
use crate::types::Platform;

pub use factory::OAuthExchangerFactory;
pub use gitea::GiteaExchanger;
pub use github::GitHubExchanger;
pub use gitlab::GitLabExchanger;

/// Everything needed to redeem one authorization code
#[derive(Clone)]
pub struct TokenRequest {
    pub platform: Platform,
    pub authorization_code: String,
    pub redirect_uri: String,
    pub client_id: String,
    pub client_secret: String,
}

impl TokenRequest {
    pub fn new(
        platform: Platform,
        authorization_code: impl Into<String>,
        redirect_uri: impl Into<String>,
        credentials: &OAuthCredentials,
    ) -> Self {
        Self {
            platform,
            authorization_code: authorization_code.into(),
            redirect_uri: redirect_uri.into(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
        }
    }
}

impl fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequest")
            .field("platform", &self.platform)
            .field("authorization_code", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

/// Turns an authorization code into an access token for one platform
#[async_trait]
pub trait OAuthExchanger: Send + Sync {
    fn platform(&self) -> Platform;

    async fn exchange_token(&self, request: &TokenRequest) -> GardenResult<String>;
}

/// Non-2xx token endpoint response as `TokenExchangeFailed`
pub(crate) fn check_status(platform: Platform, response: &RawResponse) -> GardenResult<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(GardenError::exchange(
        platform,
        format!("token endpoint returned {}: {}", response.status, response.text_lossy()),
    ))
}

/// Reason text from an OAuth error envelope (`error` + `error_description`)
pub(crate) fn describe_error(error: Option<String>, description: Option<String>) -> String {
    match (error, description) {
        (Some(error), Some(description)) => format!("{error}: {description}"),
        (Some(error), None) => error,
        (None, Some(description)) => description,
        (None, None) => "response has no access_token".to_string(),
    }
}
