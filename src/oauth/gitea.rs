//! Gitea OAuth2 token exchange

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::{check_status, describe_error, OAuthExchanger, TokenRequest};
use crate::bridge::RawClient;
use crate::error::{GardenError, GardenResult};
use crate::types::Platform;

pub const GITEA_TOKEN_URL: &str = "https://gitea.com/login/oauth/access_token";

#[derive(Debug, Deserialize)]
struct GiteaTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

pub struct GiteaExchanger {
    raw: Arc<dyn RawClient>,
    token_url: String,
}

impl GiteaExchanger {
    pub fn new(raw: Arc<dyn RawClient>) -> Self {
        Self::with_token_url(raw, GITEA_TOKEN_URL)
    }

    pub fn with_token_url(raw: Arc<dyn RawClient>, token_url: impl Into<String>) -> Self {
        Self { raw, token_url: token_url.into() }
    }
}

#[async_trait]
impl OAuthExchanger for GiteaExchanger {
    fn platform(&self) -> Platform {
        Platform::Gitea
    }

    async fn exchange_token(&self, request: &TokenRequest) -> GardenResult<String> {
        info!(platform = %Platform::Gitea, client_id = %request.client_id, "exchanging authorization code");

        let fields = [
            ("grant_type", "authorization_code"),
            ("client_id", request.client_id.as_str()),
            ("client_secret", request.client_secret.as_str()),
            ("code", request.authorization_code.as_str()),
            ("redirect_uri", request.redirect_uri.as_str()),
        ];
        let response = self.raw.post_form(&self.token_url, &fields).await?;
        check_status(Platform::Gitea, &response)?;

        let envelope: GiteaTokenResponse = serde_json::from_slice(&response.body).map_err(|e| {
            GardenError::exchange(Platform::Gitea, format!("unreadable token response: {e}"))
        })?;

        match envelope.access_token.filter(|t| !t.is_empty()) {
            Some(token) => Ok(token),
            None => {
                let reason = describe_error(envelope.error, envelope.error_description);
                warn!(platform = %Platform::Gitea, %reason, "token exchange rejected");
                Err(GardenError::exchange(Platform::Gitea, reason))
            }
        }
    }
}
