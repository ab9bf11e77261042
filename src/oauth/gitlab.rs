//! GitLab OAuth token exchange (JSON body).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::{check_status, describe_error, OAuthExchanger, TokenRequest};
use crate::bridge::RawClient;
use crate::error::{GardenError, GardenResult};
use crate::types::Platform;

pub const GITLAB_TOKEN_URL: &str = "https://gitlab.com/oauth/token";

#[derive(Debug, Deserialize)]
struct GitLabTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

pub struct GitLabExchanger {
    raw: Arc<dyn RawClient>,
    token_url: String,
}

impl GitLabExchanger {
    pub fn new(raw: Arc<dyn RawClient>) -> Self {
        Self::with_token_url(raw, GITLAB_TOKEN_URL)
    }

    /// Custom token endpoint (self-hosted GitLab)
    pub fn with_token_url(raw: Arc<dyn RawClient>, token_url: impl Into<String>) -> Self {
        Self { raw, token_url: token_url.into() }
    }
}

#[async_trait]
impl OAuthExchanger for GitLabExchanger {
    fn platform(&self) -> Platform {
        Platform::GitLab
    }

    async fn exchange_token(&self, request: &TokenRequest) -> GardenResult<String> {
        info!(platform = %Platform::GitLab, client_id = %request.client_id, "exchanging authorization code");

        let body = json!({
            "client_id": request.client_id,
            "client_secret": request.client_secret,
            "code": request.authorization_code,
            "grant_type": "authorization_code",
            "redirect_uri": request.redirect_uri,
        });
        let response = self.raw.post_json(&self.token_url, &body).await?;
        check_status(Platform::GitLab, &response)?;

        let envelope: GitLabTokenResponse = serde_json::from_slice(&response.body).map_err(|e| {
            GardenError::exchange(Platform::GitLab, format!("unreadable token response: {e}"))
        })?;

        if let Some(token) = envelope.access_token.filter(|t| !t.is_empty()) {
            info!(platform = %Platform::GitLab, "authorization code exchanged");
            return Ok(token);
        }

        let reason = describe_error(envelope.error, envelope.error_description);
        warn!(platform = %Platform::GitLab, %reason, "token exchange rejected");
        Err(GardenError::exchange(Platform::GitLab, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{MockCall, MockRawClient};
    use crate::config::OAuthCredentials;

    fn request() -> TokenRequest {
        let credentials = OAuthCredentials {
            client_id: "app-id".into(),
            client_secret: "app-secret".into(),
        };
        TokenRequest::new(Platform::GitLab, "gl-code", "https://app.example/gitlab", &credentials)
    }

    #[tokio::test]
    async fn test_exchange_posts_json_with_grant_type() {
        let mock = MockRawClient::new().with_json(
            GITLAB_TOKEN_URL,
            200,
            json!({
                "access_token": "de6780bc506a0446309bd9362820ba8aed28aa506c71eedbe1c5c4f9dd350e54",
                "token_type": "bearer",
                "expires_in": 7200,
                "refresh_token": "8257e65c97202ed1726cf9571600918f3bffb2544b26e00a61df9897668c33a1",
                "created_at": 1_607_635_748
            }),
        );
        let exchanger = GitLabExchanger::new(Arc::new(mock.clone()));

        let token = exchanger.exchange_token(&request()).await.unwrap();
        assert_eq!(token, "de6780bc506a0446309bd9362820ba8aed28aa506c71eedbe1c5c4f9dd350e54");

        match &mock.calls()[0] {
            MockCall::PostJson { url, body } => {
                assert_eq!(url, GITLAB_TOKEN_URL);
                assert_eq!(body["grant_type"], "authorization_code");
                assert_eq!(body["code"], "gl-code");
                assert_eq!(body["client_id"], "app-id");
                assert_eq!(body["redirect_uri"], "https://app.example/gitlab");
            }
            other => panic!("expected JSON post, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exchange_invalid_grant() {
        let mock = MockRawClient::new().with_json(
            GITLAB_TOKEN_URL,
            400,
            json!({"error": "invalid_grant", "error_description": "The provided authorization grant is invalid"}),
        );
        let exchanger = GitLabExchanger::new(Arc::new(mock));

        let err = exchanger.exchange_token(&request()).await.unwrap_err();
        match err {
            GardenError::TokenExchangeFailed { platform, reason } => {
                assert_eq!(platform, Platform::GitLab);
                assert!(reason.contains("400"));
                assert!(reason.contains("invalid_grant"));
            }
            other => panic!("expected TokenExchangeFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exchange_empty_token() {
        let mock = MockRawClient::new().with_json(GITLAB_TOKEN_URL, 200, json!({"access_token": ""}));
        let exchanger = GitLabExchanger::new(Arc::new(mock));

        let err = exchanger.exchange_token(&request()).await.unwrap_err();
        assert!(matches!(err, GardenError::TokenExchangeFailed { .. }));
    }

    #[tokio::test]
    async fn test_custom_token_url() {
        let url = "https://gitlab.example.com/oauth/token";
        let mock = MockRawClient::new().with_json(url, 200, json!({"access_token": "t"}));
        let exchanger = GitLabExchanger::with_token_url(Arc::new(mock.clone()), url);

        assert_eq!(exchanger.exchange_token(&request()).await.unwrap(), "t");
        assert_eq!(mock.calls()[0].url(), url);
    }
}
