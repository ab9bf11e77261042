//! Mock RawClient implementation for testing
//!
//! Serves canned responses keyed by URL and records every call, so adapters,
//! exchangers and the dispatcher can be exercised without network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{GardenError, GardenResult};

use super::raw_client::{RawClient, RawResponse};

/// Record of a call made to the mock client
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Get { url: String, authorization: String },
    PostForm { url: String, fields: Vec<(String, String)> },
    PostJson { url: String, body: serde_json::Value },
}

impl MockCall {
    pub fn url(&self) -> &str {
        match self {
            MockCall::Get { url, .. }
            | MockCall::PostForm { url, .. }
            | MockCall::PostJson { url, .. } => url,
        }
    }
}

#[derive(Default)]
struct MockState {
    responses: HashMap<String, RawResponse>,
    hang: bool,
}

/// A mock implementation of RawClient for testing purposes
///
/// Unknown URLs answer 404 with an empty JSON object.
#[derive(Clone, Default)]
pub struct MockRawClient {
    state: Arc<Mutex<MockState>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockRawClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `status` and a JSON body
    pub fn with_json(self, url: &str, status: u16, body: serde_json::Value) -> Self {
        self.with_raw(url, status, body.to_string())
    }

    /// Answer `url` with `status` and a verbatim body
    pub fn with_raw(self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(url.to_string(), RawResponse::new(status, body));
        self
    }

    /// Never complete any request, for cancellation tests
    pub fn hanging(self) -> Self {
        self.state.lock().unwrap().hang = true;
        self
    }

    /// Get all calls made to this mock
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    async fn respond(&self, call: MockCall) -> GardenResult<RawResponse> {
        let url = call.url().to_string();
        self.call_log.lock().unwrap().push(call);

        let (hang, response) = {
            let state = self.state.lock().unwrap();
            (state.hang, state.responses.get(&url).cloned())
        };

        if hang {
            std::future::pending::<()>().await;
            return Err(GardenError::Cancelled);
        }

        Ok(response.unwrap_or_else(|| RawResponse::new(404, "{}")))
    }
}

#[async_trait]
impl RawClient for MockRawClient {
    async fn get(&self, url: &str, authorization: &str) -> GardenResult<RawResponse> {
        self.respond(MockCall::Get {
            url: url.to_string(),
            authorization: authorization.to_string(),
        })
        .await
    }

    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> GardenResult<RawResponse> {
        self.respond(MockCall::PostForm {
            url: url.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        })
        .await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> GardenResult<RawResponse> {
        self.respond(MockCall::PostJson {
            url: url.to_string(),
            body: body.clone(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_canned_response_and_log() {
        let mock = MockRawClient::new().with_json("https://x/a", 200, serde_json::json!([1]));

        let response = mock.get("https://x/a", "Bearer t").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"[1]");

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            MockCall::Get {
                url: "https://x/a".into(),
                authorization: "Bearer t".into()
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_url_is_404() {
        let mock = MockRawClient::new();
        let response = mock.post_form("https://x/missing", &[("a", "b")]).await.unwrap();
        assert_eq!(response.status, 404);
    }
}
