//! RawClient trait and its reqwest implementation
//!
//! A `RawClient` performs outbound HTTP calls and hands back the status and
//! body untouched. Interpreting the payload is the job of the adapters and
//! exchangers layered on top.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::{GardenError, GardenResult};

/// Default per-request timeout for outbound calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Anything outside 200..=299 is a failure
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Body as text, for error messages
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Outbound HTTP capability consumed by adapters' callers and exchangers
#[async_trait]
pub trait RawClient: Send + Sync {
    /// GET `url` with the given `Authorization` header value
    async fn get(&self, url: &str, authorization: &str) -> GardenResult<RawResponse>;

    /// POST `fields` as `application/x-www-form-urlencoded`
    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> GardenResult<RawResponse>;

    /// POST `body` as `application/json`
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> GardenResult<RawResponse>;
}

/// reqwest-backed `RawClient`
///
/// Every request asks for JSON; GitHub's token endpoint answers form-encoded
/// otherwise.
pub struct HttpRawClient {
    client: reqwest::Client,
}

impl HttpRawClient {
    pub fn new() -> GardenResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> GardenResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent("devgarden")
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    async fn read(response: reqwest::Response) -> GardenResult<RawResponse> {
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl RawClient for HttpRawClient {
    async fn get(&self, url: &str, authorization: &str) -> GardenResult<RawResponse> {
        let mut auth = HeaderValue::from_str(authorization).map_err(|_| {
            GardenError::Config("authorization header contains invalid characters".into())
        })?;
        auth.set_sensitive(true);

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(transport_error)?;

        Self::read(response).await
    }

    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> GardenResult<RawResponse> {
        let response = self
            .client
            .post(url)
            .form(fields)
            .send()
            .await
            .map_err(transport_error)?;

        Self::read(response).await
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> GardenResult<RawResponse> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        Self::read(response).await
    }
}

/// Timeouts surface as cancellation; everything else is a network fault.
fn transport_error(err: reqwest::Error) -> GardenError {
    if err.is_timeout() {
        GardenError::Cancelled
    } else {
        GardenError::Network(err)
    }
}

/// Run `fut` unless `cancel` fires first.
///
/// On cancellation the in-flight future is dropped, which aborts the
/// underlying request, and `GardenError::Cancelled` is returned.
pub async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> GardenResult<T>
where
    F: Future<Output = GardenResult<T>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(GardenError::Cancelled),
        result = fut => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(RawResponse::new(299, "").is_success());
        assert!(!RawResponse::new(199, "").is_success());
        assert!(!RawResponse::new(301, "").is_success());
        assert!(!RawResponse::new(404, "").is_success());
    }

    #[test]
    fn test_text_lossy() {
        let response = RawResponse::new(500, b"oops \xff".to_vec());
        assert!(response.text_lossy().starts_with("oops "));
    }

    #[tokio::test]
    async fn test_cancellable_passes_result_through() {
        let cancel = CancellationToken::new();
        let value = cancellable(&cancel, async { Ok::<_, GardenError>(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_cancellable_already_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = cancellable(&cancel, async { Ok::<_, GardenError>(1) }).await;
        assert!(matches!(result, Err(GardenError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancellable_mid_flight() {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let result: GardenResult<()> = cancellable(&cancel, std::future::pending()).await;
        assert!(matches!(result, Err(GardenError::Cancelled)));
    }

    #[tokio::test]
    async fn test_get_rejects_invalid_header() {
        let client = HttpRawClient::new().unwrap();
        let result = client.get("http://127.0.0.1:9/", "Bearer bad\ntoken").await;
        assert!(matches!(result, Err(GardenError::Config(_))));
    }
}
