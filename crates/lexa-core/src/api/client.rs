use std::pin::Pin;

use futures_util::Stream;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{ApiError, ApiResult};
use super::sse::{SseParser, StreamEvent};
use super::types::{
    AdviseRequest, AdviseResponse, AnalyzeRequest, AnalyzeResponse, DraftRequest, DraftResponse,
    HealthStatus,
};
use crate::config::Config;

/// Production backend base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.lexa.legal";
/// Static API key header attached to every request.
const API_KEY_HEADER: &str = "x-api-key";

/// A stream of events from one of the streaming endpoints.
pub type EventStream = Pin<Box<dyn Stream<Item = ApiResult<StreamEvent>> + Send>>;

/// Lexa backend API client.
pub struct ApiClient {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a new client for the given base URL and API key.
    ///
    /// # Panics
    /// - In test builds (`#[cfg(test)]`), panics if `base_url` is the production API.
    /// - At runtime, panics if `LEXA_BLOCK_REAL_API=1` and `base_url` is the production API.
    ///
    /// This prevents tests from accidentally making real network requests.
    /// Use the `LEXA_BASE_URL` env var or config to point to a mock server.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into();

        // Compile-time guard for unit tests
        #[cfg(test)]
        if base_url == DEFAULT_BASE_URL {
            panic!(
                "Tests must not use the production Lexa API!\n\
                 Set LEXA_BASE_URL to a mock server (e.g., wiremock).\n\
                 Found base_url: {base_url}"
            );
        }

        // Runtime guard for integration tests (set LEXA_BLOCK_REAL_API=1 in test harness)
        #[cfg(not(test))]
        if std::env::var("LEXA_BLOCK_REAL_API").is_ok_and(|v| v == "1")
            && base_url == DEFAULT_BASE_URL
        {
            panic!(
                "LEXA_BLOCK_REAL_API=1 but trying to use the production Lexa API!\n\
                 Set LEXA_BASE_URL to a mock server.\n\
                 Found base_url: {base_url}"
            );
        }

        Self {
            base_url,
            api_key,
            http: reqwest::Client::new(),
        }
    }

    /// Creates a client from configuration (env overrides applied).
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.effective_base_url(), config.effective_api_key())
    }

    /// Builds a request for `path` with the default headers attached.
    ///
    /// Callers may add headers on top; the defaults are only overridden
    /// when set explicitly.
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .http
            .request(method, url)
            .header("accept", "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        builder
    }

    /// Sends a request and normalizes failures.
    ///
    /// Transport failures become `ApiErrorKind::Transport`; non-success
    /// statuses read the body and become `ApiErrorKind::HttpStatus` with
    /// the backend's message/code extracted when the body is JSON.
    async fn send_checked(
        &self,
        path: &str,
        builder: reqwest::RequestBuilder,
    ) -> ApiResult<reqwest::Response> {
        tracing::debug!(path, "sending request");
        let response = builder.send().await.map_err(|e| ApiError::transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::http_status(status.as_u16(), &body);
            tracing::warn!(path, status = status.as_u16(), "request failed");
            return Err(err);
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.send_checked(path, self.request(Method::GET, path)).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::parse(format!("Failed to decode response from {path}: {e}")))
    }

    /// JSON POST convenience: serializes the payload and fixes the method
    /// and content type.
    async fn post_json<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send_checked(path, self.request(Method::POST, path).json(body))
            .await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::parse(format!("Failed to decode response from {path}: {e}")))
    }

    /// JSON POST against a streaming endpoint; the response body is parsed
    /// as SSE and surfaced as an async stream of events.
    async fn post_stream<B>(&self, path: &str, body: &B) -> ApiResult<EventStream>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .send_checked(path, self.request(Method::POST, path).json(body))
            .await?;
        let byte_stream = response.bytes_stream();
        Ok(Box::pin(SseParser::new(byte_stream)))
    }

    /// Checks backend availability.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.get_json("/v1/health").await
    }

    /// One-shot chat reply.
    pub async fn advise(&self, request: &AdviseRequest<'_>) -> ApiResult<AdviseResponse> {
        self.post_json("/v1/advise", request).await
    }

    /// Streaming chat reply.
    pub async fn advise_stream(&self, request: &AdviseRequest<'_>) -> ApiResult<EventStream> {
        self.post_stream("/v1/advise/stream", request).await
    }

    /// One-shot intake analysis.
    pub async fn analyze(&self, request: &AnalyzeRequest<'_>) -> ApiResult<AnalyzeResponse> {
        self.post_json("/v1/analyze", request).await
    }

    /// Streaming intake analysis.
    pub async fn analyze_stream(&self, request: &AnalyzeRequest<'_>) -> ApiResult<EventStream> {
        self.post_stream("/v1/analyze/stream", request).await
    }

    /// One-shot document draft.
    pub async fn draft(&self, request: &DraftRequest<'_>) -> ApiResult<DraftResponse> {
        self.post_json("/v1/draft", request).await
    }

    /// Streaming document draft.
    pub async fn draft_stream(&self, request: &DraftRequest<'_>) -> ApiResult<EventStream> {
        self.post_stream("/v1/draft/stream", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_attaches_default_headers() {
        let client = ApiClient::new("http://127.0.0.1:9", Some("secret-key".to_string()));
        let request = client
            .request(Method::POST, "/v1/advise")
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "http://127.0.0.1:9/v1/advise");
        assert_eq!(
            request.headers().get("x-api-key").unwrap().to_str().unwrap(),
            "secret-key"
        );
        assert_eq!(
            request.headers().get("accept").unwrap().to_str().unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_request_without_api_key_omits_header() {
        let client = ApiClient::new("http://127.0.0.1:9", None);
        let request = client.request(Method::GET, "/v1/health").build().unwrap();

        assert!(request.headers().get("x-api-key").is_none());
    }

    /// Caller-supplied headers merge with the defaults.
    #[test]
    fn test_request_caller_headers_merge() {
        let client = ApiClient::new("http://127.0.0.1:9", Some("secret-key".to_string()));
        let request = client
            .request(Method::GET, "/v1/health")
            .header("x-request-id", "abc123")
            .build()
            .unwrap();

        assert_eq!(
            request
                .headers()
                .get("x-request-id")
                .unwrap()
                .to_str()
                .unwrap(),
            "abc123"
        );
        assert_eq!(
            request.headers().get("x-api-key").unwrap().to_str().unwrap(),
            "secret-key"
        );
    }

    #[test]
    #[should_panic(expected = "production Lexa API")]
    fn test_production_base_url_rejected_in_tests() {
        let _ = ApiClient::new(DEFAULT_BASE_URL, None);
    }
}
