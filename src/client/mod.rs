//! Backend REST API Client
//!
//! HTTP client for the platform's REST API. Every request carries a fresh
//! `x-request-id` and, when the token provider has one, a bearer token.
//! Responses are unwrapped from the `{"data": ...}` envelope.
//!
//! Endpoint groups live in their own files:
//! - `posts`: feed, posts, comments, likes
//! - `humidors`: humidors and their cigars
//! - `reviews`: reviews
//! - `profile`: profiles, image upload, health

mod error;
mod humidors;
mod posts;
mod profile;
mod reviews;

pub use error::{ApiError, ApiResult};
pub use profile::{HealthStatus, MAX_UPLOAD_BYTES};
pub use reviews::MAX_RATING;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{StaticToken, TokenProvider};
use crate::models::{Envelope, Page};

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Configuration for the REST client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the API prefix (e.g., "http://localhost:8090/api/v1")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090/api/v1".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// REST API client
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Arc<ClientConfig>,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Create a client that sends no credentials
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Self::with_tokens(config, Arc::new(StaticToken::anonymous()))
    }

    /// Create a client that asks `tokens` for a bearer token on every request
    pub fn with_tokens(config: ClientConfig, tokens: Arc<dyn TokenProvider>) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("smokering/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        let mut config = config;
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            config: Arc::new(config),
            tokens,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Start a request with auth and correlation headers applied
    pub(crate) async fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut builder = self
            .client
            .request(method.clone(), self.url(path))
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(token) = self.tokens.access_token().await? {
            builder = builder.bearer_auth(token);
        }

        tracing::debug!(%method, path, request_id = %request_id, "API request");
        Ok(builder)
    }

    /// Send and hand back the response if its status is a success
    pub(crate) async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), &body);
        if matches!(err, ApiError::Unauthorized(_)) {
            self.tokens.invalidate().await;
        }
        tracing::warn!(status = status.as_u16(), error = %err, "API request failed");
        Err(err)
    }

    /// Send and unwrap a `{"data": ...}` body
    pub(crate) async fn send_data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.send(builder).await?;
        let envelope: Envelope<T> = response.json().await.map_err(ApiError::from_transport)?;
        Ok(envelope.data)
    }

    /// Send and decode a paged listing
    pub(crate) async fn send_page<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<Page<T>> {
        let response = self.send(builder).await?;
        response.json().await.map_err(ApiError::from_transport)
    }

    /// Send and ignore the body (deletes answer 204)
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> ApiResult<()> {
        self.send(builder).await.map(|_| ())
    }

    pub(crate) async fn get_data<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let builder = self.request(Method::GET, path).await?;
        self.send_data(builder).await
    }

    pub(crate) async fn post_data<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let builder = self.request(Method::POST, path).await?.json(body);
        self.send_data(builder).await
    }

    pub(crate) async fn patch_data<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let builder = self.request(Method::PATCH, path).await?.json(body);
        self.send_data(builder).await
    }

    pub(crate) async fn delete(&self, path: &str) -> ApiResult<()> {
        let builder = self.request(Method::DELETE, path).await?;
        self.send_empty(builder).await
    }
}

/// Percent-encode an id for use as a path segment
pub(crate) fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8090/api/v1");
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = ApiClient::new(ClientConfig::new("http://api.example/api/v1/")).unwrap();
        assert_eq!(client.url("/posts"), "http://api.example/api/v1/posts");
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("p 1/2"), "p%201%2F2");
        assert_eq!(segment("abc"), "abc");
    }
}
