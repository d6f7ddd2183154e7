//! HTTP transport seam.
//!
//! # Responsibilities
//! - Execute exactly one HTTP exchange per call
//! - Hand back status, headers and body text without interpreting them
//!
//! # Design Decisions
//! - The trait is the only thing the client knows about the network, so
//!   tests can script responses without sockets
//! - Connection-level failures become `ClientError::Transport`; status codes
//!   are left to the classifier

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use url::Url;

use crate::config::ClientConfig;
use crate::http::request::ApiRequest;
use crate::http::types::{ClientError, ClientResult};

/// Raw outcome of one HTTP exchange.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes a single request against the upstream API.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> ClientResult<RawResponse>;
}

/// Production transport backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl ReqwestTransport {
    /// Build a transport from client configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url: Url = config.base_url.parse().map_err(|e| {
            ClientError::Config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> ClientResult<RawResponse> {
        let url = self.endpoint_url(&request.endpoint);
        let mut query = request.query_pairs();
        if let Some(key) = &self.api_key {
            query.push(("api_key".to_string(), key.clone()));
        }

        tracing::debug!(url = %url, params = query.len(), "Sending upstream request");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read body: {}", e)))?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ClientConfig {
        ClientConfig {
            base_url: base_url.to_string(),
            api_key: Some("secret".to_string()),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        let transport = ReqwestTransport::new(&config("https://libraries.io/api/")).unwrap();
        assert_eq!(
            transport.endpoint_url("/platforms"),
            "https://libraries.io/api/platforms"
        );
        assert_eq!(
            transport.endpoint_url("cargo/serde"),
            "https://libraries.io/api/cargo/serde"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ReqwestTransport::new(&config("::not a url")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let transport = ReqwestTransport::new(&config("https://libraries.io/api")).unwrap();
        let rendered = format!("{:?}", transport);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_raw_response_success() {
        assert!(RawResponse::new(200, "{}").is_success());
        assert!(!RawResponse::new(404, "").is_success());
    }
}
