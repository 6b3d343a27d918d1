//! transport::http
//!
//! HTTP transport for the remote environment service.
//!
//! # Design
//!
//! Wraps a `reqwest` client configured with the API base, the API key
//! (`X-Api-Key` header) and a request timeout. Paths passed to [`Transport`]
//! are appended to the base verbatim.
//!
//! Non-2xx answers become [`TransportError::Status`]. The remote's own error
//! text is kept in the error for logging but never shown to callers; the
//! tool layer replaces it with a fixed message.
//!
//! # Example
//!
//! ```ignore
//! use envforge::transport::http::HttpTransport;
//! use std::time::Duration;
//!
//! let transport = HttpTransport::new(
//!     "https://api.getpostman.com",
//!     "PMAK-xxx",
//!     Duration::from_secs(30),
//! )?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::traits::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::core::config::Config;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "envforge";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

/// HTTP transport.
pub struct HttpTransport {
    /// HTTP client with default headers and timeout applied
    client: Client,
    /// API base URL, without trailing slash
    base_url: String,
}

// Custom Debug: the client's default headers hold the API key
impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport for `base_url` authenticating with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Network` if the key is not a valid header
    /// value or the client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|_| TransportError::Network("API key is not a valid header value".into()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a transport from loaded configuration.
    pub fn from_config(config: &Config, api_key: &str) -> Result<Self, TransportError> {
        Self::new(config.base_url(), api_key, config.timeout())
    }

    /// The API base this transport talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for a relative path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a response, mapping non-success statuses to errors.
    async fn handle_response(&self, response: Response) -> Result<ApiResponse, TransportError> {
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<RemoteErrorResponse>().await {
                Ok(body) => body.message(),
                Err(_) => "Unknown error".to_string(),
            };
            warn!(status = status.as_u16(), %message, "remote request failed");
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let data = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            data,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.url(&request.path);
        debug!(method = %request.method, %url, "sending request");

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        let builder = if request.query.is_empty() {
            builder
        } else {
            builder.query(&request.query)
        };

        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        self.handle_response(response).await
    }
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// Remote error body: `{"error": {"name": ..., "message": ...}}`.
#[derive(Deserialize)]
struct RemoteErrorResponse {
    error: Option<RemoteErrorDetail>,
}

#[derive(Deserialize)]
struct RemoteErrorDetail {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl RemoteErrorResponse {
    fn message(self) -> String {
        self.error
            .and_then(|e| e.message.or(e.name))
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let t = HttpTransport::new("https://api.example.com/", "k", Duration::from_secs(1))
            .unwrap();
        assert_eq!(t.base_url(), "https://api.example.com");
        assert_eq!(
            t.url("/environments"),
            "https://api.example.com/environments"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let t = HttpTransport::new(
            "https://api.example.com",
            "PMAK-secret-123",
            Duration::from_secs(1),
        )
        .unwrap();
        let debug_output = format!("{:?}", t);
        assert!(!debug_output.contains("PMAK-secret-123"));
        assert!(debug_output.contains("api.example.com"));
    }

    #[test]
    fn invalid_key_rejected() {
        let res = HttpTransport::new("https://api.example.com", "bad\nkey", Duration::from_secs(1));
        assert!(matches!(res, Err(TransportError::Network(_))));
    }

    #[test]
    fn from_config_uses_base() {
        let t = HttpTransport::from_config(&Config::default(), "k").unwrap();
        assert_eq!(t.base_url(), crate::core::config::DEFAULT_BASE_URL);
        assert_eq!(t.name(), "http");
    }

    #[test]
    fn remote_error_message_extraction() {
        let body: RemoteErrorResponse = serde_json::from_str(
            r#"{"error":{"name":"instanceNotFoundError","message":"We could not find the environment"}}"#,
        )
        .unwrap();
        assert_eq!(body.message(), "We could not find the environment");

        let body: RemoteErrorResponse =
            serde_json::from_str(r#"{"error":{"name":"forbiddenError"}}"#).unwrap();
        assert_eq!(body.message(), "forbiddenError");

        let body: RemoteErrorResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(body.message(), "Unknown error");
    }
}
