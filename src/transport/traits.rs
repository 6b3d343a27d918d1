//! transport::traits
//!
//! Transport trait definition for talking to the remote environment service.
//!
//! # Design
//!
//! The `Transport` trait is async because every call is network I/O. An
//! implementation issues exactly one request per `send` and reports either
//! the decoded response or a [`TransportError`] exposing the status code.
//! Retries, pooling and TLS are the implementation's business.
//!
//! # Example
//!
//! ```ignore
//! use envforge::transport::{Transport, TransportError};
//!
//! async fn fetch(t: &dyn Transport) -> Result<(), TransportError> {
//!     let resp = t.get("/environments", Vec::new()).await?;
//!     println!("{} -> {}", resp.status, resp.data);
//!     Ok(())
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors from transport operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    /// The remote answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Error text from the remote (for logs only)
        message: String,
    },

    /// Network or connection error, including timeouts.
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl TransportError {
    /// The HTTP status of the failure, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network(_) | TransportError::Decode(_) => None,
        }
    }
}

/// HTTP method used by the operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// An outbound request, path relative to the API base.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    /// Query parameters, in order. Absent parameters are simply not listed.
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a query parameter by name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

/// The transport seam.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single transport can serve
/// concurrent operations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name (e.g., "http", "mock").
    fn name(&self) -> &'static str;

    /// Issue one request.
    ///
    /// # Errors
    ///
    /// - `Status` for any non-2xx answer
    /// - `Network` if the request could not be completed
    /// - `Decode` if a success body is not JSON
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;

    async fn get(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::Get, path).with_query(query))
            .await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<ApiResponse, TransportError> {
        let request = ApiRequest::new(Method::Post, path);
        let request = match body {
            Some(body) => request.with_body(body),
            None => request,
        };
        self.send(request).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::Put, path).with_body(body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::Delete, path)).await
    }
}
