//! tools::error
//!
//! Caller-facing error taxonomy.
//!
//! Every failure an operation reports is one of three kinds, each carrying
//! a fixed human-readable message. Raw remote error text never appears here.
//!
//! ```
//! use envforge::tools::{ErrorKind, ToolError};
//!
//! let err = ToolError::invalid_request("Environment not found");
//! assert_eq!(err.kind, ErrorKind::InvalidRequest);
//! assert_eq!(err.to_string(), "invalid request: Environment not found");
//! ```

use std::fmt;

use thiserror::Error;

/// Error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input, detected locally or reported by the remote side
    InvalidRequest,
    /// Remote failure or anything unclassified
    InternalError,
    /// Unknown operation name
    MethodNotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidRequest => write!(f, "invalid request"),
            ErrorKind::InternalError => write!(f, "internal error"),
            ErrorKind::MethodNotFound => write!(f, "method not found"),
        }
    }
}

/// An operation failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ToolError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    pub fn method_not_found(name: &str) -> Self {
        Self::new(ErrorKind::MethodNotFound, format!("Unknown tool: {}", name))
    }
}
