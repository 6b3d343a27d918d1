//! tools::classify
//!
//! Maps transport failures onto the caller-facing taxonomy.
//!
//! # Rules
//!
//! 1. A status listed in the operation's table becomes `InvalidRequest` with
//!    the table's message.
//! 2. Any other 4xx becomes `InvalidRequest` with [`GENERIC_INVALID`].
//! 3. Everything else (5xx, no status at all) becomes `InternalError` with
//!    [`SERVER_ERROR`].
//!
//! Local validation errors are already [`ToolError`]s and never pass through
//! here.

use tracing::warn;

use super::error::ToolError;
use super::operation::Operation;
use crate::transport::TransportError;

/// Status → fixed message pairs for one operation.
pub type StatusTable = &'static [(u16, &'static str)];

pub const UNAUTHORIZED: &str = "Unauthorized access";
pub const FORBIDDEN: &str = "Forbidden operation";
pub const NOT_FOUND: &str = "Environment not found";
pub const GENERIC_INVALID: &str = "Invalid request";
pub const SERVER_ERROR: &str = "Server error occurred";

/// The status table for an operation.
pub fn status_table(op: Operation) -> StatusTable {
    match op {
        Operation::ListEnvironments => &[(401, UNAUTHORIZED), (403, FORBIDDEN), (404, NOT_FOUND)],
        Operation::GetEnvironment => &[
            (400, NOT_FOUND),
            (401, UNAUTHORIZED),
            (403, FORBIDDEN),
            (404, NOT_FOUND),
        ],
        Operation::CreateEnvironment => &[
            (400, "Malformed request"),
            (401, UNAUTHORIZED),
            (403, FORBIDDEN),
        ],
        Operation::UpdateEnvironment => &[
            (400, "Malformed request"),
            (401, UNAUTHORIZED),
            (403, FORBIDDEN),
            (404, NOT_FOUND),
        ],
        Operation::DeleteEnvironment | Operation::ForkEnvironment => {
            &[(401, UNAUTHORIZED), (403, FORBIDDEN), (404, NOT_FOUND)]
        }
        Operation::ListForks => &[
            (400, "Invalid request parameters"),
            (401, UNAUTHORIZED),
            (403, FORBIDDEN),
            (404, NOT_FOUND),
        ],
        Operation::MergeFork => &[
            (400, "Invalid merge request"),
            (401, UNAUTHORIZED),
            (403, FORBIDDEN),
            (404, NOT_FOUND),
        ],
        Operation::PullEnvironment => &[
            (400, "Invalid pull request"),
            (401, UNAUTHORIZED),
            (403, FORBIDDEN),
            (404, NOT_FOUND),
        ],
    }
}

/// Classify a transport failure using `table`.
pub fn classify(err: &TransportError, table: StatusTable) -> ToolError {
    let Some(status) = err.status() else {
        return ToolError::internal(SERVER_ERROR);
    };

    if let Some((_, message)) = table.iter().find(|(s, _)| *s == status) {
        return ToolError::invalid_request(*message);
    }

    if (400..500).contains(&status) {
        ToolError::invalid_request(GENERIC_INVALID)
    } else {
        ToolError::internal(SERVER_ERROR)
    }
}

/// Classify a failure of `op`, logging the raw transport error.
pub fn classify_operation(op: Operation, err: &TransportError) -> ToolError {
    let classified = classify(err, status_table(op));
    warn!(operation = %op, error = %err, kind = %classified.kind, "operation failed");
    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::error::ErrorKind;

    fn status(status: u16) -> TransportError {
        TransportError::Status {
            status,
            message: "remote wording that must not leak".into(),
        }
    }

    #[test]
    fn table_hit_uses_fixed_message() {
        let err = classify(&status(404), status_table(Operation::GetEnvironment));
        assert_eq!(err, ToolError::invalid_request("Environment not found"));

        let err = classify(&status(400), status_table(Operation::MergeFork));
        assert_eq!(err, ToolError::invalid_request("Invalid merge request"));

        let err = classify(&status(401), status_table(Operation::PullEnvironment));
        assert_eq!(err, ToolError::invalid_request("Unauthorized access"));
    }

    #[test]
    fn unlisted_4xx_is_invalid_request() {
        let err = classify(&status(429), status_table(Operation::ListEnvironments));
        assert_eq!(err.kind, ErrorKind::InvalidRequest);
        assert_eq!(err.message, GENERIC_INVALID);

        let err = classify(&status(400), status_table(Operation::DeleteEnvironment));
        assert_eq!(err.message, GENERIC_INVALID);
    }

    #[test]
    fn server_errors_are_internal() {
        for code in [500, 502, 503] {
            let err = classify(&status(code), status_table(Operation::GetEnvironment));
            assert_eq!(err, ToolError::internal("Server error occurred"));
        }
    }

    #[test]
    fn missing_status_is_internal() {
        let err = classify(
            &TransportError::Network("timed out".into()),
            status_table(Operation::ForkEnvironment),
        );
        assert_eq!(err, ToolError::internal(SERVER_ERROR));

        let err = classify(
            &TransportError::Decode("eof".into()),
            status_table(Operation::ListForks),
        );
        assert_eq!(err.kind, ErrorKind::InternalError);
    }

    #[test]
    fn remote_text_never_leaks() {
        for op in Operation::ALL {
            for code in [400, 401, 403, 404, 418, 500] {
                let err = classify(&status(code), status_table(op));
                assert!(!err.message.contains("remote wording"));
            }
        }
    }

    #[test]
    fn every_table_covers_auth() {
        for op in Operation::ALL {
            let table = status_table(op);
            assert!(table.contains(&(401, UNAUTHORIZED)), "{op} lacks 401");
            assert!(table.contains(&(403, FORBIDDEN)), "{op} lacks 403");
        }
    }
}
