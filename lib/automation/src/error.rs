//! Error types for backend calls.

use std::fmt;

/// Errors from automation backend operations.
///
/// `operation` names the contract operation (`fetch_workflows`, ...) so the
/// message stays meaningful once it reaches the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The client could not be constructed from its configuration.
    InvalidConfig { details: String },
    /// The request never produced a response.
    Request { operation: String, details: String },
    /// The backend answered with a non-success status.
    Status {
        operation: String,
        status: u16,
        body: String,
    },
    /// The response body did not match the expected shape.
    Decode { operation: String, details: String },
    /// The backend has no record of the requested entity.
    NotFound { operation: String, id: String },
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { details } => {
                write!(f, "invalid automation backend configuration: {details}")
            }
            Self::Request { operation, details } => {
                write!(f, "{operation} request failed: {details}")
            }
            Self::Status {
                operation,
                status,
                body,
            } => {
                if body.is_empty() {
                    write!(f, "{operation} returned status {status}")
                } else {
                    write!(f, "{operation} returned status {status}: {body}")
                }
            }
            Self::Decode { operation, details } => {
                write!(f, "{operation} returned an unexpected response: {details}")
            }
            Self::NotFound { operation, id } => write!(f, "{operation}: {id} not found"),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display_includes_body_when_present() {
        let err = BackendError::Status {
            operation: "execute_workflow".to_string(),
            status: 503,
            body: "engine offline".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "execute_workflow returned status 503: engine offline"
        );
    }

    #[test]
    fn status_display_without_body() {
        let err = BackendError::Status {
            operation: "fetch_workflows".to_string(),
            status: 500,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "fetch_workflows returned status 500");
    }
}
