//! CLI error type.

use flowdesk_core::WorkflowId;
use std::fmt;

/// Errors that end a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// Configuration could not be loaded.
    Config { details: String },
    /// The command needs `automation.base_url`.
    MissingBackend,
    /// The backend call failed; `message` is the store error.
    Backend { message: String },
    /// The requested workflow does not exist.
    WorkflowNotFound { workflow_id: WorkflowId },
    /// A workflow file could not be read.
    Io { path: String, details: String },
    /// A workflow file is not a valid workflow document.
    Parse { path: String, details: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { details } => write!(f, "configuration error: {details}"),
            Self::MissingBackend => write!(
                f,
                "no automation backend configured; set FLOWDESK_AUTOMATION__BASE_URL"
            ),
            Self::Backend { message } => write!(f, "{message}"),
            Self::WorkflowNotFound { workflow_id } => {
                write!(f, "workflow not found: {workflow_id}")
            }
            Self::Io { path, details } => write!(f, "cannot read {path}: {details}"),
            Self::Parse { path, details } => write!(f, "{path} is not a workflow: {details}"),
        }
    }
}

impl std::error::Error for CliError {}
