//! Error types for synchronous store mutations.
//!
//! Backend failures never surface here: async actions turn them into the
//! store's user-facing error message instead.

use flowdesk_core::{ExecutionId, NodeId, WorkflowId};
use flowdesk_workflow::{ExecutionError, GraphError, NodeType};
use std::fmt;

/// Errors from store mutations that would break a graph invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The graph rejected the mutation.
    Graph {
        workflow_id: WorkflowId,
        error: GraphError,
    },
    /// The node to select is not part of the active workflow.
    NodeNotInActiveWorkflow { node_id: NodeId },
    /// No execution with this id is tracked.
    ExecutionNotFound { execution_id: ExecutionId },
    /// The execution update was rejected.
    Execution { error: ExecutionError },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graph { workflow_id, error } => {
                write!(f, "workflow {workflow_id}: {error}")
            }
            Self::NodeNotInActiveWorkflow { node_id } => {
                write!(f, "node {node_id} is not part of the active workflow")
            }
            Self::ExecutionNotFound { execution_id } => {
                write!(f, "execution not found: {execution_id}")
            }
            Self::Execution { error } => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Reasons a run request is refused before reaching the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunBlocked {
    NoActiveWorkflow,
    /// The requested workflow is not the one open in the editor.
    NotActive { workflow_id: WorkflowId },
    EmptyWorkflow,
    AlreadyExecuting,
    Disconnected,
    MissingTrigger,
}

impl fmt::Display for RunBlocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveWorkflow => write!(f, "no workflow is open"),
            Self::NotActive { workflow_id } => {
                write!(f, "workflow {workflow_id} is not the open workflow")
            }
            Self::EmptyWorkflow => write!(f, "workflow has no nodes"),
            Self::AlreadyExecuting => write!(f, "a run request is already in flight"),
            Self::Disconnected => write!(f, "automation engine is not connected"),
            Self::MissingTrigger => write!(f, "workflow needs at least one trigger node"),
        }
    }
}

impl std::error::Error for RunBlocked {}

/// Errors from editing an inspector form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectorError {
    /// The node type has no such form field.
    UnknownField { node_type: NodeType, field: String },
}

impl fmt::Display for InspectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField { node_type, field } => {
                write!(f, "{node_type} nodes have no field named {field}")
            }
        }
    }
}

impl std::error::Error for InspectorError {}

impl StoreError {
    /// Returns the underlying graph error, if any.
    #[must_use]
    pub fn graph_error(&self) -> Option<&GraphError> {
        match self {
            Self::Graph { error, .. } => Some(error),
            _ => None,
        }
    }
}
