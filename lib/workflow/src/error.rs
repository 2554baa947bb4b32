//! Error types for the workflow crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `GraphError`: structural problems with nodes and connections
//! - `ExecutionError`: illegal execution status transitions
//! - `TemplateError`: malformed template blueprints

use crate::execution::ExecutionStatus;
use crate::node::NodeType;
use flowdesk_core::{ConnectionId, ExecutionId, NodeId, TemplateId};
use std::fmt;

/// Errors from graph mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Node with the given id was not found.
    NodeNotFound { node_id: NodeId },
    /// A node with this id already exists.
    DuplicateNode { node_id: NodeId },
    /// Connection with the given id was not found.
    ConnectionNotFound { connection_id: ConnectionId },
    /// A connection endpoint does not reference an existing node.
    DanglingEndpoint {
        connection_id: ConnectionId,
        node_id: NodeId,
    },
    /// A connection would link a node to itself.
    SelfLoop { node_id: NodeId },
    /// The same source/target pair is already connected.
    DuplicateConnection { source: NodeId, target: NodeId },
    /// Properties tagged with a different type than the node.
    PropertiesTypeMismatch {
        node_id: NodeId,
        node_type: NodeType,
        properties_type: NodeType,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeNotFound { node_id } => write!(f, "node not found: {node_id}"),
            Self::DuplicateNode { node_id } => write!(f, "node already exists: {node_id}"),
            Self::ConnectionNotFound { connection_id } => {
                write!(f, "connection not found: {connection_id}")
            }
            Self::DanglingEndpoint {
                connection_id,
                node_id,
            } => write!(
                f,
                "connection {connection_id} references missing node {node_id}"
            ),
            Self::SelfLoop { node_id } => {
                write!(f, "node {node_id} cannot be connected to itself")
            }
            Self::DuplicateConnection { source, target } => {
                write!(f, "{source} is already connected to {target}")
            }
            Self::PropertiesTypeMismatch {
                node_id,
                node_type,
                properties_type,
            } => write!(
                f,
                "node {node_id} is a {node_type} node and cannot take {properties_type} properties"
            ),
        }
    }
}

impl std::error::Error for GraphError {}

/// Errors from execution status transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// The execution already reached a terminal status.
    AlreadyTerminal {
        execution_id: ExecutionId,
        status: ExecutionStatus,
    },
    /// The update targets a different execution or workflow.
    Mismatched { execution_id: ExecutionId },
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyTerminal {
                execution_id,
                status,
            } => write!(f, "execution {execution_id} is already {status}"),
            Self::Mismatched { execution_id } => {
                write!(f, "update does not belong to execution {execution_id}")
            }
        }
    }
}

impl std::error::Error for ExecutionError {}

/// Errors from template instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A blueprint connection points at a node index the template lacks.
    NodeIndexOutOfRange {
        template_id: TemplateId,
        index: usize,
        node_count: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeIndexOutOfRange {
                template_id,
                index,
                node_count,
            } => write!(
                f,
                "template {template_id} connects node #{index} but has only {node_count} nodes"
            ),
        }
    }
}

impl std::error::Error for TemplateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_display() {
        let node_id = NodeId::new();
        let err = GraphError::NodeNotFound { node_id };
        assert!(err.to_string().contains("node not found"));
    }

    #[test]
    fn mismatch_names_both_types() {
        let err = GraphError::PropertiesTypeMismatch {
            node_id: NodeId::new(),
            node_type: NodeType::Trigger,
            properties_type: NodeType::Data,
        };
        let message = err.to_string();
        assert!(message.contains("trigger node"));
        assert!(message.contains("data properties"));
    }

    #[test]
    fn execution_error_display() {
        let err = ExecutionError::AlreadyTerminal {
            execution_id: ExecutionId::new(),
            status: ExecutionStatus::Failed,
        };
        assert!(err.to_string().contains("already failed"));
    }
}
