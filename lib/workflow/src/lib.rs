//! Workflow graph model for the flowdesk editor.
//!
//! This crate provides the data model shared by the editor and the
//! automation backend client:
//!
//! - **Definition**: workflows with ordered nodes and connections, plus
//!   invariant-preserving graph mutations (cascading delete, connection guards)
//! - **Nodes**: typed nodes with a property bag keyed by node type
//! - **Executions**: run records with a monotonic status state machine
//! - **Validation**: advisory structural checks
//! - **Templates**: blueprints instantiated with fresh ids
//! - **Stats**: dashboard aggregates

pub mod connection;
pub mod definition;
pub mod error;
pub mod execution;
pub mod node;
pub mod stats;
pub mod template;
pub mod validation;

pub use connection::WorkflowConnection;
pub use definition::{Workflow, WorkflowDraft, WorkflowPatch};
pub use error::{ExecutionError, GraphError, TemplateError};
pub use execution::{ExecutionLog, ExecutionStatus, LogLevel, WorkflowExecution};
pub use node::{
    ActionProperties, ConditionProperties, ConditionRule, DataProperties, NodeProperties,
    NodeType, NodeUpdate, Position, TriggerProperties, WorkflowNode,
};
pub use stats::WorkflowStats;
pub use template::{ConnectionBlueprint, NodeBlueprint, WorkflowTemplate};
pub use validation::{ValidationIssue, ValidationReport, validate};
