//! Core domain types for the flowdesk workflow editor.
//!
//! This crate provides the strongly typed identifiers and the error
//! handling foundation shared by every other flowdesk crate.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{
    ConnectionId, ExecutionId, NodeId, ParseIdError, TemplateId, WorkflowId, WorkspaceId,
};
