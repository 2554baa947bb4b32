//! Execution records and their status state machine.
//!
//! A run starts as `Running` and moves exactly once to one of the terminal
//! states. Terminal records never change status again.

use crate::error::ExecutionError;
use chrono::{DateTime, Utc};
use flowdesk_core::{ExecutionId, NodeId, WorkflowId};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// The status of a workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    /// Returns true if this is a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of an execution log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// One entry in an execution's log trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLog {
    pub node_id: NodeId,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

/// A single run attempt of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecution {
    pub id: ExecutionId,
    pub workflow_id: WorkflowId,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub logs: Vec<ExecutionLog>,
}

impl WorkflowExecution {
    /// Creates a running execution started now.
    #[must_use]
    pub fn started(workflow_id: WorkflowId) -> Self {
        Self {
            id: ExecutionId::new(),
            workflow_id,
            status: ExecutionStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            error: None,
            logs: Vec::new(),
        }
    }

    /// Returns true while the run has not reached a terminal state.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Appends a log entry.
    pub fn log(
        &mut self,
        node_id: NodeId,
        level: LogLevel,
        message: impl Into<String>,
        data: Option<JsonValue>,
    ) {
        self.logs.push(ExecutionLog {
            node_id,
            timestamp: Utc::now(),
            level,
            message: message.into(),
            data,
        });
    }

    /// Marks the run as completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the run already finished.
    pub fn complete(&mut self) -> Result<(), ExecutionError> {
        self.finish(ExecutionStatus::Completed, None)
    }

    /// Marks the run as failed with an error message.
    ///
    /// # Errors
    ///
    /// Returns an error if the run already finished.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), ExecutionError> {
        self.finish(ExecutionStatus::Failed, Some(error.into()))
    }

    /// Marks the run as cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the run already finished.
    pub fn cancel(&mut self) -> Result<(), ExecutionError> {
        self.finish(ExecutionStatus::Cancelled, None)
    }

    fn finish(
        &mut self,
        status: ExecutionStatus,
        error: Option<String>,
    ) -> Result<(), ExecutionError> {
        self.ensure_running()?;
        self.status = status;
        self.completed_at = Some(Utc::now());
        self.error = error;
        Ok(())
    }

    /// Replaces this record with a newer snapshot of the same run.
    ///
    /// Only `running -> *` is accepted; a terminal record is frozen.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot belongs to another run, or if this
    /// record is already terminal.
    pub fn apply_snapshot(&mut self, snapshot: WorkflowExecution) -> Result<(), ExecutionError> {
        if snapshot.id != self.id || snapshot.workflow_id != self.workflow_id {
            return Err(ExecutionError::Mismatched {
                execution_id: self.id,
            });
        }
        self.ensure_running()?;
        *self = snapshot;
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), ExecutionError> {
        if self.status.is_terminal() {
            return Err(ExecutionError::AlreadyTerminal {
                execution_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Returns how long the run took, or has taken so far.
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        let end = self.completed_at.unwrap_or_else(Utc::now);
        end - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_terminal() {
        assert!(!ExecutionStatus::Running.is_terminal());
        assert!(ExecutionStatus::Completed.is_terminal());
        assert!(ExecutionStatus::Failed.is_terminal());
        assert!(ExecutionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn run_lifecycle() {
        let mut run = WorkflowExecution::started(WorkflowId::new());
        assert!(run.is_running());
        assert!(run.completed_at.is_none());

        run.complete().expect("first transition");
        assert_eq!(run.status, ExecutionStatus::Completed);
        assert!(run.completed_at.is_some());
    }

    #[test]
    fn terminal_states_are_final() {
        let mut run = WorkflowExecution::started(WorkflowId::new());
        run.fail("engine unreachable").expect("first transition");

        let err = run.cancel().expect_err("already failed");
        assert_eq!(
            err,
            ExecutionError::AlreadyTerminal {
                execution_id: run.id,
                status: ExecutionStatus::Failed,
            }
        );
        assert_eq!(run.error.as_deref(), Some("engine unreachable"));
    }

    #[test]
    fn snapshot_must_match_run() {
        let mut run = WorkflowExecution::started(WorkflowId::new());
        let other = WorkflowExecution::started(run.workflow_id);
        assert!(matches!(
            run.apply_snapshot(other),
            Err(ExecutionError::Mismatched { .. })
        ));

        let mut done = run.clone();
        done.status = ExecutionStatus::Completed;
        done.log(NodeId::new(), LogLevel::Info, "sent", None);
        run.apply_snapshot(done).expect("running accepts snapshot");
        assert_eq!(run.status, ExecutionStatus::Completed);
        assert_eq!(run.logs.len(), 1);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let run = WorkflowExecution::started(WorkflowId::new());
        let json = serde_json::to_value(&run).expect("serialize");
        assert_eq!(json["status"], "running");
        assert!(json.get("workflowId").is_some());
        assert!(json.get("startedAt").is_some());
    }
}
