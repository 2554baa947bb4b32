//! Aggregate statistics over workflows and executions.

use crate::definition::Workflow;
use crate::execution::{ExecutionStatus, WorkflowExecution};
use serde::{Deserialize, Serialize};

/// Counts shown on the workflow dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStats {
    pub total_workflows: usize,
    pub active_workflows: usize,
    pub inactive_workflows: usize,
    pub total_executions: usize,
    pub successful_executions: usize,
    pub failed_executions: usize,
    pub running_executions: usize,
    /// Completed runs as a percentage of terminal runs, 0 when none finished.
    pub success_rate: f64,
}

impl WorkflowStats {
    /// Computes statistics over the given workflows and executions.
    #[must_use]
    pub fn compute(workflows: &[Workflow], executions: &[WorkflowExecution]) -> Self {
        let active_workflows = workflows.iter().filter(|w| w.is_active).count();
        let count = |status: ExecutionStatus| executions.iter().filter(|e| e.status == status).count();

        let successful_executions = count(ExecutionStatus::Completed);
        let failed_executions = count(ExecutionStatus::Failed);
        let running_executions = count(ExecutionStatus::Running);
        let terminal = executions.iter().filter(|e| e.status.is_terminal()).count();

        let success_rate = if terminal == 0 {
            0.0
        } else {
            successful_executions as f64 / terminal as f64 * 100.0
        };

        Self {
            total_workflows: workflows.len(),
            active_workflows,
            inactive_workflows: workflows.len() - active_workflows,
            total_executions: executions.len(),
            successful_executions,
            failed_executions,
            running_executions,
            success_rate,
        }
    }
}
