//! The automation backend contract.

use crate::connection::AutomationConnection;
use crate::error::BackendError;
use async_trait::async_trait;
use flowdesk_core::WorkflowId;
use flowdesk_workflow::{Workflow, WorkflowDraft, WorkflowExecution, WorkflowPatch, WorkflowTemplate};
use rootcause::Report;

/// Operations the editor consumes from the automation/workflow service.
///
/// The editor treats the service as opaque: it never learns how a run is
/// executed, only the records the service hands back.
#[async_trait]
pub trait AutomationBackend: Send + Sync {
    /// Lists every workflow visible to the user.
    async fn fetch_workflows(&self) -> Result<Vec<Workflow>, Report<BackendError>>;

    /// Creates a workflow; the backend assigns id and timestamps.
    async fn create_workflow(&self, draft: WorkflowDraft) -> Result<Workflow, Report<BackendError>>;

    /// Applies a partial update and returns the full updated workflow.
    async fn update_workflow(
        &self,
        workflow_id: WorkflowId,
        patch: WorkflowPatch,
    ) -> Result<Workflow, Report<BackendError>>;

    /// Deletes a workflow.
    async fn delete_workflow(&self, workflow_id: WorkflowId) -> Result<(), Report<BackendError>>;

    /// Lists the available templates.
    async fn fetch_templates(&self) -> Result<Vec<WorkflowTemplate>, Report<BackendError>>;

    /// Requests a run; the returned execution is `running`.
    async fn execute_workflow(
        &self,
        workflow_id: WorkflowId,
    ) -> Result<WorkflowExecution, Report<BackendError>>;

    /// Lists the runs of a workflow.
    async fn fetch_executions(
        &self,
        workflow_id: WorkflowId,
    ) -> Result<Vec<WorkflowExecution>, Report<BackendError>>;

    /// Probes the engine and reports the resulting connection state.
    async fn check_connection(&self) -> AutomationConnection;
}
