//! Execution orchestrator: bridges the store to the automation engine.
//!
//! The orchestrator only requests runs and loads history. It never polls;
//! terminal states arrive through
//! [`GraphStore::apply_execution_update`](crate::GraphStore::apply_execution_update)
//! from whichever integration layer owns the engine connection. Run
//! requests cannot be cancelled.

use crate::error::RunBlocked;
use crate::shared::SharedStore;
use crate::store::GraphStore;
use flowdesk_automation::AutomationBackend;
use flowdesk_core::WorkflowId;
use flowdesk_workflow::WorkflowExecution;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Checks every precondition of a run request.
///
/// The first four checks are exactly [`GraphStore::can_execute`]; a run
/// additionally needs the requested workflow to be the open one and to have
/// a trigger node.
///
/// # Errors
///
/// Returns the first failing precondition.
pub fn check_run(store: &GraphStore, workflow_id: WorkflowId) -> Result<(), RunBlocked> {
    let workflow = store.active_workflow().ok_or(RunBlocked::NoActiveWorkflow)?;
    if workflow.nodes.is_empty() {
        return Err(RunBlocked::EmptyWorkflow);
    }
    if store.is_executing() {
        return Err(RunBlocked::AlreadyExecuting);
    }
    if !store.connection().is_connected {
        return Err(RunBlocked::Disconnected);
    }
    if workflow.id != workflow_id {
        return Err(RunBlocked::NotActive { workflow_id });
    }
    if workflow.trigger_count() == 0 {
        return Err(RunBlocked::MissingTrigger);
    }
    Ok(())
}

/// Requests runs and loads execution history.
pub struct ExecutionOrchestrator<B> {
    store: SharedStore,
    backend: Arc<B>,
}

impl<B> Clone for ExecutionOrchestrator<B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: AutomationBackend> ExecutionOrchestrator<B> {
    pub fn new(store: SharedStore, backend: Arc<B>) -> Self {
        Self { store, backend }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Requests a run of the open workflow.
    ///
    /// Returns the accepted execution, now first in the store's execution
    /// list. On refusal or backend failure returns `None` and the reason is
    /// in the store error.
    #[instrument(skip(self))]
    pub async fn run_workflow(&self, workflow_id: WorkflowId) -> Option<WorkflowExecution> {
        // Check and flag in one critical section so two callers cannot both
        // pass the guard.
        let admitted = self.store.update(|s| match check_run(s, workflow_id) {
            Ok(()) => {
                s.execution_started();
                true
            }
            Err(blocked) => {
                warn!(reason = %blocked, "run refused");
                s.set_error(blocked.to_string());
                false
            }
        });
        if !admitted {
            return None;
        }

        match self.backend.execute_workflow(workflow_id).await {
            Ok(execution) => {
                info!(execution_id = %execution.id, status = %execution.status, "run accepted");
                self.store
                    .update(|s| s.execution_accepted(execution.clone()));
                Some(execution)
            }
            Err(report) => {
                warn!(error = %report, "run request failed");
                let message = report.current_context().to_string();
                self.store.update(|s| s.execution_rejected(message));
                None
            }
        }
    }

    /// Replaces the execution list with the workflow's history. Returns
    /// true on success.
    #[instrument(skip(self))]
    pub async fn load_executions(&self, workflow_id: WorkflowId) -> bool {
        self.store.update(|s| s.request_started());
        match self.backend.fetch_executions(workflow_id).await {
            Ok(executions) => {
                info!(count = executions.len(), "executions loaded");
                self.store.update(|s| s.executions_loaded(executions));
                true
            }
            Err(report) => {
                warn!(error = %report, "loading executions failed");
                let message = report.current_context().to_string();
                self.store.update(|s| s.request_failed(message));
                false
            }
        }
    }
}
