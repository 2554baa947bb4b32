//! Async workflow actions against the automation backend.
//!
//! Each action follows the same lifecycle on the store:
//!
//! 1. pending: `is_loading` is set and any previous error is cleared
//! 2. the backend call is awaited without holding the store lock
//! 3. fulfilled: the result is written back, or rejected: the error message
//!    replaces the store error
//!
//! Backend failures never propagate to the caller; they end up in
//! [`GraphStore::error`](crate::GraphStore::error). There is no retry.

use crate::shared::SharedStore;
use flowdesk_automation::{AutomationBackend, AutomationConnection, BackendError};
use flowdesk_core::{TemplateId, WorkflowId, WorkspaceId};
use flowdesk_workflow::{Workflow, WorkflowDraft, WorkflowPatch};
use rootcause::Report;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Workflow CRUD, template loading and connection probing.
pub struct WorkflowActions<B> {
    store: SharedStore,
    backend: Arc<B>,
}

impl<B> Clone for WorkflowActions<B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: AutomationBackend> WorkflowActions<B> {
    pub fn new(store: SharedStore, backend: Arc<B>) -> Self {
        Self { store, backend }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    fn reject(&self, operation: &str, report: &Report<BackendError>) {
        warn!(operation, error = %report, "automation request failed");
        let message = report.current_context().to_string();
        self.store.update(|s| s.request_failed(message));
    }

    /// Replaces the workflow list with the backend's. Returns true on success.
    #[instrument(skip(self))]
    pub async fn load_workflows(&self) -> bool {
        self.store.update(|s| s.request_started());
        match self.backend.fetch_workflows().await {
            Ok(workflows) => {
                info!(count = workflows.len(), "workflows loaded");
                self.store.update(|s| s.workflows_loaded(workflows));
                true
            }
            Err(report) => {
                self.reject("load_workflows", &report);
                false
            }
        }
    }

    /// Replaces the template list with the backend's. Returns true on success.
    #[instrument(skip(self))]
    pub async fn load_templates(&self) -> bool {
        self.store.update(|s| s.request_started());
        match self.backend.fetch_templates().await {
            Ok(templates) => {
                info!(count = templates.len(), "templates loaded");
                self.store.update(|s| s.templates_loaded(templates));
                true
            }
            Err(report) => {
                self.reject("load_templates", &report);
                false
            }
        }
    }

    /// Creates a workflow and opens it as the active workflow.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_workflow(&self, draft: WorkflowDraft) -> Option<Workflow> {
        self.store.update(|s| s.request_started());
        match self.backend.create_workflow(draft).await {
            Ok(workflow) => {
                info!(workflow_id = %workflow.id, "workflow created");
                self.store.update(|s| s.workflow_created(workflow.clone()));
                Some(workflow)
            }
            Err(report) => {
                self.reject("create_workflow", &report);
                None
            }
        }
    }

    /// Instantiates a loaded template with fresh ids and creates it.
    #[instrument(skip(self, name))]
    pub async fn create_from_template(
        &self,
        template_id: TemplateId,
        name: Option<String>,
        workspace_id: Option<WorkspaceId>,
    ) -> Option<Workflow> {
        let draft = self.store.update(|s| {
            let draft = match s.templates().iter().find(|t| t.id == template_id) {
                Some(template) => template
                    .instantiate(name, workspace_id)
                    .map_err(|e| e.to_string()),
                None => Err(format!("template not found: {template_id}")),
            };
            if let Err(message) = &draft {
                warn!(error = %message, "cannot instantiate template");
                s.set_error(message.clone());
            }
            draft.ok()
        })?;
        self.create_workflow(draft).await
    }

    /// Applies a partial update; the returned workflow replaces the list
    /// entry and, if open, the active workflow.
    #[instrument(skip(self, patch))]
    pub async fn update_workflow(
        &self,
        workflow_id: WorkflowId,
        patch: WorkflowPatch,
    ) -> Option<Workflow> {
        self.store.update(|s| s.request_started());
        match self.backend.update_workflow(workflow_id, patch).await {
            Ok(workflow) => {
                info!(workflow_id = %workflow.id, "workflow updated");
                self.store.update(|s| s.workflow_updated(workflow.clone()));
                Some(workflow)
            }
            Err(report) => {
                self.reject("update_workflow", &report);
                None
            }
        }
    }

    /// Persists the active workflow's graph. No-op without an active
    /// workflow.
    pub async fn save_active_workflow(&self) -> Option<Workflow> {
        let (workflow_id, patch) = self.store.read(|s| {
            s.active_workflow()
                .map(|w| (w.id, WorkflowPatch::graph_of(w)))
        })?;
        self.update_workflow(workflow_id, patch).await
    }

    /// Deletes a workflow. Returns true on success.
    #[instrument(skip(self))]
    pub async fn delete_workflow(&self, workflow_id: WorkflowId) -> bool {
        self.store.update(|s| s.request_started());
        match self.backend.delete_workflow(workflow_id).await {
            Ok(()) => {
                info!(workflow_id = %workflow_id, "workflow deleted");
                self.store.update(|s| s.workflow_deleted(workflow_id));
                true
            }
            Err(report) => {
                self.reject("delete_workflow", &report);
                false
            }
        }
    }

    /// Probes the engine and records the resulting connection state.
    pub async fn refresh_connection(&self) -> AutomationConnection {
        let connection = self.backend.check_connection().await;
        self.store
            .update(|s| s.set_connection_state(connection.clone()));
        connection
    }
}
