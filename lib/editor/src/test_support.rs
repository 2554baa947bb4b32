//! In-memory automation backend for tests.

use async_trait::async_trait;
use chrono::Utc;
use flowdesk_automation::{AutomationBackend, AutomationConnection, BackendError};
use flowdesk_core::WorkflowId;
use flowdesk_workflow::{
    Workflow, WorkflowDraft, WorkflowExecution, WorkflowPatch, WorkflowTemplate,
};
use rootcause::Report;
use std::sync::Mutex;

type Hook = Box<dyn FnOnce() + Send>;

#[derive(Default)]
pub(crate) struct InMemoryBackend {
    workflows: Mutex<Vec<Workflow>>,
    templates: Mutex<Vec<WorkflowTemplate>>,
    executions: Mutex<Vec<WorkflowExecution>>,
    fail_with: Mutex<Option<BackendError>>,
    /// Runs inside `execute_workflow`, while the request is "in flight".
    on_execute: Mutex<Option<Hook>>,
    calls: Mutex<Vec<&'static str>>,
}

impl InMemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_workflows(self, workflows: Vec<Workflow>) -> Self {
        *self.workflows.lock().unwrap() = workflows;
        self
    }

    pub(crate) fn with_templates(self, templates: Vec<WorkflowTemplate>) -> Self {
        *self.templates.lock().unwrap() = templates;
        self
    }

    pub(crate) fn with_executions(self, executions: Vec<WorkflowExecution>) -> Self {
        *self.executions.lock().unwrap() = executions;
        self
    }

    /// Every subsequent call fails with this error.
    pub(crate) fn fail_with(&self, error: BackendError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    pub(crate) fn recover(&self) {
        *self.fail_with.lock().unwrap() = None;
    }

    pub(crate) fn on_execute(&self, hook: impl FnOnce() + Send + 'static) {
        *self.on_execute.lock().unwrap() = Some(Box::new(hook));
    }

    pub(crate) fn workflows(&self) -> Vec<Workflow> {
        self.workflows.lock().unwrap().clone()
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, operation: &'static str) -> Result<(), Report<BackendError>> {
        self.calls.lock().unwrap().push(operation);
        match self.fail_with.lock().unwrap().clone() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    fn not_found(operation: &str, workflow_id: WorkflowId) -> Report<BackendError> {
        BackendError::NotFound {
            operation: operation.to_string(),
            id: workflow_id.to_string(),
        }
        .into()
    }
}

#[async_trait]
impl AutomationBackend for InMemoryBackend {
    async fn fetch_workflows(&self) -> Result<Vec<Workflow>, Report<BackendError>> {
        self.enter("fetch_workflows")?;
        Ok(self.workflows())
    }

    async fn create_workflow(&self, draft: WorkflowDraft) -> Result<Workflow, Report<BackendError>> {
        self.enter("create_workflow")?;
        let workflow = Workflow::from_draft(WorkflowId::new(), draft, Utc::now());
        self.workflows.lock().unwrap().push(workflow.clone());
        Ok(workflow)
    }

    async fn update_workflow(
        &self,
        workflow_id: WorkflowId,
        patch: WorkflowPatch,
    ) -> Result<Workflow, Report<BackendError>> {
        self.enter("update_workflow")?;
        let mut workflows = self.workflows.lock().unwrap();
        let workflow = workflows
            .iter_mut()
            .find(|w| w.id == workflow_id)
            .ok_or_else(|| Self::not_found("update_workflow", workflow_id))?;
        workflow.apply_patch(patch);
        Ok(workflow.clone())
    }

    async fn delete_workflow(&self, workflow_id: WorkflowId) -> Result<(), Report<BackendError>> {
        self.enter("delete_workflow")?;
        let mut workflows = self.workflows.lock().unwrap();
        let before = workflows.len();
        workflows.retain(|w| w.id != workflow_id);
        if workflows.len() == before {
            return Err(Self::not_found("delete_workflow", workflow_id));
        }
        Ok(())
    }

    async fn fetch_templates(&self) -> Result<Vec<WorkflowTemplate>, Report<BackendError>> {
        self.enter("fetch_templates")?;
        Ok(self.templates.lock().unwrap().clone())
    }

    async fn execute_workflow(
        &self,
        workflow_id: WorkflowId,
    ) -> Result<WorkflowExecution, Report<BackendError>> {
        let hook = self.on_execute.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        self.enter("execute_workflow")?;
        let execution = WorkflowExecution::started(workflow_id);
        self.executions.lock().unwrap().insert(0, execution.clone());
        Ok(execution)
    }

    async fn fetch_executions(
        &self,
        workflow_id: WorkflowId,
    ) -> Result<Vec<WorkflowExecution>, Report<BackendError>> {
        self.enter("fetch_executions")?;
        Ok(self
            .executions
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.workflow_id == workflow_id)
            .cloned()
            .collect())
    }

    async fn check_connection(&self) -> AutomationConnection {
        match self.enter("check_connection") {
            Ok(()) => AutomationConnection::connected("memory://engine"),
            Err(report) => {
                AutomationConnection::failed("memory://engine", report.current_context().to_string())
            }
        }
    }
}
