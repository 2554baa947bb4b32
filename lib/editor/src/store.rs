//! The graph store: single source of truth for the editor.
//!
//! The store owns the workflow list, the active workflow, the node
//! selection, execution bookkeeping and the transient session flags. Every
//! mutation goes through a method here, and each method keeps these rules:
//!
//! - at most one active workflow; switching it clears the selection
//! - the selected node always belongs to the active workflow
//! - no connection outlives either of its endpoints
//! - a node's `connected` flag mirrors its outgoing connections
//!
//! Graph mutations with no active workflow are no-ops. Position updates are
//! applied verbatim; bounding them is the canvas controller's job.

use crate::error::StoreError;
use crate::filters::{FilterUpdate, WorkflowFilters};
use flowdesk_automation::AutomationConnection;
use flowdesk_core::{ConnectionId, NodeId, WorkflowId};
use flowdesk_workflow::{
    GraphError, NodeUpdate, Position, ValidationReport, Workflow, WorkflowConnection,
    WorkflowExecution, WorkflowNode, WorkflowStats, WorkflowTemplate, validate,
};
use tracing::{debug, warn};

/// Editor state plus the operations that mutate it.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    workflows: Vec<Workflow>,
    templates: Vec<WorkflowTemplate>,
    /// Most recent first.
    executions: Vec<WorkflowExecution>,
    active_workflow: Option<Workflow>,
    selected_node_id: Option<NodeId>,
    filters: WorkflowFilters,
    is_loading: bool,
    is_executing: bool,
    error: Option<String>,
    connection: AutomationConnection,
}

impl GraphStore {
    /// Creates an empty store with a disconnected automation engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ---- reads ----

    #[must_use]
    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    #[must_use]
    pub fn templates(&self) -> &[WorkflowTemplate] {
        &self.templates
    }

    /// Tracked executions, most recent first.
    #[must_use]
    pub fn executions(&self) -> &[WorkflowExecution] {
        &self.executions
    }

    #[must_use]
    pub fn active_workflow(&self) -> Option<&Workflow> {
        self.active_workflow.as_ref()
    }

    /// The selected node, read from the active workflow so it always
    /// reflects the latest edits.
    #[must_use]
    pub fn selected_node(&self) -> Option<&WorkflowNode> {
        let node_id = self.selected_node_id?;
        self.active_workflow.as_ref()?.node(node_id)
    }

    #[must_use]
    pub fn filters(&self) -> &WorkflowFilters {
        &self.filters
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn is_executing(&self) -> bool {
        self.is_executing
    }

    /// The last backend error, if not yet cleared.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn connection(&self) -> &AutomationConnection {
        &self.connection
    }

    // ---- selection ----

    /// Replaces the active workflow and clears the selection.
    pub fn set_active_workflow(&mut self, workflow: Option<Workflow>) {
        debug!(
            workflow_id = ?workflow.as_ref().map(|w| w.id),
            "switching active workflow"
        );
        self.active_workflow = workflow;
        self.selected_node_id = None;
    }

    /// Selects a node of the active workflow, or clears the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not part of the active workflow; the
    /// previous selection is kept.
    pub fn set_selected_node(&mut self, node_id: Option<NodeId>) -> Result<(), StoreError> {
        if let Some(node_id) = node_id
            && !self
                .active_workflow
                .as_ref()
                .is_some_and(|w| w.contains_node(node_id))
        {
            return Err(StoreError::NodeNotInActiveWorkflow { node_id });
        }
        self.selected_node_id = node_id;
        Ok(())
    }

    // ---- graph mutations ----

    fn with_active<T>(
        &mut self,
        operation: &str,
        mutate: impl FnOnce(&mut Workflow) -> Result<T, GraphError>,
    ) -> Result<Option<T>, StoreError> {
        let Some(workflow) = self.active_workflow.as_mut() else {
            debug!(operation, "no active workflow, ignoring");
            return Ok(None);
        };
        let workflow_id = workflow.id;
        mutate(workflow).map(Some).map_err(|error| {
            warn!(operation, workflow_id = %workflow_id, error = %error, "graph mutation rejected");
            StoreError::Graph { workflow_id, error }
        })
    }

    /// Appends a node to the active workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if the node id is already taken.
    pub fn add_node(&mut self, node: WorkflowNode) -> Result<(), StoreError> {
        let node_id = node.id;
        if self.with_active("add_node", |w| w.add_node(node))?.is_some() {
            debug!(node_id = %node_id, "node added");
        }
        Ok(())
    }

    /// Merges a partial update into a node of the active workflow.
    ///
    /// The selection reads through to the workflow, so an edited selected
    /// node is immediately visible via [`GraphStore::selected_node`].
    ///
    /// # Errors
    ///
    /// Returns an error if the node is missing or the update carries
    /// properties of another node type.
    pub fn update_node(&mut self, node_id: NodeId, update: NodeUpdate) -> Result<(), StoreError> {
        self.with_active("update_node", |w| w.update_node(node_id, update).map(|_| ()))?;
        Ok(())
    }

    /// Deletes a node and every connection touching it.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is missing.
    pub fn delete_node(&mut self, node_id: NodeId) -> Result<(), StoreError> {
        if let Some((_, dropped)) = self.with_active("delete_node", |w| w.remove_node(node_id))? {
            debug!(node_id = %node_id, dropped_connections = dropped, "node deleted");
            if self.selected_node_id == Some(node_id) {
                self.selected_node_id = None;
            }
        }
        Ok(())
    }

    /// Sets a node position verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is missing.
    pub fn move_node(&mut self, node_id: NodeId, position: Position) -> Result<(), StoreError> {
        self.with_active("move_node", |w| w.set_node_position(node_id, position))?;
        Ok(())
    }

    /// Adds a connection to the active workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is missing, the connection is a
    /// self-loop, or the pair is already connected.
    pub fn add_connection(&mut self, connection: WorkflowConnection) -> Result<(), StoreError> {
        self.with_active("add_connection", |w| w.add_connection(connection))?;
        Ok(())
    }

    /// Removes a connection from the active workflow.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is missing.
    pub fn delete_connection(&mut self, connection_id: ConnectionId) -> Result<(), StoreError> {
        self.with_active("delete_connection", |w| {
            w.remove_connection(connection_id).map(|_| ())
        })?;
        Ok(())
    }

    // ---- session ----

    /// Merges a partial filter update.
    pub fn set_filters(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Records the automation engine connection state.
    pub fn set_connection_state(&mut self, connection: AutomationConnection) {
        debug!(
            connected = connection.is_connected,
            "automation connection state changed"
        );
        self.connection = connection;
    }

    // ---- derived ----

    /// Workflows passing the current filters.
    pub fn filtered_workflows(&self) -> impl Iterator<Item = &Workflow> {
        self.workflows.iter().filter(|w| self.filters.matches(w))
    }

    /// Dashboard statistics over the workflow list and tracked executions.
    #[must_use]
    pub fn stats(&self) -> WorkflowStats {
        WorkflowStats::compute(&self.workflows, &self.executions)
    }

    /// Validates the active workflow.
    #[must_use]
    pub fn validate_active(&self) -> Option<ValidationReport> {
        self.active_workflow.as_ref().map(validate)
    }

    /// True when a run may be requested: a non-empty active workflow, no
    /// run request in flight, and a connected automation engine.
    #[must_use]
    pub fn can_execute(&self) -> bool {
        self.active_workflow
            .as_ref()
            .is_some_and(|w| !w.nodes.is_empty())
            && !self.is_executing
            && self.connection.is_connected
    }

    /// Tracked executions of one workflow, most recent first.
    pub fn executions_for(&self, workflow_id: WorkflowId) -> impl Iterator<Item = &WorkflowExecution> {
        self.executions
            .iter()
            .filter(move |e| e.workflow_id == workflow_id)
    }

    /// True while a run request for the workflow is in flight or one of its
    /// runs has not finished.
    #[must_use]
    pub fn is_workflow_running(&self, workflow_id: WorkflowId) -> bool {
        let requesting = self.is_executing
            && self
                .active_workflow
                .as_ref()
                .is_some_and(|w| w.id == workflow_id);
        requesting || self.executions_for(workflow_id).any(WorkflowExecution::is_running)
    }

    /// Applies a status update for a tracked execution delivered by the
    /// integration layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the execution is unknown, or the update would
    /// move a terminal run.
    pub fn apply_execution_update(&mut self, update: WorkflowExecution) -> Result<(), StoreError> {
        let execution_id = update.id;
        let execution = self
            .executions
            .iter_mut()
            .find(|e| e.id == execution_id)
            .ok_or(StoreError::ExecutionNotFound { execution_id })?;
        execution
            .apply_snapshot(update)
            .map_err(|error| StoreError::Execution { error })?;
        debug!(execution_id = %execution_id, status = %execution.status, "execution updated");
        Ok(())
    }

    // ---- async lifecycle, driven by actions and the orchestrator ----

    pub(crate) fn request_started(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Records an error without touching the pending flags.
    pub(crate) fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub(crate) fn request_failed(&mut self, message: String) {
        self.is_loading = false;
        self.error = Some(message);
    }

    pub(crate) fn workflows_loaded(&mut self, workflows: Vec<Workflow>) {
        self.is_loading = false;
        self.workflows = workflows;
    }

    pub(crate) fn templates_loaded(&mut self, templates: Vec<WorkflowTemplate>) {
        self.is_loading = false;
        self.templates = templates;
    }

    /// A freshly created workflow joins the list and becomes active.
    pub(crate) fn workflow_created(&mut self, workflow: Workflow) {
        self.is_loading = false;
        self.workflows.push(workflow.clone());
        self.set_active_workflow(Some(workflow));
    }

    /// Replaces the list entry and, if open, the active workflow. The
    /// selection survives when its node still exists.
    pub(crate) fn workflow_updated(&mut self, workflow: Workflow) {
        self.is_loading = false;
        if let Some(entry) = self.workflows.iter_mut().find(|w| w.id == workflow.id) {
            *entry = workflow.clone();
        } else {
            self.workflows.push(workflow.clone());
        }
        if self
            .active_workflow
            .as_ref()
            .is_some_and(|w| w.id == workflow.id)
        {
            if let Some(node_id) = self.selected_node_id
                && !workflow.contains_node(node_id)
            {
                self.selected_node_id = None;
            }
            self.active_workflow = Some(workflow);
        }
    }

    pub(crate) fn workflow_deleted(&mut self, workflow_id: WorkflowId) {
        self.is_loading = false;
        self.workflows.retain(|w| w.id != workflow_id);
        if self
            .active_workflow
            .as_ref()
            .is_some_and(|w| w.id == workflow_id)
        {
            self.active_workflow = None;
            self.selected_node_id = None;
        }
    }

    pub(crate) fn executions_loaded(&mut self, executions: Vec<WorkflowExecution>) {
        self.is_loading = false;
        self.executions = executions;
    }

    pub(crate) fn execution_started(&mut self) {
        self.is_executing = true;
        self.error = None;
    }

    pub(crate) fn execution_accepted(&mut self, execution: WorkflowExecution) {
        self.is_executing = false;
        self.executions.insert(0, execution);
    }

    pub(crate) fn execution_rejected(&mut self, message: String) {
        self.is_executing = false;
        self.error = Some(message);
    }
}
