//! Command implementations.
//!
//! Backend-facing commands drive the editor's actions and orchestrator, then
//! format what ended up in the store. Formatting is kept in pure functions.

use crate::error::CliError;
use flowdesk_automation::AutomationBackend;
use flowdesk_core::WorkflowId;
use flowdesk_editor::{
    CanvasBounds, CanvasScene, ExecutionOrchestrator, GraphStore, NodeFootprint, SharedStore,
    WorkflowActions,
};
use flowdesk_workflow::{
    ValidationReport, Workflow, WorkflowExecution, WorkflowStats, validate,
};
use rootcause::Report;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

fn store_error(store: &SharedStore) -> Report<CliError> {
    let message = store.read(|s| s.error().unwrap_or("request failed").to_string());
    CliError::Backend { message }.into()
}

/// Loads the workflow list and opens one workflow in the store.
async fn open_workflow<B: AutomationBackend>(
    actions: &WorkflowActions<B>,
    workflow_id: WorkflowId,
) -> Result<Workflow, Report<CliError>> {
    if !actions.load_workflows().await {
        return Err(store_error(actions.store()));
    }
    let workflow = actions.store().update(|s| {
        let workflow = s.workflows().iter().find(|w| w.id == workflow_id).cloned();
        s.set_active_workflow(workflow.clone());
        workflow
    });
    workflow.ok_or_else(|| CliError::WorkflowNotFound { workflow_id }.into())
}

/// `flowdesk list`
pub async fn list<B: AutomationBackend>(
    actions: &WorkflowActions<B>,
) -> Result<String, Report<CliError>> {
    if !actions.load_workflows().await {
        return Err(store_error(actions.store()));
    }
    Ok(actions
        .store()
        .read(|s| format_workflow_list(s.filtered_workflows(), &s.stats())))
}

/// `flowdesk validate <id>`
pub async fn validate_remote<B: AutomationBackend>(
    actions: &WorkflowActions<B>,
    workflow_id: WorkflowId,
) -> Result<ValidationReport, Report<CliError>> {
    open_workflow(actions, workflow_id).await?;
    actions
        .store()
        .read(GraphStore::validate_active)
        .ok_or_else(|| CliError::WorkflowNotFound { workflow_id }.into())
}

/// `flowdesk validate --file <path>`
pub fn validate_file(path: &Path) -> Result<ValidationReport, Report<CliError>> {
    let workflow = read_workflow_file(path)?;
    Ok(validate(&workflow))
}

/// Reads a workflow document from JSON.
pub fn read_workflow_file(path: &Path) -> Result<Workflow, Report<CliError>> {
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: display.clone(),
        details: e.to_string(),
    })?;
    let workflow = serde_json::from_str(&content).map_err(|e| CliError::Parse {
        path: display,
        details: e.to_string(),
    })?;
    Ok(workflow)
}

/// `flowdesk render <id>`
pub async fn render<B: AutomationBackend>(
    actions: &WorkflowActions<B>,
    workflow_id: WorkflowId,
    bounds: CanvasBounds,
    footprint: NodeFootprint,
) -> Result<String, Report<CliError>> {
    open_workflow(actions, workflow_id).await?;
    let scene = actions
        .store()
        .read(|s| CanvasScene::from_store(s, footprint));
    Ok(format_scene(&scene, bounds))
}

/// `flowdesk run <id>`
pub async fn run<B: AutomationBackend>(
    actions: &WorkflowActions<B>,
    orchestrator: &ExecutionOrchestrator<B>,
    workflow_id: WorkflowId,
) -> Result<WorkflowExecution, Report<CliError>> {
    let connection = actions.refresh_connection().await;
    info!(connected = connection.is_connected, "probed automation engine");
    open_workflow(actions, workflow_id).await?;

    match orchestrator.run_workflow(workflow_id).await {
        Some(execution) => Ok(execution),
        None => Err(store_error(orchestrator.store())),
    }
}

/// One line per workflow followed by a summary line.
#[must_use]
pub fn format_workflow_list<'a>(
    workflows: impl IntoIterator<Item = &'a Workflow>,
    stats: &WorkflowStats,
) -> String {
    let mut out = String::new();
    for workflow in workflows {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{} nodes",
            workflow.id,
            if workflow.is_active { "active" } else { "inactive" },
            workflow.name,
            workflow.nodes.len()
        );
    }
    let _ = writeln!(
        out,
        "{} workflows ({} active), {} executions, {:.1}% success",
        stats.total_workflows, stats.active_workflows, stats.total_executions, stats.success_rate
    );
    out
}

/// Human-readable validation result.
#[must_use]
pub fn format_report(report: &ValidationReport) -> String {
    let mut out = String::from(if report.is_valid { "valid\n" } else { "invalid\n" });
    for issue in &report.issues {
        let severity = if issue.is_blocking() { "error" } else { "warning" };
        let _ = writeln!(out, "  {severity}: {issue}");
    }
    out
}

/// The canvas view box, then one line per drawable connection: id and SVG
/// path data.
#[must_use]
pub fn format_scene(scene: &CanvasScene, bounds: CanvasBounds) -> String {
    let mut out = format!("viewBox 0 0 {} {}\n", bounds.width, bounds.height);
    for connection in &scene.connections {
        let _ = writeln!(out, "{}\t{}", connection.connection_id, connection.path.to_svg_d());
    }
    out
}
