//! `flowdesk` command-line client.
//!
//! Sub-commands:
//! - `list`: list workflows with a stats summary
//! - `validate`: validate a workflow by id, or a JSON file with `--file`
//! - `render`: print the SVG path of every connection of a workflow
//! - `run`: request a run and print the returned execution

mod commands;
mod config;
mod error;

use crate::config::CliConfig;
use crate::error::CliError;
use clap::{Parser, Subcommand};
use flowdesk_automation::{HttpAutomationBackend, HttpBackendConfig};
use flowdesk_core::WorkflowId;
use flowdesk_editor::{ExecutionOrchestrator, SharedStore, WorkflowActions};
use rootcause::Report;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "flowdesk", about = "Inspect and run flowdesk workflows", version)]
struct Cli {
    /// Configuration file; environment variables override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List workflows.
    List,
    /// Validate a workflow.
    Validate {
        /// Workflow id on the automation backend.
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        workflow_id: Option<WorkflowId>,
        /// Validate a workflow JSON file instead.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print connection paths of a workflow.
    Render { workflow_id: WorkflowId },
    /// Run a workflow.
    Run { workflow_id: WorkflowId },
}

fn backend(config: &CliConfig) -> Result<Arc<HttpAutomationBackend>, Report<CliError>> {
    let settings: &HttpBackendConfig = config.automation.as_ref().ok_or(CliError::MissingBackend)?;
    let backend = HttpAutomationBackend::new(settings.clone()).map_err(|report| CliError::Config {
        details: report.current_context().to_string(),
    })?;
    Ok(Arc::new(backend))
}

fn actions(config: &CliConfig) -> Result<WorkflowActions<HttpAutomationBackend>, Report<CliError>> {
    Ok(WorkflowActions::new(SharedStore::default(), backend(config)?))
}

async fn execute(cli: Cli) -> Result<ExitCode, Report<CliError>> {
    let config = CliConfig::load(cli.config.as_deref()).map_err(|e| CliError::Config {
        details: e.to_string(),
    })?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Command::List => {
            print!("{}", commands::list(&actions(&config)?).await?);
        }
        Command::Validate { workflow_id, file } => {
            let report = match (file, workflow_id) {
                (Some(path), _) => commands::validate_file(&path)?,
                (None, Some(workflow_id)) => {
                    commands::validate_remote(&actions(&config)?, workflow_id).await?
                }
                (None, None) => return Ok(ExitCode::FAILURE),
            };
            print!("{}", commands::format_report(&report));
            if !report.is_valid {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Render { workflow_id } => {
            let actions = actions(&config)?;
            print!("{}", commands::render(&actions, workflow_id, config.canvas, config.node).await?);
        }
        Command::Run { workflow_id } => {
            let backend = backend(&config)?;
            let store = SharedStore::default();
            let actions = WorkflowActions::new(store.clone(), Arc::clone(&backend));
            let orchestrator = ExecutionOrchestrator::new(store, backend);
            let execution = commands::run(&actions, &orchestrator, workflow_id).await?;
            let json = serde_json::to_string_pretty(&execution).map_err(|e| CliError::Backend {
                message: e.to_string(),
            })?;
            println!("{json}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match execute(Cli::parse()).await {
        Ok(code) => code,
        Err(report) => {
            tracing::error!(error = %report, "command failed");
            eprintln!("error: {}", report.current_context());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn validate_takes_id_or_file() {
        let id = WorkflowId::new();
        let id_arg = id.to_string();
        let cli = Cli::try_parse_from(["flowdesk", "validate", id_arg.as_str()]).expect("by id");
        assert!(matches!(
            cli.command,
            Command::Validate { workflow_id: Some(parsed), file: None } if parsed == id
        ));

        let cli = Cli::try_parse_from(["flowdesk", "validate", "--file", "wf.json"]).expect("by file");
        assert!(matches!(cli.command, Command::Validate { file: Some(_), .. }));

        assert!(Cli::try_parse_from(["flowdesk", "validate"]).is_err());
        assert!(Cli::try_parse_from(["flowdesk", "validate", id_arg.as_str(), "--file", "x"]).is_err());
    }

    #[test]
    fn run_rejects_malformed_id() {
        assert!(Cli::try_parse_from(["flowdesk", "run", "not-an-id"]).is_err());
    }

    #[test]
    fn missing_backend_is_reported() {
        let config = CliConfig {
            automation: None,
            canvas: Default::default(),
            node: Default::default(),
        };
        let err = backend(&config).expect_err("no backend");
        assert_eq!(err.current_context(), &CliError::MissingBackend);
    }
}
