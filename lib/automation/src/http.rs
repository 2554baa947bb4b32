//! JSON-over-HTTP automation backend.
//!
//! Routes, relative to `base_url`:
//!
//! | Operation | Route |
//! |---|---|
//! | fetch_workflows | `GET /workflows` |
//! | create_workflow | `POST /workflows` |
//! | update_workflow | `PATCH /workflows/{id}` |
//! | delete_workflow | `DELETE /workflows/{id}` |
//! | fetch_templates | `GET /templates` |
//! | execute_workflow | `POST /workflows/{id}/execute` |
//! | fetch_executions | `GET /workflows/{id}/executions` |
//! | check_connection | `GET /health` |

use crate::backend::AutomationBackend;
use crate::connection::AutomationConnection;
use crate::error::BackendError;
use async_trait::async_trait;
use flowdesk_core::WorkflowId;
use flowdesk_workflow::{Workflow, WorkflowDraft, WorkflowExecution, WorkflowPatch, WorkflowTemplate};
use reqwest::{Client, RequestBuilder, StatusCode};
use rootcause::Report;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Connection settings for [`HttpAutomationBackend`].
#[derive(Debug, Clone, Deserialize)]
pub struct HttpBackendConfig {
    /// Base URL of the automation service, e.g. `http://localhost:5678/api`.
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

impl HttpBackendConfig {
    /// Creates a config with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Automation backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAutomationBackend {
    client: Client,
    base_url: String,
}

impl HttpAutomationBackend {
    /// Builds a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty or the HTTP client cannot
    /// be constructed.
    pub fn new(config: HttpBackendConfig) -> Result<Self, Report<BackendError>> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(BackendError::InvalidConfig {
                details: "base_url is empty".to_string(),
            }
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| BackendError::InvalidConfig {
                details: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends a request. `resource` names what the request addresses and is
    /// reported back when the backend answers 404.
    async fn send(
        operation: &str,
        resource: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, Report<BackendError>> {
        let response = request.send().await.map_err(|e| BackendError::Request {
            operation: operation.to_string(),
            details: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(operation, status = status.as_u16(), "automation backend rejected request");
        Err(rejection(operation, resource, status, body).into())
    }

    async fn send_json<T: DeserializeOwned>(
        operation: &str,
        resource: &str,
        request: RequestBuilder,
    ) -> Result<T, Report<BackendError>> {
        let response = Self::send(operation, resource, request).await?;
        let value = response.json::<T>().await.map_err(|e| BackendError::Decode {
            operation: operation.to_string(),
            details: e.to_string(),
        })?;
        Ok(value)
    }
}

fn rejection(operation: &str, resource: &str, status: StatusCode, body: String) -> BackendError {
    if status == StatusCode::NOT_FOUND {
        return BackendError::NotFound {
            operation: operation.to_string(),
            id: resource.to_string(),
        };
    }
    BackendError::Status {
        operation: operation.to_string(),
        status: status.as_u16(),
        body,
    }
}

#[async_trait]
impl AutomationBackend for HttpAutomationBackend {
    #[instrument(skip(self))]
    async fn fetch_workflows(&self) -> Result<Vec<Workflow>, Report<BackendError>> {
        let workflows: Vec<Workflow> = Self::send_json(
            "fetch_workflows",
            "workflows",
            self.client.get(self.url("workflows")),
        )
        .await?;
        debug!(count = workflows.len(), "fetched workflows");
        Ok(workflows)
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create_workflow(&self, draft: WorkflowDraft) -> Result<Workflow, Report<BackendError>> {
        Self::send_json(
            "create_workflow",
            "workflows",
            self.client.post(self.url("workflows")).json(&draft),
        )
        .await
    }

    #[instrument(skip(self, patch), fields(workflow_id = %workflow_id))]
    async fn update_workflow(
        &self,
        workflow_id: WorkflowId,
        patch: WorkflowPatch,
    ) -> Result<Workflow, Report<BackendError>> {
        Self::send_json(
            "update_workflow",
            &workflow_id.to_string(),
            self.client
                .patch(self.url(&format!("workflows/{workflow_id}")))
                .json(&patch),
        )
        .await
    }

    #[instrument(skip(self), fields(workflow_id = %workflow_id))]
    async fn delete_workflow(&self, workflow_id: WorkflowId) -> Result<(), Report<BackendError>> {
        Self::send(
            "delete_workflow",
            &workflow_id.to_string(),
            self.client
                .delete(self.url(&format!("workflows/{workflow_id}"))),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_templates(&self) -> Result<Vec<WorkflowTemplate>, Report<BackendError>> {
        Self::send_json(
            "fetch_templates",
            "templates",
            self.client.get(self.url("templates")),
        )
        .await
    }

    #[instrument(skip(self), fields(workflow_id = %workflow_id))]
    async fn execute_workflow(
        &self,
        workflow_id: WorkflowId,
    ) -> Result<WorkflowExecution, Report<BackendError>> {
        Self::send_json(
            "execute_workflow",
            &workflow_id.to_string(),
            self.client
                .post(self.url(&format!("workflows/{workflow_id}/execute"))),
        )
        .await
    }

    #[instrument(skip(self), fields(workflow_id = %workflow_id))]
    async fn fetch_executions(
        &self,
        workflow_id: WorkflowId,
    ) -> Result<Vec<WorkflowExecution>, Report<BackendError>> {
        Self::send_json(
            "fetch_executions",
            &workflow_id.to_string(),
            self.client
                .get(self.url(&format!("workflows/{workflow_id}/executions"))),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn check_connection(&self) -> AutomationConnection {
        let probe = Self::send("check_connection", "health", self.client.get(self.url("health")));
        match probe.await {
            Ok(_) => AutomationConnection::connected(&self.base_url),
            Err(report) => {
                warn!(error = %report, "automation engine unreachable");
                AutomationConnection::failed(&self.base_url, report.current_context().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_timeout() {
        let config: HttpBackendConfig =
            serde_json::from_value(serde_json::json!({ "base_url": "http://engine" }))
                .expect("deserialize");
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn url_joins_without_double_slashes() {
        let backend =
            HttpAutomationBackend::new(HttpBackendConfig::new("http://engine/api/")).expect("client");
        assert_eq!(backend.base_url(), "http://engine/api");
        assert_eq!(backend.url("workflows"), "http://engine/api/workflows");
        assert_eq!(backend.url("/health"), "http://engine/api/health");
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = HttpAutomationBackend::new(HttpBackendConfig::new("  ")).expect_err("empty");
        assert!(matches!(
            err.current_context(),
            BackendError::InvalidConfig { .. }
        ));
    }

    #[test]
    fn not_found_names_the_requested_workflow() {
        let workflow_id = WorkflowId::new();
        let error = rejection(
            "delete_workflow",
            &workflow_id.to_string(),
            StatusCode::NOT_FOUND,
            "<html><body>Not Found</body></html>".to_string(),
        );
        assert_eq!(
            error,
            BackendError::NotFound {
                operation: "delete_workflow".to_string(),
                id: workflow_id.to_string(),
            }
        );
        assert_eq!(
            error.to_string(),
            format!("delete_workflow: {workflow_id} not found")
        );
    }

    #[test]
    fn other_statuses_keep_the_body() {
        let error = rejection(
            "fetch_templates",
            "templates",
            StatusCode::BAD_GATEWAY,
            "upstream down".to_string(),
        );
        assert!(matches!(
            error,
            BackendError::Status { status: 502, ref body, .. } if body == "upstream down"
        ));
    }

    #[tokio::test]
    async fn unreachable_engine_reports_failed_connection() {
        let backend = HttpAutomationBackend::new(HttpBackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
        })
        .expect("client");

        let state = backend.check_connection().await;
        assert!(!state.is_connected);
        assert!(state.error.is_some());
        assert_eq!(state.connection_url.as_deref(), Some("http://127.0.0.1:9"));
    }

    #[tokio::test]
    async fn request_failure_maps_to_request_error() {
        let backend = HttpAutomationBackend::new(HttpBackendConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
        })
        .expect("client");

        let err = backend.fetch_workflows().await.expect_err("no server");
        match err.current_context() {
            BackendError::Request { operation, .. } => assert_eq!(operation, "fetch_workflows"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
