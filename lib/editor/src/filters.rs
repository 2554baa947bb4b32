//! Workflow list filters.

use flowdesk_core::WorkspaceId;
use flowdesk_workflow::Workflow;
use serde::{Deserialize, Serialize};

/// Filter on a workflow's `is_active` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Active,
    Inactive,
}

/// Filters applied to the workflow list. `None` means "any".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkflowFilters {
    /// Matches workflows carrying this tag.
    pub category: Option<String>,
    pub status: Option<StatusFilter>,
    pub workspace: Option<WorkspaceId>,
}

impl WorkflowFilters {
    /// Returns true if the workflow passes every set filter.
    #[must_use]
    pub fn matches(&self, workflow: &Workflow) -> bool {
        let category_ok = self
            .category
            .as_ref()
            .is_none_or(|category| workflow.tags.iter().any(|t| t.eq_ignore_ascii_case(category)));
        let status_ok = self.status.is_none_or(|status| match status {
            StatusFilter::Active => workflow.is_active,
            StatusFilter::Inactive => !workflow.is_active,
        });
        let workspace_ok = self
            .workspace
            .is_none_or(|workspace| workflow.workspace_id == Some(workspace));

        category_ok && status_ok && workspace_ok
    }

    /// Merges a partial update into these filters.
    pub fn apply(&mut self, update: FilterUpdate) {
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(workspace) = update.workspace {
            self.workspace = workspace;
        }
    }
}

/// A partial filter update.
///
/// The outer `Option` says whether the field changes; the inner one is the
/// new value, so `Some(None)` clears a filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterUpdate {
    pub category: Option<Option<String>>,
    pub status: Option<Option<StatusFilter>>,
    pub workspace: Option<Option<WorkspaceId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflow(active: bool, tags: &[&str], workspace: Option<WorkspaceId>) -> Workflow {
        let mut workflow = Workflow::new("w");
        workflow.is_active = active;
        workflow.tags = tags.iter().map(ToString::to_string).collect();
        workflow.workspace_id = workspace;
        workflow
    }

    #[test]
    fn default_matches_everything() {
        let filters = WorkflowFilters::default();
        assert!(filters.matches(&workflow(false, &[], None)));
        assert!(filters.matches(&workflow(true, &["sales"], Some(WorkspaceId::new()))));
    }

    #[test]
    fn filters_combine() {
        let workspace = WorkspaceId::new();
        let filters = WorkflowFilters {
            category: Some("Sales".to_string()),
            status: Some(StatusFilter::Active),
            workspace: Some(workspace),
        };

        assert!(filters.matches(&workflow(true, &["sales"], Some(workspace))));
        assert!(!filters.matches(&workflow(false, &["sales"], Some(workspace))));
        assert!(!filters.matches(&workflow(true, &["support"], Some(workspace))));
        assert!(!filters.matches(&workflow(true, &["sales"], None)));
    }

    #[test]
    fn apply_sets_and_clears() {
        let mut filters = WorkflowFilters::default();
        filters.apply(FilterUpdate {
            status: Some(Some(StatusFilter::Inactive)),
            category: Some(Some("ops".to_string())),
            ..FilterUpdate::default()
        });
        assert_eq!(filters.status, Some(StatusFilter::Inactive));

        filters.apply(FilterUpdate {
            category: Some(None),
            ..FilterUpdate::default()
        });
        assert_eq!(filters.category, None);
        assert_eq!(filters.status, Some(StatusFilter::Inactive));
    }
}
