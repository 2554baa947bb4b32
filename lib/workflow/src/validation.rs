//! Advisory structural validation of a workflow graph.
//!
//! Validation never fails and never blocks editing. A workflow is valid when
//! it has at least one node and at least one trigger node. Disconnected
//! non-trigger nodes, dangling connections and cycles are listed as issues
//! but do not change validity.

use crate::definition::Workflow;
use flowdesk_core::{ConnectionId, NodeId};
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single structural problem found in a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The workflow has no nodes at all.
    Empty,
    /// No node of type `trigger` exists.
    MissingTrigger,
    /// Non-trigger nodes that are not an endpoint of any connection.
    DisconnectedNodes { count: usize },
    /// A connection names a node that is not in the workflow.
    DanglingConnection { connection_id: ConnectionId },
    /// The connections form at least one directed cycle.
    Cycle,
}

impl ValidationIssue {
    /// Returns true if this issue makes the workflow invalid.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Empty | Self::MissingTrigger)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Workflow must have at least one node"),
            Self::MissingTrigger => write!(f, "Workflow must have at least one trigger node"),
            Self::DisconnectedNodes { count } => write!(f, "{count} node(s) are not connected"),
            Self::DanglingConnection { connection_id } => {
                write!(f, "Connection {connection_id} references a missing node")
            }
            Self::Cycle => write!(f, "Workflow contains a cycle"),
        }
    }
}

/// The outcome of validating a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
    /// Ids of the non-trigger nodes with no connection, in node order.
    pub disconnected_nodes: Vec<NodeId>,
}

impl ValidationReport {
    /// Human-readable messages for every issue.
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Returns true if the given issue was reported.
    #[must_use]
    pub fn has(&self, issue: &ValidationIssue) -> bool {
        self.issues.contains(issue)
    }
}

/// Validates a workflow.
#[must_use]
pub fn validate(workflow: &Workflow) -> ValidationReport {
    let mut issues = Vec::new();

    if workflow.nodes.is_empty() {
        issues.push(ValidationIssue::Empty);
    }
    if workflow.trigger_count() == 0 {
        issues.push(ValidationIssue::MissingTrigger);
    }

    let endpoints: HashSet<NodeId> = workflow
        .connections
        .iter()
        .flat_map(|c| [c.source_node_id, c.target_node_id])
        .collect();
    let disconnected_nodes: Vec<NodeId> = workflow
        .nodes
        .iter()
        .filter(|n| !n.is_trigger() && !endpoints.contains(&n.id))
        .map(|n| n.id)
        .collect();
    if !disconnected_nodes.is_empty() {
        issues.push(ValidationIssue::DisconnectedNodes {
            count: disconnected_nodes.len(),
        });
    }

    let mut graph = DiGraph::<NodeId, ()>::new();
    let indices: HashMap<NodeId, _> = workflow
        .nodes
        .iter()
        .map(|n| (n.id, graph.add_node(n.id)))
        .collect();
    for connection in &workflow.connections {
        match (
            indices.get(&connection.source_node_id),
            indices.get(&connection.target_node_id),
        ) {
            (Some(&source), Some(&target)) => {
                graph.add_edge(source, target, ());
            }
            _ => issues.push(ValidationIssue::DanglingConnection {
                connection_id: connection.id,
            }),
        }
    }
    if petgraph::algo::is_cyclic_directed(&graph) {
        issues.push(ValidationIssue::Cycle);
    }

    let is_valid = !issues.iter().any(ValidationIssue::is_blocking);
    ValidationReport {
        is_valid,
        issues,
        disconnected_nodes,
    }
}
