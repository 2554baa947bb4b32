//! Workflow definition and its invariant-preserving graph operations.
//!
//! A workflow owns an ordered node list and a connection list. Node ids are
//! unique, and every connection endpoint names an existing node. The
//! mutation methods here are the only ones that keep both rules, so callers
//! should go through them instead of editing the vectors directly.

use crate::connection::WorkflowConnection;
use crate::error::GraphError;
use crate::node::{NodeUpdate, Position, WorkflowNode};
use chrono::{DateTime, Utc};
use flowdesk_core::{ConnectionId, NodeId, WorkflowId, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named automation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: WorkflowId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub connections: Vec<WorkflowConnection>,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,
}

impl Workflow {
    /// Creates an empty, inactive workflow.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: WorkflowId::new(),
            name: name.into(),
            description: String::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
            is_active: false,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
            workspace_id: None,
        }
    }

    /// Materializes a backend-assigned workflow from a draft.
    #[must_use]
    pub fn from_draft(id: WorkflowId, draft: WorkflowDraft, now: DateTime<Utc>) -> Self {
        let mut workflow = Self {
            id,
            name: draft.name,
            description: draft.description,
            nodes: draft.nodes,
            connections: draft.connections,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
            tags: draft.tags,
            workspace_id: draft.workspace_id,
        };
        workflow.refresh_connected_flags();
        workflow
    }

    /// Bumps `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn node(&self, node_id: NodeId) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    fn node_mut(&mut self, node_id: NodeId) -> Option<&mut WorkflowNode> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    /// Returns true if a node with the given id exists.
    #[must_use]
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.node(node_id).is_some()
    }

    /// Returns the number of trigger nodes.
    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_trigger()).count()
    }

    /// Returns the connections whose source or target is the node.
    pub fn connections_of(&self, node_id: NodeId) -> impl Iterator<Item = &WorkflowConnection> {
        self.connections.iter().filter(move |c| c.touches(node_id))
    }

    /// Appends a node.
    ///
    /// # Errors
    ///
    /// Returns an error if a node with the same id already exists.
    pub fn add_node(&mut self, node: WorkflowNode) -> Result<(), GraphError> {
        if self.contains_node(node.id) {
            return Err(GraphError::DuplicateNode { node_id: node.id });
        }
        self.nodes.push(node);
        self.refresh_connected_flags();
        self.touch();
        Ok(())
    }

    /// Merges a partial update into a node and returns the updated node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is missing or the update carries
    /// properties of another node type.
    pub fn update_node(
        &mut self,
        node_id: NodeId,
        update: NodeUpdate,
    ) -> Result<&WorkflowNode, GraphError> {
        let node = self
            .node_mut(node_id)
            .ok_or(GraphError::NodeNotFound { node_id })?;
        node.apply_update(update)?;
        self.touch();
        self.node(node_id).ok_or(GraphError::NodeNotFound { node_id })
    }

    /// Removes a node together with every connection touching it.
    ///
    /// Returns the removed node and the number of removed connections.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is missing.
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<(WorkflowNode, usize), GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == node_id)
            .ok_or(GraphError::NodeNotFound { node_id })?;
        let node = self.nodes.remove(index);

        let before = self.connections.len();
        self.connections.retain(|c| !c.touches(node_id));
        let removed = before - self.connections.len();

        self.refresh_connected_flags();
        self.touch();
        Ok((node, removed))
    }

    /// Sets a node position verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is missing.
    pub fn set_node_position(
        &mut self,
        node_id: NodeId,
        position: Position,
    ) -> Result<(), GraphError> {
        let node = self
            .node_mut(node_id)
            .ok_or(GraphError::NodeNotFound { node_id })?;
        node.position = position;
        self.touch();
        Ok(())
    }

    /// Adds a connection between two existing, distinct, not yet linked nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is missing, the connection is a
    /// self-loop, or the pair is already connected in this direction.
    pub fn add_connection(&mut self, connection: WorkflowConnection) -> Result<(), GraphError> {
        for endpoint in [connection.source_node_id, connection.target_node_id] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::DanglingEndpoint {
                    connection_id: connection.id,
                    node_id: endpoint,
                });
            }
        }
        if connection.source_node_id == connection.target_node_id {
            return Err(GraphError::SelfLoop {
                node_id: connection.source_node_id,
            });
        }
        if self
            .connections
            .iter()
            .any(|c| c.links(connection.source_node_id, connection.target_node_id))
        {
            return Err(GraphError::DuplicateConnection {
                source: connection.source_node_id,
                target: connection.target_node_id,
            });
        }

        self.connections.push(connection);
        self.refresh_connected_flags();
        self.touch();
        Ok(())
    }

    /// Removes a connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is missing.
    pub fn remove_connection(
        &mut self,
        connection_id: ConnectionId,
    ) -> Result<WorkflowConnection, GraphError> {
        let index = self
            .connections
            .iter()
            .position(|c| c.id == connection_id)
            .ok_or(GraphError::ConnectionNotFound { connection_id })?;
        let connection = self.connections.remove(index);
        self.refresh_connected_flags();
        self.touch();
        Ok(connection)
    }

    /// Recomputes every node's `connected` flag from the connection list.
    pub fn refresh_connected_flags(&mut self) {
        let sources: HashSet<NodeId> = self.connections.iter().map(|c| c.source_node_id).collect();
        for node in &mut self.nodes {
            node.connected = sources.contains(&node.id);
        }
    }

    /// Applies a partial update of workflow-level fields and graph contents.
    ///
    /// Connections whose endpoints are no longer nodes afterwards are dropped.
    pub fn apply_patch(&mut self, patch: WorkflowPatch) {
        let WorkflowPatch {
            name,
            description,
            nodes,
            connections,
            is_active,
            tags,
            workspace_id,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(nodes) = nodes {
            self.nodes = nodes;
        }
        if let Some(connections) = connections {
            self.connections = connections;
        }
        if let Some(is_active) = is_active {
            self.is_active = is_active;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        if let Some(workspace_id) = workspace_id {
            self.workspace_id = Some(workspace_id);
        }
        let node_ids: HashSet<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        self.connections.retain(|c| {
            node_ids.contains(&c.source_node_id) && node_ids.contains(&c.target_node_id)
        });
        self.refresh_connected_flags();
        self.touch();
    }
}

/// A workflow without backend-assigned id and timestamps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub connections: Vec<WorkflowConnection>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,
}

impl WorkflowDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A partial workflow update. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<WorkflowNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<WorkflowConnection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,
}

impl WorkflowPatch {
    /// A patch carrying the full graph of a workflow.
    #[must_use]
    pub fn graph_of(workflow: &Workflow) -> Self {
        Self {
            name: Some(workflow.name.clone()),
            description: Some(workflow.description.clone()),
            nodes: Some(workflow.nodes.clone()),
            connections: Some(workflow.connections.clone()),
            is_active: Some(workflow.is_active),
            ..Self::default()
        }
    }
}
