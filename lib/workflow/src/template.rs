//! Workflow templates and their instantiation.
//!
//! A template is a blueprint: nodes carry no ids, and connections refer to
//! nodes by their position in the blueprint list. Instantiation generates a
//! fresh id for every node and connection and remaps the endpoints onto the
//! new node ids.

use crate::connection::WorkflowConnection;
use crate::definition::WorkflowDraft;
use crate::error::TemplateError;
use crate::node::{NodeProperties, NodeType, Position, WorkflowNode};
use flowdesk_core::{ConnectionId, NodeId, TemplateId, WorkspaceId};
use serde::{Deserialize, Serialize};

/// A node blueprint without a concrete id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeBlueprint {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub position: Position,
    #[serde(default)]
    pub properties: Option<NodeProperties>,
}

/// A connection blueprint referring to nodes by blueprint index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionBlueprint {
    pub source: usize,
    pub target: usize,
    #[serde(default)]
    pub source_port: Option<String>,
    #[serde(default)]
    pub target_port: Option<String>,
}

/// A reusable workflow starting point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTemplate {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub nodes: Vec<NodeBlueprint>,
    #[serde(default)]
    pub connections: Vec<ConnectionBlueprint>,
}

impl WorkflowTemplate {
    /// Builds a workflow draft from this template.
    ///
    /// The draft uses `name` when given and the template name otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if a connection blueprint points past the node list.
    pub fn instantiate(
        &self,
        name: Option<String>,
        workspace_id: Option<WorkspaceId>,
    ) -> Result<WorkflowDraft, TemplateError> {
        let node_ids: Vec<NodeId> = self.nodes.iter().map(|_| NodeId::new()).collect();

        let lookup = |index: usize| {
            node_ids
                .get(index)
                .copied()
                .ok_or(TemplateError::NodeIndexOutOfRange {
                    template_id: self.id,
                    index,
                    node_count: node_ids.len(),
                })
        };

        let connections = self
            .connections
            .iter()
            .map(|blueprint| {
                Ok(WorkflowConnection {
                    id: ConnectionId::new(),
                    source_node_id: lookup(blueprint.source)?,
                    target_node_id: lookup(blueprint.target)?,
                    source_port: blueprint.source_port.clone(),
                    target_port: blueprint.target_port.clone(),
                })
            })
            .collect::<Result<Vec<_>, TemplateError>>()?;

        let nodes = self
            .nodes
            .iter()
            .zip(&node_ids)
            .map(|(blueprint, &id)| {
                let mut node =
                    WorkflowNode::new(blueprint.node_type, &blueprint.title, blueprint.position)
                        .with_description(&blueprint.description);
                node.id = id;
                if let Some(icon) = &blueprint.icon {
                    node.icon.clone_from(icon);
                }
                if let Some(color) = &blueprint.color {
                    node.color.clone_from(color);
                }
                if let Some(properties) = &blueprint.properties {
                    node = node.with_properties(properties.clone());
                }
                node
            })
            .collect();

        Ok(WorkflowDraft {
            name: name.unwrap_or_else(|| self.name.clone()),
            description: self.description.clone(),
            nodes,
            connections,
            is_active: false,
            tags: self.tags.clone(),
            workspace_id,
        })
    }
}
