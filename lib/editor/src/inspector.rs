//! Node inspector form.
//!
//! The form is built from a node and exposes the property fields of that
//! node's type only. Saving sends `{title, description, enabled, properties}`
//! to the store; the properties always carry the node's own type tag.

use crate::error::{InspectorError, StoreError};
use crate::store::GraphStore;
use flowdesk_core::NodeId;
use flowdesk_workflow::{NodeProperties, NodeType, NodeUpdate, WorkflowNode};
use tracing::debug;

/// One editable text field of the property section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Editable copy of a node's inspector-visible fields.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorForm {
    node_id: NodeId,
    pub title: String,
    pub description: String,
    pub enabled: bool,
    properties: NodeProperties,
}

impl InspectorForm {
    /// Builds the form for a node. Missing or mistagged properties start
    /// empty.
    #[must_use]
    pub fn from_node(node: &WorkflowNode) -> Self {
        let properties = node
            .properties
            .clone()
            .filter(|p| p.node_type() == node.node_type)
            .unwrap_or_else(|| NodeProperties::empty(node.node_type));
        Self {
            node_id: node.id,
            title: node.title.clone(),
            description: node.description.clone(),
            enabled: node.enabled,
            properties,
        }
    }

    #[must_use]
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.properties.node_type()
    }

    #[must_use]
    pub fn properties(&self) -> &NodeProperties {
        &self.properties
    }

    /// The property fields shown for this node type, in display order.
    #[must_use]
    pub fn fields(&self) -> Vec<FormField> {
        fn field(name: &'static str, label: &'static str, value: Option<&String>) -> FormField {
            FormField {
                name,
                label,
                value: value.cloned().unwrap_or_default(),
            }
        }

        match &self.properties {
            NodeProperties::Trigger(p) => vec![
                field("email", "Email address", p.email.as_ref()),
                field("webhook_url", "Webhook URL", p.webhook_url.as_ref()),
                field("schedule", "Schedule", p.schedule.as_ref()),
            ],
            NodeProperties::Action(p) => vec![
                field("task", "Task", p.task.as_ref()),
                field("email", "Recipient", p.email.as_ref()),
                field("webhook_url", "Webhook URL", p.webhook_url.as_ref()),
            ],
            NodeProperties::Condition(p) => {
                vec![field("expression", "Condition", Some(&p.expression))]
            }
            NodeProperties::Data(p) => vec![
                field("source", "Data source", p.source.as_ref()),
                field("query", "Query", p.query.as_ref()),
            ],
        }
    }

    /// Sets a property field from its text input. Blank input clears
    /// optional fields.
    ///
    /// # Errors
    ///
    /// Returns an error if this node type has no such field.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), InspectorError> {
        let value = value.into();
        let slot = match (&mut self.properties, name) {
            (NodeProperties::Trigger(p), "email") => &mut p.email,
            (NodeProperties::Trigger(p), "webhook_url") => &mut p.webhook_url,
            (NodeProperties::Trigger(p), "schedule") => &mut p.schedule,
            (NodeProperties::Action(p), "task") => &mut p.task,
            (NodeProperties::Action(p), "email") => &mut p.email,
            (NodeProperties::Action(p), "webhook_url") => &mut p.webhook_url,
            (NodeProperties::Data(p), "source") => &mut p.source,
            (NodeProperties::Data(p), "query") => &mut p.query,
            (NodeProperties::Condition(p), "expression") => {
                p.expression = value;
                return Ok(());
            }
            (properties, _) => {
                return Err(InspectorError::UnknownField {
                    node_type: properties.node_type(),
                    field: name.to_string(),
                });
            }
        };
        *slot = non_blank(value);
        Ok(())
    }

    /// The update sent to the store on save.
    #[must_use]
    pub fn into_update(self) -> NodeUpdate {
        NodeUpdate {
            title: Some(self.title),
            description: Some(self.description),
            enabled: Some(self.enabled),
            properties: Some(self.properties),
            ..NodeUpdate::default()
        }
    }

    /// Writes the form back to its node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is no longer in the active workflow or
    /// its type no longer matches the form.
    pub fn save(self, store: &mut GraphStore) -> Result<(), StoreError> {
        let node_id = self.node_id;
        store.update_node(node_id, self.into_update())?;
        debug!(node_id = %node_id, "inspector saved");
        Ok(())
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
