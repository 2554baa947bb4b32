//! Workflow node types and typed property bags.
//!
//! Every node carries a [`NodeType`] tag, and its optional
//! [`NodeProperties`] is a sum type keyed by the same tag. A node's type is
//! fixed at creation; [`WorkflowNode::apply_update`] refuses properties of a
//! different type.

use crate::error::GraphError;
use flowdesk_core::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// The kind of work a node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Entry point that starts a run.
    Trigger,
    /// Performs a side effect (task, email, webhook call).
    Action,
    /// Evaluates a boolean expression to route the run.
    Condition,
    /// Reads data from a source.
    Data,
}

impl NodeType {
    /// Returns the lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Action => "action",
            Self::Condition => "condition",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A canvas-relative position in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn offset_from(&self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }
}

/// Properties of a trigger node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggerProperties {
    /// Mailbox that starts the workflow when it receives mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Inbound webhook URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Cron-style schedule expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

/// Properties of an action node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionProperties {
    /// Task to create or run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    /// Recipient address for email actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Outbound webhook target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

/// A single comparison rule of a condition node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRule {
    pub field: String,
    pub operator: String,
    pub value: JsonValue,
}

/// Properties of a condition node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionProperties {
    /// Boolean expression evaluated by the automation engine.
    #[serde(default)]
    pub expression: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ConditionRule>,
}

/// Properties of a data node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Typed property bag of a node, tagged by node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeProperties {
    Trigger(TriggerProperties),
    Action(ActionProperties),
    Condition(ConditionProperties),
    Data(DataProperties),
}

impl NodeProperties {
    /// Returns the node type these properties belong to.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        match self {
            Self::Trigger(_) => NodeType::Trigger,
            Self::Action(_) => NodeType::Action,
            Self::Condition(_) => NodeType::Condition,
            Self::Data(_) => NodeType::Data,
        }
    }

    /// Returns empty properties for the given node type.
    #[must_use]
    pub fn empty(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Trigger => Self::Trigger(TriggerProperties::default()),
            NodeType::Action => Self::Action(ActionProperties::default()),
            NodeType::Condition => Self::Condition(ConditionProperties::default()),
            NodeType::Data => Self::Data(DataProperties::default()),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// A node on the workflow canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Icon reference understood by the presentation layer.
    #[serde(default)]
    pub icon: String,
    /// Color token understood by the presentation layer.
    #[serde(default)]
    pub color: String,
    pub position: Position,
    /// True when the node is the source of at least one connection.
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<NodeProperties>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl WorkflowNode {
    /// Creates a node with a fresh id, default styling and empty properties.
    #[must_use]
    pub fn new(node_type: NodeType, title: impl Into<String>, position: Position) -> Self {
        Self {
            id: NodeId::new(),
            node_type,
            title: title.into(),
            description: String::new(),
            icon: default_icon(node_type).to_string(),
            color: default_color(node_type).to_string(),
            position,
            connected: false,
            properties: Some(NodeProperties::empty(node_type)),
            enabled: true,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the properties.
    ///
    /// Properties of a different type than the node are dropped.
    #[must_use]
    pub fn with_properties(mut self, properties: NodeProperties) -> Self {
        if properties.node_type() == self.node_type {
            self.properties = Some(properties);
        }
        self
    }

    /// Returns true if this node starts a run.
    #[must_use]
    pub fn is_trigger(&self) -> bool {
        self.node_type == NodeType::Trigger
    }

    /// Merges a partial update into this node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::PropertiesTypeMismatch`] if the update carries
    /// properties tagged with a different node type. The node is left
    /// unchanged in that case.
    pub fn apply_update(&mut self, update: NodeUpdate) -> Result<(), GraphError> {
        if let Some(properties) = &update.properties
            && properties.node_type() != self.node_type
        {
            return Err(GraphError::PropertiesTypeMismatch {
                node_id: self.id,
                node_type: self.node_type,
                properties_type: properties.node_type(),
            });
        }

        let NodeUpdate {
            title,
            description,
            icon,
            color,
            enabled,
            properties,
        } = update;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(icon) = icon {
            self.icon = icon;
        }
        if let Some(color) = color {
            self.color = color;
        }
        if let Some(enabled) = enabled {
            self.enabled = enabled;
        }
        if let Some(properties) = properties {
            self.properties = Some(properties);
        }
        Ok(())
    }
}

/// A partial update to a node. `None` fields are left untouched.
///
/// Neither the type nor the position can change here; positions move only
/// through [`Workflow::set_node_position`](crate::Workflow::set_node_position).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub enabled: Option<bool>,
    pub properties: Option<NodeProperties>,
}

impl NodeUpdate {
    /// An update that only changes the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns true if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn default_icon(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Trigger => "zap",
        NodeType::Action => "play",
        NodeType::Condition => "git-branch",
        NodeType::Data => "database",
    }
}

fn default_color(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Trigger => "green",
        NodeType::Action => "blue",
        NodeType::Condition => "amber",
        NodeType::Data => "purple",
    }
}
