//! Directed connections between nodes.

use flowdesk_core::{ConnectionId, NodeId};
use serde::{Deserialize, Serialize};

/// A directed edge from one node's output port to another node's input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConnection {
    pub id: ConnectionId,
    pub source_node_id: NodeId,
    pub target_node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<String>,
}

impl WorkflowConnection {
    /// Creates a connection with a fresh id and unnamed ports.
    #[must_use]
    pub fn new(source_node_id: NodeId, target_node_id: NodeId) -> Self {
        Self {
            id: ConnectionId::new(),
            source_node_id,
            target_node_id,
            source_port: None,
            target_port: None,
        }
    }

    /// Names the ports at both ends.
    #[must_use]
    pub fn with_ports(mut self, source_port: impl Into<String>, target_port: impl Into<String>) -> Self {
        self.source_port = Some(source_port.into());
        self.target_port = Some(target_port.into());
        self
    }

    /// Returns true if the node is either endpoint of this connection.
    #[must_use]
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.source_node_id == node_id || self.target_node_id == node_id
    }

    /// Returns true if this connection links the same pair in the same direction.
    #[must_use]
    pub fn links(&self, source: NodeId, target: NodeId) -> bool {
        self.source_node_id == source && self.target_node_id == target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touches_either_endpoint() {
        let a = NodeId::new();
        let b = NodeId::new();
        let c = NodeId::new();
        let conn = WorkflowConnection::new(a, b);

        assert!(conn.touches(a));
        assert!(conn.touches(b));
        assert!(!conn.touches(c));
    }

    #[test]
    fn links_is_directional() {
        let a = NodeId::new();
        let b = NodeId::new();
        let conn = WorkflowConnection::new(a, b).with_ports("out", "in");

        assert!(conn.links(a, b));
        assert!(!conn.links(b, a));
        assert_eq!(conn.source_port.as_deref(), Some("out"));
    }

    #[test]
    fn unnamed_ports_are_omitted_on_the_wire() {
        let conn = WorkflowConnection::new(NodeId::new(), NodeId::new());
        let json = serde_json::to_value(&conn).expect("serialize");
        assert!(json.get("sourcePort").is_none());
        assert!(json.get("sourceNodeId").is_some());
    }
}
