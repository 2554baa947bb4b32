//! Render-ready view of the active workflow.

use crate::canvas::NodeFootprint;
use crate::render::{ConnectionPath, connection_path};
use crate::store::GraphStore;
use flowdesk_core::{ConnectionId, NodeId};
use flowdesk_workflow::{NodeType, Position};

/// A node box on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub node_id: NodeId,
    pub node_type: NodeType,
    pub title: String,
    pub icon: String,
    pub color: String,
    pub position: Position,
    pub selected: bool,
    pub enabled: bool,
}

/// A drawable connection.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConnection {
    pub connection_id: ConnectionId,
    pub path: ConnectionPath,
}

/// Everything the canvas draws for the active workflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasScene {
    pub nodes: Vec<NodeBox>,
    pub connections: Vec<SceneConnection>,
}

impl CanvasScene {
    /// Derives the scene from the store. Empty when no workflow is active.
    ///
    /// Connections animate while a run request is in flight or the workflow
    /// has an unfinished run. Connections with a missing endpoint are not
    /// drawn.
    #[must_use]
    pub fn from_store(store: &GraphStore, footprint: NodeFootprint) -> Self {
        let Some(workflow) = store.active_workflow() else {
            return Self::default();
        };
        let selected = store.selected_node().map(|n| n.id);
        let executing = store.is_workflow_running(workflow.id);

        let nodes = workflow
            .nodes
            .iter()
            .map(|node| NodeBox {
                node_id: node.id,
                node_type: node.node_type,
                title: node.title.clone(),
                icon: node.icon.clone(),
                color: node.color.clone(),
                position: node.position,
                selected: selected == Some(node.id),
                enabled: node.enabled,
            })
            .collect();

        let connections = workflow
            .connections
            .iter()
            .filter_map(|connection| {
                let source = workflow.node(connection.source_node_id)?;
                let target = workflow.node(connection.target_node_id)?;
                Some(SceneConnection {
                    connection_id: connection.id,
                    path: connection_path(source.position, target.position, footprint, executing),
                })
            })
            .collect();

        Self { nodes, connections }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdesk_workflow::{Workflow, WorkflowConnection, WorkflowExecution, WorkflowNode};

    fn store_with_edge() -> (GraphStore, NodeId) {
        let mut store = GraphStore::new();
        let mut workflow = Workflow::new("Scene");
        let a = WorkflowNode::new(NodeType::Trigger, "A", Position::new(0.0, 0.0));
        let b = WorkflowNode::new(NodeType::Action, "B", Position::new(300.0, 100.0));
        let id_a = a.id;
        workflow.add_node(a).expect("a");
        let id_b = b.id;
        workflow.add_node(b).expect("b");
        workflow
            .add_connection(WorkflowConnection::new(id_a, id_b))
            .expect("edge");
        store.set_active_workflow(Some(workflow));
        (store, id_a)
    }

    #[test]
    fn empty_without_active_workflow() {
        let scene = CanvasScene::from_store(&GraphStore::new(), NodeFootprint::default());
        assert!(scene.nodes.is_empty());
        assert!(scene.connections.is_empty());
    }

    #[test]
    fn marks_selection_and_draws_edges() {
        let (mut store, a) = store_with_edge();
        store.set_selected_node(Some(a)).expect("select");

        let scene = CanvasScene::from_store(&store, NodeFootprint::default());
        assert_eq!(scene.nodes.len(), 2);
        assert!(scene.nodes.iter().any(|n| n.node_id == a && n.selected));
        assert_eq!(scene.nodes.iter().filter(|n| n.selected).count(), 1);

        let edge = &scene.connections[0];
        assert_eq!(edge.path.start, Position::new(220.0, 36.0));
        assert_eq!(edge.path.end, Position::new(300.0, 136.0));
        assert!(!edge.path.is_active());
    }

    #[test]
    fn running_execution_animates_edges() {
        let (mut store, _) = store_with_edge();
        let workflow_id = store.active_workflow().map(|w| w.id).expect("active");
        store.execution_accepted(WorkflowExecution::started(workflow_id));

        let scene = CanvasScene::from_store(&store, NodeFootprint::default());
        assert!(scene.connections.iter().all(|c| c.path.is_active()));
    }

    #[test]
    fn dangling_connections_are_skipped() {
        let mut workflow = Workflow::new("Imported");
        let a = WorkflowNode::new(NodeType::Trigger, "A", Position::default());
        let id_a = a.id;
        workflow.nodes.push(a);
        workflow
            .connections
            .push(WorkflowConnection::new(id_a, NodeId::new()));
        let mut store = GraphStore::new();
        store.set_active_workflow(Some(workflow));

        let scene = CanvasScene::from_store(&store, NodeFootprint::default());
        assert_eq!(scene.nodes.len(), 1);
        assert!(scene.connections.is_empty());
    }
}
