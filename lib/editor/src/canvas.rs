//! Canvas interaction: turns pointer events into store mutations.
//!
//! The controller is the only writer of node positions. Drag is a two-state
//! machine:
//!
//! ```text
//! Idle --pointer_down(node)--> Dragging --pointer_up / pointer_leave--> Idle
//! ```
//!
//! On grab the controller records `offset = pointer - node`, so the node
//! keeps its grab point while following the pointer, and every candidate
//! position is clamped into the canvas before it reaches the store.

use crate::store::GraphStore;
use flowdesk_core::NodeId;
use flowdesk_workflow::Position;
use serde::Deserialize;
use tracing::{debug, warn};

/// Size of the drawable canvas.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CanvasBounds {
    #[serde(default = "default_canvas_width")]
    pub width: f64,
    #[serde(default = "default_canvas_height")]
    pub height: f64,
}

fn default_canvas_width() -> f64 {
    1000.0
}

fn default_canvas_height() -> f64 {
    600.0
}

impl Default for CanvasBounds {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

/// Fixed on-canvas size of every node.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct NodeFootprint {
    #[serde(default = "default_node_width")]
    pub width: f64,
    #[serde(default = "default_node_height")]
    pub height: f64,
}

fn default_node_width() -> f64 {
    220.0
}

fn default_node_height() -> f64 {
    72.0
}

impl Default for NodeFootprint {
    fn default() -> Self {
        Self {
            width: default_node_width(),
            height: default_node_height(),
        }
    }
}

/// Clamps a candidate node position so the whole node stays on the canvas.
///
/// A node larger than the canvas is pinned to the origin. Non-finite input
/// coordinates map to 0.
#[must_use]
pub fn clamp_position(candidate: Position, bounds: CanvasBounds, footprint: NodeFootprint) -> Position {
    let max_x = (bounds.width - footprint.width).max(0.0);
    let max_y = (bounds.height - footprint.height).max(0.0);
    Position::new(clamp_axis(candidate.x, max_x), clamp_axis(candidate.y, max_y))
}

fn clamp_axis(value: f64, max: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, max) } else { 0.0 }
}

/// Pointer session state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        node_id: NodeId,
        /// Pointer position relative to the node origin at grab time.
        offset: Position,
        /// Set once the pointer has moved during this session.
        moved: bool,
    },
}

impl DragState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Converts pointer events on the canvas into graph mutations.
#[derive(Debug, Clone, Default)]
pub struct CanvasController {
    bounds: CanvasBounds,
    footprint: NodeFootprint,
    state: DragState,
    /// The click that follows a drag's pointer-up must not change selection.
    suppress_click: bool,
}

impl CanvasController {
    #[must_use]
    pub fn new(bounds: CanvasBounds, footprint: NodeFootprint) -> Self {
        Self {
            bounds,
            footprint,
            state: DragState::Idle,
            suppress_click: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn bounds(&self) -> CanvasBounds {
        self.bounds
    }

    #[must_use]
    pub fn footprint(&self) -> NodeFootprint {
        self.footprint
    }

    /// Starts a drag on a node of the active workflow.
    ///
    /// Returns false, leaving the controller idle, if the node is not on the
    /// canvas.
    pub fn pointer_down(&mut self, store: &GraphStore, node_id: NodeId, pointer: Position) -> bool {
        let Some(node) = store.active_workflow().and_then(|w| w.node(node_id)) else {
            debug!(node_id = %node_id, "pointer down on unknown node");
            return false;
        };
        self.state = DragState::Dragging {
            node_id,
            offset: pointer.offset_from(node.position),
            moved: false,
        };
        self.suppress_click = false;
        true
    }

    /// Moves the dragged node to follow the pointer.
    ///
    /// Returns the clamped position dispatched to the store, or `None` when
    /// idle.
    pub fn pointer_move(&mut self, store: &mut GraphStore, pointer: Position) -> Option<Position> {
        let DragState::Dragging {
            node_id,
            offset,
            moved,
        } = &mut self.state
        else {
            return None;
        };
        if store.active_workflow().is_none() {
            debug!(node_id = %node_id, "workflow closed mid-drag, ending drag");
            self.state = DragState::Idle;
            return None;
        }
        *moved = true;

        let position = clamp_position(pointer.offset_from(*offset), self.bounds, self.footprint);
        if let Err(error) = store.move_node(*node_id, position) {
            // The node vanished mid-drag, e.g. deleted from the inspector.
            warn!(node_id = %node_id, error = %error, "dragged node is gone, ending drag");
            self.state = DragState::Idle;
            return None;
        }
        Some(position)
    }

    /// Ends the pointer session.
    pub fn pointer_up(&mut self) {
        if let DragState::Dragging { moved, .. } = self.state {
            self.suppress_click = moved;
        }
        self.state = DragState::Idle;
    }

    /// The pointer left the canvas; ends any drag.
    ///
    /// No click follows a pointer that left, so nothing is suppressed.
    pub fn pointer_leave(&mut self) {
        self.state = DragState::Idle;
        self.suppress_click = false;
    }

    /// A click on a node selects it unless the same pointer session dragged.
    ///
    /// Returns true if the selection changed to the node.
    pub fn click_node(&mut self, store: &mut GraphStore, node_id: NodeId) -> bool {
        if std::mem::take(&mut self.suppress_click) || self.state.is_dragging() {
            return false;
        }
        store.set_selected_node(Some(node_id)).is_ok()
    }

    /// A click on empty canvas clears the selection unless a drag is in
    /// progress or just ended.
    ///
    /// Returns true if the selection was cleared.
    pub fn click_canvas(&mut self, store: &mut GraphStore) -> bool {
        if std::mem::take(&mut self.suppress_click) || self.state.is_dragging() {
            return false;
        }
        // Clearing is always accepted.
        store.set_selected_node(None).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdesk_workflow::{NodeType, Workflow, WorkflowConnection, WorkflowNode};

    fn scenario() -> (GraphStore, NodeId, NodeId) {
        let mut store = GraphStore::new();
        store.set_active_workflow(Some(Workflow::new("Canvas")));
        let a = WorkflowNode::new(NodeType::Trigger, "A", Position::new(0.0, 0.0));
        let b = WorkflowNode::new(NodeType::Condition, "B", Position::new(300.0, 0.0));
        let (id_a, id_b) = (a.id, b.id);
        store.add_node(a).expect("add a");
        store.add_node(b).expect("add b");
        store
            .add_connection(WorkflowConnection::new(id_a, id_b))
            .expect("connect");
        (store, id_a, id_b)
    }

    fn position_of(store: &GraphStore, node_id: NodeId) -> Position {
        store
            .active_workflow()
            .and_then(|w| w.node(node_id))
            .map(|n| n.position)
            .expect("node")
    }

    #[test]
    fn defaults() {
        assert_eq!(
            CanvasBounds::default(),
            CanvasBounds {
                width: 1000.0,
                height: 600.0
            }
        );
        assert_eq!(
            NodeFootprint::default(),
            NodeFootprint {
                width: 220.0,
                height: 72.0
            }
        );
    }

    #[test]
    fn clamp_keeps_node_inside_canvas() {
        let bounds = CanvasBounds::default();
        let footprint = NodeFootprint::default();
        let samples = [
            (-1e9, -1e9),
            (1e9, 1e9),
            (-0.5, 599.0),
            (779.9, 528.1),
            (f64::NAN, f64::INFINITY),
            (f64::NEG_INFINITY, 12.0),
            (400.0, 300.0),
        ];
        for (x, y) in samples {
            let p = clamp_position(Position::new(x, y), bounds, footprint);
            assert!((0.0..=780.0).contains(&p.x), "x out of range for ({x}, {y}): {}", p.x);
            assert!((0.0..=528.0).contains(&p.y), "y out of range for ({x}, {y}): {}", p.y);
        }
        assert_eq!(
            clamp_position(Position::new(400.0, 300.0), bounds, footprint),
            Position::new(400.0, 300.0)
        );
    }

    #[test]
    fn node_larger_than_canvas_pins_to_origin() {
        let p = clamp_position(
            Position::new(50.0, 50.0),
            CanvasBounds {
                width: 100.0,
                height: 40.0,
            },
            NodeFootprint::default(),
        );
        assert_eq!(p, Position::new(0.0, 0.0));
    }

    #[test]
    fn drag_past_corner_clamps() {
        let (mut store, _, b) = scenario();
        let mut canvas = CanvasController::default();

        // Grab B at its origin so the pointer maps straight to the position.
        assert!(canvas.pointer_down(&store, b, Position::new(300.0, 0.0)));
        let moved = canvas.pointer_move(&mut store, Position::new(5000.0, -10.0));

        assert_eq!(moved, Some(Position::new(780.0, 0.0)));
        assert_eq!(position_of(&store, b), Position::new(780.0, 0.0));
    }

    #[test]
    fn drag_preserves_grab_point() {
        let (mut store, _, b) = scenario();
        let mut canvas = CanvasController::default();

        assert!(canvas.pointer_down(&store, b, Position::new(310.0, 20.0)));
        canvas.pointer_move(&mut store, Position::new(410.0, 120.0));
        assert_eq!(position_of(&store, b), Position::new(400.0, 100.0));

        canvas.pointer_up();
        assert_eq!(canvas.state(), DragState::Idle);
        assert_eq!(canvas.pointer_move(&mut store, Position::new(0.0, 0.0)), None);
        assert_eq!(position_of(&store, b), Position::new(400.0, 100.0));
    }

    #[test]
    fn pointer_leave_ends_drag() {
        let (mut store, a, _) = scenario();
        let mut canvas = CanvasController::default();
        canvas.pointer_down(&store, a, Position::new(5.0, 5.0));
        canvas.pointer_move(&mut store, Position::new(50.0, 50.0));
        canvas.pointer_leave();
        assert!(!canvas.state().is_dragging());
    }

    #[test]
    fn canvas_click_after_drag_left_canvas_clears_selection() {
        let (mut store, a, b) = scenario();
        let mut canvas = CanvasController::default();
        store.set_selected_node(Some(a)).expect("select");

        canvas.pointer_down(&store, b, Position::new(300.0, 0.0));
        canvas.pointer_move(&mut store, Position::new(340.0, 20.0));
        canvas.pointer_leave();

        assert!(canvas.click_canvas(&mut store));
        assert!(store.selected_node().is_none());
    }

    #[test]
    fn closing_workflow_mid_drag_ends_drag() {
        let (mut store, a, _) = scenario();
        let mut canvas = CanvasController::default();
        canvas.pointer_down(&store, a, Position::new(1.0, 1.0));
        store.set_active_workflow(None);

        assert_eq!(canvas.pointer_move(&mut store, Position::new(40.0, 40.0)), None);
        assert_eq!(canvas.state(), DragState::Idle);
    }

    #[test]
    fn click_without_motion_selects() {
        let (mut store, a, _) = scenario();
        let mut canvas = CanvasController::default();

        canvas.pointer_down(&store, a, Position::new(10.0, 10.0));
        canvas.pointer_up();
        assert!(canvas.click_node(&mut store, a));
        assert_eq!(store.selected_node().map(|n| n.id), Some(a));
    }

    #[test]
    fn click_after_drag_is_swallowed() {
        let (mut store, a, b) = scenario();
        let mut canvas = CanvasController::default();
        store.set_selected_node(Some(a)).expect("select");

        canvas.pointer_down(&store, b, Position::new(300.0, 0.0));
        canvas.pointer_move(&mut store, Position::new(320.0, 10.0));
        canvas.pointer_up();

        assert!(!canvas.click_node(&mut store, b));
        assert_eq!(store.selected_node().map(|n| n.id), Some(a));

        // Only the click belonging to that session is swallowed.
        assert!(canvas.click_node(&mut store, b));
        assert_eq!(store.selected_node().map(|n| n.id), Some(b));
    }

    #[test]
    fn canvas_click_clears_selection_unless_dragging() {
        let (mut store, a, b) = scenario();
        let mut canvas = CanvasController::default();
        store.set_selected_node(Some(a)).expect("select");

        canvas.pointer_down(&store, b, Position::new(300.0, 0.0));
        assert!(!canvas.click_canvas(&mut store));
        assert!(store.selected_node().is_some());

        canvas.pointer_up();
        assert!(canvas.click_canvas(&mut store));
        assert!(store.selected_node().is_none());
    }

    #[test]
    fn pointer_down_on_unknown_node_stays_idle() {
        let (store, _, _) = scenario();
        let mut canvas = CanvasController::default();
        assert!(!canvas.pointer_down(&store, NodeId::new(), Position::default()));
        assert_eq!(canvas.state(), DragState::Idle);
    }

    #[test]
    fn deleting_dragged_node_ends_drag() {
        let (mut store, a, _) = scenario();
        let mut canvas = CanvasController::default();
        canvas.pointer_down(&store, a, Position::new(1.0, 1.0));
        store.delete_node(a).expect("delete");

        assert_eq!(canvas.pointer_move(&mut store, Position::new(40.0, 40.0)), None);
        assert_eq!(canvas.state(), DragState::Idle);
    }

    #[test]
    fn bounds_deserialize_with_defaults() {
        let bounds: CanvasBounds =
            serde_json::from_value(serde_json::json!({ "width": 1280.0 })).expect("deserialize");
        assert_eq!(bounds.width, 1280.0);
        assert_eq!(bounds.height, 600.0);
    }
}
