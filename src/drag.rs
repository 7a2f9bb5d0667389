//! Drag-and-reposition engine.
//!
//! Tracks the single in-progress node drag and applies pointer movement to
//! the dragged node and to every committed edge endpoint attached to it.
//! Movement is delta-based — each step uses the pointer's per-event movement
//! rather than absolute-position-minus-offset, so missed events cannot
//! accumulate drift — and is clamped on each axis independently so a
//! diagonal drag against a canvas wall slides along the wall instead of
//! freezing.

use crate::geometry::clamp;
use crate::model::{GraphState, NodeId};

/// State of the (at most one) node drag in a session.
#[derive(Debug, Default)]
pub struct DragEngine {
    active: Option<NodeId>,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `node` as the active drag target.
    ///
    /// Starting a drag while one is already active is rejected; the first
    /// drag keeps running.
    pub fn begin(&mut self, node: NodeId) {
        if self.active.is_some() {
            log::debug!("drag start ignored, another drag is active");
            return;
        }
        self.active = Some(node);
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// The node currently being dragged, if any.
    pub fn target(&self) -> Option<NodeId> {
        self.active
    }

    /// End the drag session (pointer released).
    pub fn end(&mut self) {
        self.active = None;
    }

    /// Drop the drag if it targets `node`, as part of node-deletion cascade.
    pub fn clear_target(&mut self, node: NodeId) {
        if self.active == Some(node) {
            self.active = None;
        }
    }

    /// Apply one pointer movement `(dx, dy)` to the dragged node.
    ///
    /// The delta is clamped per axis so the node's hit region — including
    /// `padding` for the port protrusion — stays inside the canvas, then the
    /// clamped delta moves the node and every committed edge endpoint
    /// anchored on it (both endpoints of a self-loop). If the drag target is
    /// missing from the graph the state is returned unchanged, with a
    /// diagnostic; this is a tolerated inconsistency, not a fault.
    pub fn apply_movement(&self, mut state: GraphState, dx: f32, dy: f32, padding: f32) -> GraphState {
        let Some(id) = self.active else {
            return state;
        };
        let Some(node) = state.node(id) else {
            log::warn!("dragged node {} not found, leaving state unchanged", id);
            return state;
        };

        let position = node.position;
        let size = node.size;
        let moved_x = clamp(
            dx,
            padding - position.x,
            state.canvas.width - padding - size.width - position.x,
        );
        let moved_y = clamp(
            dy,
            padding - position.y,
            state.canvas.height - padding - size.height - position.y,
        );

        if let Some(node) = state.node_mut(id) {
            node.position = node.position.translated(moved_x, moved_y);
        }
        for edge in &mut state.edges {
            if edge.start_node == id && edge.end_node == id {
                edge.start_position = edge.start_position.translated(moved_x, moved_y);
                edge.end_position = edge.end_position.translated(moved_x, moved_y);
            } else if edge.start_node == id {
                edge.start_position = edge.start_position.translated(moved_x, moved_y);
            } else if edge.end_node == id {
                edge.end_position = edge.end_position.translated(moved_x, moved_y);
            }
        }
        state
    }
}
