//! Edge-creation gesture controller.
//!
//! A two-state machine per session: **Idle** (no pending edge) and
//! **Pending** (a [`PendingEdge`] whose free end follows the pointer). A
//! pointer-down on a port while idle starts the gesture; the next
//! pointer-down commits onto the hovered port or cancels when none is
//! hovered. Transitions are guarded by state checks — an out-of-place
//! commit or cancel is a no-op, never an error.

use crate::geometry::Position;
use crate::hit_test::port_anchor;
use crate::model::{EdgeId, GraphState, PendingEdge, PortRef};

/// Start a gesture from `origin`'s port.
///
/// The transient edge begins with both endpoints at the port's current
/// anchor. No-op while another gesture is pending or when the node does not
/// exist.
pub fn start(mut state: GraphState, origin: PortRef, port_distance: f32) -> GraphState {
    if state.creating_edge.is_some() {
        return state;
    }
    let Some(node) = state.node(origin.node) else {
        log::warn!("edge gesture started on missing node {}", origin.node);
        return state;
    };

    let anchor = port_anchor(node.position, node.size, origin.port, port_distance);
    state.creating_edge = Some(PendingEdge {
        id: EdgeId::new(),
        start_node: origin.node,
        start_port: origin.port,
        start_position: anchor,
        end_position: anchor,
    });
    log::debug!("edge gesture started from node {}", origin.node);
    state
}

/// Let the free end of the pending edge follow the pointer.
///
/// Called on every pointer move while pending, including moves outside the
/// canvas (the arrow must keep tracking a pointer that leaves the element).
pub fn track_pointer(mut state: GraphState, position: Position) -> GraphState {
    if let Some(pending) = state.creating_edge.as_mut() {
        pending.end_position = position;
    }
    state
}

/// Record which port the pointer currently hovers, if any.
///
/// Hover decides where the pending edge will land on commit; it never alters
/// the pending edge itself.
pub fn set_hover(mut state: GraphState, over: Option<PortRef>) -> GraphState {
    state.over = over;
    state
}

/// Resolve the pending gesture on pointer-down.
///
/// With a hovered port the pending edge is committed onto it, its end bound
/// to that port's current anchor; otherwise the gesture cancels. Either way
/// the machine returns to idle. No-op when no gesture is pending.
pub fn commit_or_cancel(mut state: GraphState, port_distance: f32) -> GraphState {
    let Some(pending) = state.creating_edge.take() else {
        return state;
    };
    let target = state.over.take();

    match target {
        Some(over) => match state.node(over.node) {
            Some(node) => {
                let anchor = port_anchor(node.position, node.size, over.port, port_distance);
                let edge = pending.into_edge(over, anchor);
                log::debug!("edge {} committed onto node {}", edge.id, over.node);
                state.edges.push(edge);
            }
            None => {
                log::warn!(
                    "edge gesture target node {} disappeared, canceling",
                    over.node
                );
            }
        },
        None => {
            log::debug!("edge gesture canceled with no target");
        }
    }
    state
}

/// Abandon any pending gesture and clear the hover target.
pub fn cancel(mut state: GraphState) -> GraphState {
    state.creating_edge = None;
    state.over = None;
    state
}
