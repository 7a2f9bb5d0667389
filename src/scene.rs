//! Scene/session container.
//!
//! [`Scene`] owns the single [`GraphState`] of an editing session and fans
//! pointer/keyboard input out to the gesture, drag, and selection logic. All
//! mutation flows through [`Scene::update`], a synchronous whole-aggregate
//! transform: handlers never hold a stale snapshot across an event boundary.
//!
//! The host is expected to deliver pointer events globally only while
//! [`Scene::wants_global_capture`] is true (an active drag or edge gesture),
//! and to call [`Scene::close`] on teardown so a listener that outlives its
//! registration window cannot keep mutating a dead session.

use std::cell::RefCell;
use std::rc::Rc;

use crate::drag::DragEngine;
use crate::geometry::{clamp, Position, Size};
use crate::gesture;
use crate::hit_test::{find_edge_at, find_node_at, find_port_at, node_port_anchors};
use crate::model::{
    EdgeId, GraphNode, GraphState, NodeId, Port, Snapshot, SnapshotError,
};
use crate::path::ArrowCurve;
use crate::selection;

/// Tunables for one editor session.
#[derive(Clone, Copy, Debug)]
pub struct EditorConfig {
    /// Length of the port protrusion beyond the node box.
    pub port_distance: f32,
    /// Margin the node hit region keeps from the canvas border.
    pub padding: f32,
    /// Upward bulge of arrow curves.
    pub curve_amount: f32,
    /// Size of nodes placed by the add-node command.
    pub default_node_size: Size,
    /// Pointer radius for hitting a port anchor.
    pub port_hit_radius: f32,
    /// Pointer distance for hitting an edge curve.
    pub edge_hover_distance: f32,
    /// Segments used when sampling a curve for hit testing.
    pub curve_hit_samples: usize,
    /// Key that places a new node at the pointer.
    pub add_node_key: char,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            port_distance: 16.0,
            padding: 16.0,
            curve_amount: 50.0,
            default_node_size: Size::new(60.0, 20.0),
            port_hit_radius: 8.0,
            edge_hover_distance: 8.0,
            curve_hit_samples: 20,
            add_node_key: 'a',
        }
    }
}

/// Keyboard input delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    /// A printable key press.
    Character(char),
    /// The delete command key.
    Delete,
}

/// One port anchor, recomputed from the owning node's current position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortAnchorView {
    pub port: Port,
    pub position: Position,
}

/// What the renderer needs to draw one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeView {
    pub id: NodeId,
    pub position: Position,
    pub size: Size,
    pub ports: [PortAnchorView; 4],
}

/// What the renderer needs to draw one committed edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeView {
    pub id: EdgeId,
    pub curve: ArrowCurve,
    pub selected: bool,
}

/// A complete render description of the current session state.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    /// Curve of the in-progress edge while a gesture is pending.
    pub creating_edge: Option<ArrowCurve>,
}

/// The editing session container.
///
/// Clone it to share one session across input callbacks; clones observe the
/// same state.
#[derive(Clone)]
pub struct Scene {
    state: Rc<RefCell<GraphState>>,
    drag: Rc<RefCell<DragEngine>>,
    pointer: Rc<RefCell<Position>>,
    closed: Rc<RefCell<bool>>,
    config: Rc<EditorConfig>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// An empty session with default configuration and a 1000x1000 canvas.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self::from_state(GraphState::default(), config)
    }

    /// Seed a session from a host-supplied snapshot.
    pub fn from_snapshot(snapshot: Snapshot, config: EditorConfig) -> Result<Self, SnapshotError> {
        Ok(Self::from_state(GraphState::from_snapshot(snapshot)?, config))
    }

    fn from_state(state: GraphState, config: EditorConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(state)),
            drag: Rc::new(RefCell::new(DragEngine::new())),
            pointer: Rc::new(RefCell::new(Position::ZERO)),
            closed: Rc::new(RefCell::new(false)),
            config: Rc::new(config),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Read from the current aggregate.
    pub fn read<R>(&self, f: impl FnOnce(&GraphState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Apply a transform to the aggregate, atomically replacing it.
    ///
    /// Runs synchronously; the whole aggregate is swapped in one step so
    /// readers never observe a partially updated session.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(GraphState) -> GraphState,
    {
        let mut slot = self.state.borrow_mut();
        let current = std::mem::take(&mut *slot);
        *slot = f(current);
    }

    /// Last pointer position delivered to the session.
    ///
    /// Tracked continuously, independent of drag/gesture state, so the
    /// add-node command knows where to place a node.
    pub fn pointer_position(&self) -> Position {
        *self.pointer.borrow()
    }

    /// The node currently being dragged, if any.
    pub fn dragged_node(&self) -> Option<NodeId> {
        self.drag.borrow().target()
    }

    /// Whether the host should deliver pointer events globally.
    ///
    /// True exactly while a drag or an edge gesture is in flight; the host
    /// registers document-level move/up listeners for that window and drops
    /// them when this goes false again.
    pub fn wants_global_capture(&self) -> bool {
        if *self.closed.borrow() {
            return false;
        }
        self.drag.borrow().is_dragging() || self.read(|s| s.creating_edge.is_some())
    }

    // === Input fan-out ===

    /// Pointer moved to `position`, having travelled `(dx, dy)` since the
    /// previous event.
    pub fn pointer_moved(&self, position: Position, dx: f32, dy: f32) {
        if self.reject_if_closed("pointer_moved") {
            return;
        }
        *self.pointer.borrow_mut() = position;

        if self.drag.borrow().is_dragging() {
            let padding = self.config.padding;
            let drag = self.drag.clone();
            self.update(|state| drag.borrow().apply_movement(state, dx, dy, padding));
        } else if self.read(|s| s.creating_edge.is_some()) {
            let port_distance = self.config.port_distance;
            let hit_radius = self.config.port_hit_radius;
            self.update(|state| {
                let over = find_port_at(position, &state.nodes, port_distance, hit_radius);
                gesture::set_hover(gesture::track_pointer(state, position), over)
            });
        }
    }

    /// Pointer pressed at `position`.
    ///
    /// Resolution order: a pending gesture commits or cancels first; then a
    /// port starts a gesture, a node body starts a drag, an edge path gets
    /// selected, and a background press does nothing.
    pub fn pointer_down(&self, position: Position) {
        if self.reject_if_closed("pointer_down") {
            return;
        }
        *self.pointer.borrow_mut() = position;

        let port_distance = self.config.port_distance;
        if self.read(|s| s.creating_edge.is_some()) {
            self.update(|state| gesture::commit_or_cancel(state, port_distance));
            return;
        }

        enum Target {
            Port(crate::model::PortRef),
            Node(NodeId),
            Edge(EdgeId),
            Background,
        }

        let target = self.read(|state| {
            if let Some(port) = find_port_at(
                position,
                &state.nodes,
                port_distance,
                self.config.port_hit_radius,
            ) {
                Target::Port(port)
            } else if let Some(node) = find_node_at(position, &state.nodes) {
                Target::Node(node)
            } else if let Some(edge) = find_edge_at(
                position,
                &state.edges,
                self.config.curve_amount,
                self.config.edge_hover_distance,
                self.config.curve_hit_samples,
            ) {
                Target::Edge(edge)
            } else {
                Target::Background
            }
        });

        match target {
            Target::Port(origin) => {
                self.update(|state| gesture::start(state, origin, port_distance));
            }
            Target::Node(node) => self.drag.borrow_mut().begin(node),
            Target::Edge(edge) => self.update(|state| selection::select_edge(state, edge)),
            Target::Background => {}
        }
    }

    /// Pointer released.
    pub fn pointer_up(&self) {
        if self.reject_if_closed("pointer_up") {
            return;
        }
        self.drag.borrow_mut().end();
    }

    /// Keyboard input.
    pub fn key_pressed(&self, key: KeyInput) {
        if self.reject_if_closed("key_pressed") {
            return;
        }
        match key {
            KeyInput::Character(c) if c.eq_ignore_ascii_case(&self.config.add_node_key) => {
                self.add_node_at(self.pointer_position());
            }
            KeyInput::Character(_) => {}
            KeyInput::Delete => self.update(selection::delete_selected),
        }
    }

    // === Commands ===

    /// Place a new node of the default size at `position`.
    ///
    /// The position is clamped so the node's hit region (including the port
    /// protrusion padding) stays inside the canvas. Any pending gesture and
    /// hover state are cleared: a node placed mid-gesture must not inherit a
    /// half-built edge. Returns `None` on a closed session.
    pub fn add_node_at(&self, position: Position) -> Option<NodeId> {
        if self.reject_if_closed("add_node_at") {
            return None;
        }
        let size = self.config.default_node_size;
        let padding = self.config.padding;
        let node = GraphNode::new(position, size);
        let id = node.id;

        self.update(move |mut state| {
            let mut node = node;
            node.position = Position::new(
                clamp(position.x, padding, state.canvas.width - padding - size.width),
                clamp(position.y, padding, state.canvas.height - padding - size.height),
            );
            state.nodes.push(node);
            state.creating_edge = None;
            state.over = None;
            state
        });
        Some(id)
    }

    /// Remove a node, cascading to every edge that references it and to any
    /// drag, hover, or gesture state anchored on it.
    pub fn remove_node(&self, id: NodeId) -> bool {
        if self.reject_if_closed("remove_node") {
            return false;
        }
        self.drag.borrow_mut().clear_target(id);
        let mut removed = false;
        self.update(|mut state| {
            removed = state.remove_node(id);
            state
        });
        removed
    }

    // === Rendering boundary ===

    /// Build the render description of the current state.
    ///
    /// Port anchors are recomputed from node positions on every call; they
    /// are never cached independently of the nodes, so they cannot drift.
    pub fn frame(&self) -> Frame {
        let port_distance = self.config.port_distance;
        let curve_amount = self.config.curve_amount;
        self.read(|state| Frame {
            nodes: state
                .nodes
                .iter()
                .map(|node| NodeView {
                    id: node.id,
                    position: node.position,
                    size: node.size,
                    ports: node_port_anchors(node, port_distance)
                        .map(|(port, position)| PortAnchorView { port, position }),
                })
                .collect(),
            edges: state
                .edges
                .iter()
                .map(|edge| EdgeView {
                    id: edge.id,
                    curve: ArrowCurve::from_endpoints(
                        edge.start_position,
                        edge.end_position,
                        curve_amount,
                    ),
                    selected: state.selected_edge == Some(edge.id),
                })
                .collect(),
            creating_edge: state.creating_edge.map(|pending| {
                ArrowCurve::from_endpoints(
                    pending.start_position,
                    pending.end_position,
                    curve_amount,
                )
            }),
        })
    }

    // === Teardown ===

    /// Tear the session down.
    ///
    /// Synchronously cancels any in-flight drag or gesture; every input
    /// entry point becomes a no-op afterwards, so a listener the host failed
    /// to deregister cannot mutate a dead session.
    pub fn close(&self) {
        if *self.closed.borrow() {
            return;
        }
        self.drag.borrow_mut().end();
        self.update(gesture::cancel);
        *self.closed.borrow_mut() = true;
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    fn reject_if_closed(&self, entry: &str) -> bool {
        let closed = *self.closed.borrow();
        if closed {
            log::debug!("{} ignored on closed scene", entry);
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scene_is_empty() {
        let scene = Scene::new();
        assert!(scene.read(|s| s.nodes.is_empty() && s.edges.is_empty()));
        assert_eq!(scene.read(|s| s.canvas), Size::new(1000.0, 1000.0));
        assert!(!scene.wants_global_capture());
    }

    #[test]
    fn test_clones_share_state() {
        let scene = Scene::new();
        let other = scene.clone();
        scene.add_node_at(Position::new(100.0, 100.0));
        assert_eq!(other.read(|s| s.nodes.len()), 1);
    }

    #[test]
    fn test_update_is_whole_aggregate_replacement() {
        let scene = Scene::new();
        scene.update(|mut state| {
            state.canvas = Size::new(400.0, 300.0);
            state
        });
        assert_eq!(scene.read(|s| s.canvas), Size::new(400.0, 300.0));
    }

    #[test]
    fn test_pointer_tracking_is_continuous() {
        let scene = Scene::new();
        scene.pointer_moved(Position::new(12.0, 34.0), 12.0, 34.0);
        assert_eq!(scene.pointer_position(), Position::new(12.0, 34.0));
        scene.pointer_moved(Position::new(56.0, 78.0), 44.0, 44.0);
        assert_eq!(scene.pointer_position(), Position::new(56.0, 78.0));
    }

    #[test]
    fn test_add_node_clamps_into_bounds() {
        let scene = Scene::new();
        let id = scene.add_node_at(Position::new(-40.0, 2000.0)).unwrap();
        let position = scene.read(|s| s.node(id).unwrap().position);
        assert_eq!(position, Position::new(16.0, 964.0));
    }

    #[test]
    fn test_closed_scene_ignores_everything() {
        let scene = Scene::new();
        let id = scene.add_node_at(Position::new(100.0, 100.0)).unwrap();
        scene.close();

        assert!(scene.add_node_at(Position::new(200.0, 200.0)).is_none());
        assert!(!scene.remove_node(id));
        scene.pointer_down(Position::new(100.0, 110.0));
        scene.pointer_moved(Position::new(150.0, 150.0), 50.0, 40.0);
        scene.key_pressed(KeyInput::Character('a'));

        assert_eq!(scene.read(|s| s.nodes.len()), 1);
        assert!(scene.dragged_node().is_none());
        assert!(!scene.wants_global_capture());
    }

    #[test]
    fn test_close_is_idempotent() {
        let scene = Scene::new();
        scene.close();
        scene.close();
        assert!(scene.is_closed());
    }
}
