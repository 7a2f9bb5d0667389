//! Test harness driving a [`Scene`] the way a host would: a pointer event
//! stream with per-event movement deltas, plus key input, with helpers for
//! the common interaction sequences (drag a node, run an edge gesture).

#![allow(dead_code)]

use node_link_editor::{
    hit_test, EditorConfig, KeyInput, NodeId, Port, PortRef, Position, Scene, Snapshot,
};
use std::cell::Cell;

pub struct SceneHarness {
    pub scene: Scene,
    last_pointer: Cell<Position>,
}

impl SceneHarness {
    /// An empty session with default configuration.
    pub fn new() -> Self {
        Self::with_scene(Scene::new())
    }

    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            last_pointer: Cell::new(Position::ZERO),
        }
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::with_scene(
            Scene::from_snapshot(snapshot, EditorConfig::default()).expect("valid snapshot"),
        )
    }

    /// Two default-sized nodes at (100, 100) and (400, 200).
    pub fn with_two_nodes() -> (Self, NodeId, NodeId) {
        let harness = Self::new();
        let a = harness
            .scene
            .add_node_at(Position::new(100.0, 100.0))
            .unwrap();
        let b = harness
            .scene
            .add_node_at(Position::new(400.0, 200.0))
            .unwrap();
        (harness, a, b)
    }

    // === Raw input, host-style ===

    /// Move the pointer to `(x, y)`, deriving the movement delta from the
    /// previous pointer event as a host event stream would.
    pub fn move_pointer_to(&self, x: f32, y: f32) {
        let prev = self.last_pointer.get();
        let position = Position::new(x, y);
        self.scene.pointer_moved(position, x - prev.x, y - prev.y);
        self.last_pointer.set(position);
    }

    /// Press at `(x, y)` without a preceding move event.
    pub fn press_at(&self, x: f32, y: f32) {
        let position = Position::new(x, y);
        self.scene.pointer_down(position);
        self.last_pointer.set(position);
    }

    /// Press at the current pointer position.
    pub fn press(&self) {
        let position = self.last_pointer.get();
        self.scene.pointer_down(position);
    }

    pub fn release(&self) {
        self.scene.pointer_up();
    }

    pub fn key_tap(&self, key: KeyInput) {
        self.scene.key_pressed(key);
    }

    // === Interaction sequences ===

    /// Where a node's port anchor currently is.
    pub fn port_anchor_of(&self, node: NodeId, port: Port) -> Position {
        let port_distance = self.scene.config().port_distance;
        self.scene.read(|state| {
            let node = state.node(node).expect("node exists");
            hit_test::port_anchor(node.position, node.size, port, port_distance)
        })
    }

    pub fn node_position(&self, node: NodeId) -> Position {
        self.scene
            .read(|state| state.node(node).expect("node exists").position)
    }

    pub fn node_center(&self, node: NodeId) -> Position {
        self.scene.read(|state| {
            let node = state.node(node).expect("node exists");
            Position::new(
                node.position.x + node.size.width / 2.0,
                node.position.y + node.size.height / 2.0,
            )
        })
    }

    /// Start an edge gesture by pressing on a node's port.
    pub fn start_gesture(&self, node: NodeId, port: Port) {
        let anchor = self.port_anchor_of(node, port);
        self.press_at(anchor.x, anchor.y);
    }

    /// Move the pointer onto a node's port so it becomes the hover target.
    pub fn hover_port(&self, node: NodeId, port: Port) {
        let anchor = self.port_anchor_of(node, port);
        self.move_pointer_to(anchor.x, anchor.y);
    }

    /// Run a complete commit gesture: `from` port, hover `to` port, press.
    pub fn connect(&self, from: (NodeId, Port), to: (NodeId, Port)) {
        self.start_gesture(from.0, from.1);
        self.hover_port(to.0, to.1);
        self.press();
    }

    /// Drag a node's body by `(dx, dy)` in a single move event.
    pub fn drag_node_by(&self, node: NodeId, dx: f32, dy: f32) {
        let center = self.node_center(node);
        self.press_at(center.x, center.y);
        self.move_pointer_to(center.x + dx, center.y + dy);
        self.release();
    }

    // === State peeks ===

    pub fn edge_count(&self) -> usize {
        self.scene.read(|state| state.edges.len())
    }

    pub fn node_count(&self) -> usize {
        self.scene.read(|state| state.nodes.len())
    }

    pub fn hover_target(&self) -> Option<PortRef> {
        self.scene.read(|state| state.over)
    }

    pub fn has_pending_edge(&self) -> bool {
        self.scene.read(|state| state.creating_edge.is_some())
    }
}
