//! # Node Link Editor
//!
//! A headless interactive graph-editing engine for building node-link
//! diagram editors: nodes on a canvas, curved arrows anchored to directional
//! ports, drag-and-reposition that keeps edges attached, a two-step
//! port-to-port edge creation gesture, and selection/deletion.
//!
//! The crate is the *state machine* of an editor. Rendering, styling, and
//! host mounting stay outside: the renderer consumes [`Scene::frame`] (node
//! boxes, port anchors, and [`ArrowCurve`] descriptions) and the host feeds
//! pointer and key events into the [`Scene`].
//!
//! ## Features
//!
//! - **Single source of truth** - one [`GraphState`] aggregate per session,
//!   mutated only through the scene's atomic `update` transform
//! - **Delta-based dragging** - per-axis clamped movement that keeps nodes
//!   (and their port hit regions) inside the canvas
//! - **Gesture state machine** - explicit Idle/Pending edge creation with
//!   commit-on-port and cancel-on-miss, self-loops included
//! - **Tolerant by construction** - dangling edges are pruned, invalid
//!   transitions are no-ops, out-of-bounds movement is clamped
//!
//! ## Quick Start
//!
//! ```
//! use node_link_editor::{KeyInput, Position, Scene};
//!
//! let scene = Scene::new();
//!
//! // Host input loop: place a node where the pointer is
//! scene.pointer_moved(Position::new(200.0, 150.0), 200.0, 150.0);
//! scene.key_pressed(KeyInput::Character('a'));
//!
//! // Render collaborator: one box with four port anchors
//! let frame = scene.frame();
//! assert_eq!(frame.nodes.len(), 1);
//! assert_eq!(frame.nodes[0].ports.len(), 4);
//! ```

pub mod drag;
pub mod geometry;
pub mod gesture;
pub mod model;
pub mod path;
pub mod scene;
pub mod selection;

pub use drag::DragEngine;
pub use geometry::{clamp, distance, Position, Size};
pub use hit_test::{find_edge_at, find_node_at, find_port_at, node_port_anchors, port_anchor};
pub use model::{
    EdgeId, GraphEdge, GraphNode, GraphState, NodeId, PendingEdge, Port, PortRef, Snapshot,
    SnapshotError,
};
pub use path::{distance_to_curve, ArrowCurve};
pub use scene::{EdgeView, EditorConfig, Frame, KeyInput, NodeView, PortAnchorView, Scene};
