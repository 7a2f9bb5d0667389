//! Graph data model: nodes, edges, ports, and the per-session aggregate.
//!
//! All editing state for one session lives in a single [`GraphState`] value.
//! Components never hold private copies; they receive the current aggregate
//! through the scene's update channel and produce a new aggregate from it.

use crate::geometry::{Position, Size};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Identifier of a node, unique for the session lifetime.
///
/// Backed by a UUID v7 so ids are time-ordered and collision-resistant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a committed or in-progress edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(Uuid);

impl EdgeId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One of the four directional anchor points on a node's bounding box.
///
/// Ports have no identity of their own; they are always resolved relative to
/// a specific node (see [`PortRef`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Port {
    Left,
    Right,
    Top,
    Bottom,
}

impl Port {
    pub const ALL: [Port; 4] = [Port::Left, Port::Right, Port::Top, Port::Bottom];

    /// Whether the port sits on a horizontal edge of the box (top/bottom).
    pub fn is_vertical(self) -> bool {
        matches!(self, Port::Top | Port::Bottom)
    }
}

/// A port resolved against a concrete node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortRef {
    pub node: NodeId,
    pub port: Port,
}

/// A node on the canvas. `position` is the top-left of the bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    pub id: NodeId,
    pub position: Position,
    pub size: Size,
}

impl GraphNode {
    pub fn new(position: Position, size: Size) -> Self {
        Self {
            id: NodeId::new(),
            position,
            size,
        }
    }
}

/// A committed edge between two node ports.
///
/// `start_node`/`end_node` are weak references: an edge whose node no longer
/// exists is dangling and gets pruned, never rendered. `start_position`/
/// `end_position` are denormalized pixel coordinates kept in sync by the drag
/// engine whenever a referenced node moves.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphEdge {
    pub id: EdgeId,
    pub start_node: NodeId,
    pub end_node: NodeId,
    pub start_port: Port,
    pub end_port: Port,
    pub start_position: Position,
    pub end_position: Position,
}

impl GraphEdge {
    /// Whether both endpoints are anchored on the same node.
    pub fn is_self_loop(&self) -> bool {
        self.start_node == self.end_node
    }

    /// Whether either endpoint references `node`.
    pub fn touches(&self, node: NodeId) -> bool {
        self.start_node == node || self.end_node == node
    }
}

/// The transient in-progress edge owned by the edge-creation gesture.
///
/// Only the start is bound to a port; the free end follows the pointer until
/// the gesture commits or cancels.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingEdge {
    pub id: EdgeId,
    pub start_node: NodeId,
    pub start_port: Port,
    pub start_position: Position,
    pub end_position: Position,
}

impl PendingEdge {
    /// Bind the free end to `end` and turn this into a committed edge.
    pub fn into_edge(self, end: PortRef, end_position: Position) -> GraphEdge {
        GraphEdge {
            id: self.id,
            start_node: self.start_node,
            end_node: end.node,
            start_port: self.start_port,
            end_port: end.port,
            start_position: self.start_position,
            end_position,
        }
    }
}

/// The whole editing state of one session.
///
/// Node and edge collections preserve insertion order (z-order for the
/// renderer; irrelevant to the editing logic). At most one in-progress edge,
/// one hover target, and one selected edge exist at a time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphState {
    pub canvas: Size,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub creating_edge: Option<PendingEdge>,
    pub over: Option<PortRef>,
    pub selected_edge: Option<EdgeId>,
}

impl Default for GraphState {
    fn default() -> Self {
        Self {
            canvas: Size::new(1000.0, 1000.0),
            nodes: Vec::new(),
            edges: Vec::new(),
            creating_edge: None,
            over: None,
            selected_edge: None,
        }
    }
}

impl GraphState {
    /// An empty session with the given canvas size.
    pub fn with_canvas(canvas: Size) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Append a node, returning its id.
    pub fn add_node(&mut self, node: GraphNode) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Remove a node and everything that references it.
    ///
    /// Cascades to every edge touching the node and clears the hover target,
    /// a pending gesture anchored on it, and the selection if a cascaded edge
    /// was selected. Returns `false` if the node was not present.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        if self.nodes.len() == before {
            return false;
        }

        self.edges.retain(|e| !e.touches(id));
        if let Some(selected) = self.selected_edge {
            if self.edge(selected).is_none() {
                self.selected_edge = None;
            }
        }
        if self.over.map(|o| o.node) == Some(id) {
            self.over = None;
        }
        if self.creating_edge.map(|p| p.start_node) == Some(id) {
            self.creating_edge = None;
        }
        true
    }

    /// Remove a committed edge, clearing the selection if it was selected.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        if self.edges.len() == before {
            return false;
        }
        if self.selected_edge == Some(id) {
            self.selected_edge = None;
        }
        true
    }

    /// Drop every edge whose start or end node no longer exists.
    ///
    /// Dangling edges are a tolerated inconsistency, not a fault; they are
    /// logged and removed. Returns how many were pruned.
    pub fn prune_dangling_edges(&mut self) -> usize {
        let ids: HashSet<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        let before = self.edges.len();
        self.edges.retain(|e| {
            let ok = ids.contains(&e.start_node) && ids.contains(&e.end_node);
            if !ok {
                log::warn!("pruning dangling edge {}", e.id);
            }
            ok
        });
        before - self.edges.len()
    }
}

/// Initial graph a host may hand to a new session.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    pub canvas: Size,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Why a bootstrap snapshot was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),
    #[error("duplicate edge id {0}")]
    DuplicateEdge(EdgeId),
    #[error("canvas size {width}x{height} is not positive")]
    DegenerateCanvas { width: f32, height: f32 },
}

impl GraphState {
    /// Build a session state from a host-supplied snapshot.
    ///
    /// Duplicate ids and a degenerate canvas are rejected; edges referencing
    /// missing nodes are pruned with a warning rather than rejected.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        let Snapshot {
            canvas,
            nodes,
            edges,
        } = snapshot;

        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(SnapshotError::DegenerateCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }

        let mut node_ids = HashSet::new();
        for node in &nodes {
            if !node_ids.insert(node.id) {
                return Err(SnapshotError::DuplicateNode(node.id));
            }
        }
        let mut edge_ids = HashSet::new();
        for edge in &edges {
            if !edge_ids.insert(edge.id) {
                return Err(SnapshotError::DuplicateEdge(edge.id));
            }
        }

        let mut state = Self {
            canvas,
            nodes,
            edges,
            creating_edge: None,
            over: None,
            selected_edge: None,
        };
        state.prune_dangling_edges();
        Ok(state)
    }
}
