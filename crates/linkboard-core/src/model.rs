//! Diagram document: nodes, connections, and their invariants.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Shape kinds available from the palette.
///
/// The kind determines rendering geometry only, never behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Diamond,
}

impl ShapeKind {
    /// Wire/id form of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Diamond => "diamond",
        }
    }

    /// Human-readable name shown in the palette.
    pub fn display_name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Diamond => "Diamond",
        }
    }
}

/// Anchor labels on a node's boundary where connections attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Right,
    Bottom,
    Left,
}

impl Anchor {
    /// All four anchors, in the order they are laid out on a node.
    pub const ALL: [Anchor; 4] = [Anchor::Top, Anchor::Right, Anchor::Bottom, Anchor::Left];
}

/// A node placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique id, stable for the node's lifetime.
    pub id: String,
    /// Shape kind from the palette.
    pub kind: ShapeKind,
    /// Top-left corner in canvas-local coordinates.
    pub position: Point,
}

/// A directed connection between two node anchors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Unique id.
    pub id: String,
    /// Node the connection leaves from.
    pub source_id: String,
    /// Node the arrowhead points at.
    pub target_id: String,
    /// Anchor on the source node.
    pub source_anchor: Anchor,
    /// Anchor on the target node.
    pub target_anchor: Anchor,
}

/// The authoritative in-memory diagram state.
///
/// Both collections are ordered by insertion and append-only; the single
/// exception is [`Diagram::set_node_position`], which replaces a node by id
/// during a drag. No other component mutates the diagram directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagram {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
}

impl Diagram {
    /// Create an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check if the diagram has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node.
    ///
    /// A node with a colliding id or a non-finite position is rejected
    /// silently; id uniqueness and finite positions are invariants of the
    /// live node set.
    pub fn add_node(&mut self, node: Node) {
        if self.node(&node.id).is_some() {
            log::warn!("node id {} already present, dropping insert", node.id);
            return;
        }
        if !node.position.is_finite() {
            log::warn!("node {} has a non-finite position, dropping insert", node.id);
            return;
        }
        self.nodes.push(node);
    }

    /// Append a connection.
    ///
    /// Endpoints are expected to reference live nodes at creation time; the
    /// diagram itself tolerates dangling references, which are skipped at
    /// render time.
    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Replace a node's position by id.
    ///
    /// The one post-creation update, driven by the drag gesture. Unknown ids
    /// and non-finite positions are ignored.
    pub fn set_node_position(&mut self, id: &str, position: Point) {
        if !position.is_finite() {
            log::warn!("non-finite position for node {id}, keeping previous");
            return;
        }
        if let Some(slot) = self.nodes.iter_mut().find(|n| n.id == id) {
            *slot = Node {
                position,
                ..slot.clone()
            };
        }
    }

    /// Serialize the diagram to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a diagram from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Generates node ids of the form `{kind}-{unix_millis}-{seq}`.
///
/// The sequence suffix keeps ids pairwise distinct even when several drops
/// land in the same millisecond.
#[derive(Debug, Clone, Default)]
pub struct NodeIdGenerator {
    seq: u64,
}

impl NodeIdGenerator {
    /// Create a generator starting at sequence zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next node id for the given kind.
    pub fn next_id(&mut self, kind: ShapeKind) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        self.seq += 1;
        format!("{}-{}-{}", kind.as_str(), millis, self.seq)
    }
}

/// Produce a fresh connection id.
pub fn connection_id() -> String {
    format!("connection-{}", Uuid::new_v4())
}
