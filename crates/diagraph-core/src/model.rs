//! Core data model for diagrams.
//!
//! Nodes and connections are plain data owned by the host application; the
//! engine never keeps a persistent copy. Each render the host's current
//! arrays are indexed into a [`DiagramSnapshot`], queried for geometry and
//! hit testing, and thrown away. Proposed mutations flow back to the host
//! through callbacks — see the editor crate.

use crate::id::ElementId;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

// ─── Geometry value types ────────────────────────────────────────────────

/// A point in logical (diagram) coordinates. Top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// A 2D offset. Used for the screen-space pan translation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Size assumed for nodes whose host supplies no explicit `size`.
/// Governs hit testing and boundary intersection only — rendering is the
/// host's business.
pub const DEFAULT_NODE_SIZE: Size = Size {
    width: 120.0,
    height: 60.0,
};

/// An axis-aligned bounding box in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a normalized rectangle from two arbitrary corner points, so a
    /// drag in any direction yields the same box.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Open AABB overlap test — touching edges do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Smallest box covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Bounds {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

// ─── Shapes ──────────────────────────────────────────────────────────────

/// The shape family of a node's outline.
///
/// Matched exhaustively by the geometry module, so adding a shape here is a
/// compile error until its boundary math exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    Rect,
    RoundedRect,
    Ellipse,
    Circle,
}

// ─── Anchors ─────────────────────────────────────────────────────────────

/// A side of a node's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// A fixed attachment point on a node boundary: a side plus an offset
/// fraction in [0, 1] along that side. Used in place of the computed ray
/// intersection when a connection end carries an override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub side: Side,
    pub offset: f32,
}

impl Anchor {
    pub const fn new(side: Side, offset: f32) -> Self {
        Self { side, offset }
    }

    /// The anchor's position on the given bounding box.
    pub fn resolve(&self, b: &Bounds) -> Point {
        let t = self.offset.clamp(0.0, 1.0);
        match self.side {
            Side::Top => Point::new(b.x + b.width * t, b.y),
            Side::Bottom => Point::new(b.x + b.width * t, b.bottom()),
            Side::Left => Point::new(b.x, b.y + b.height * t),
            Side::Right => Point::new(b.right(), b.y + b.height * t),
        }
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A diagram node. Position and size are logical units; `payload` is an
/// opaque blob the engine carries but never interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: ElementId,
    pub position: Point,
    /// Explicit size. `None` means the host renders an intrinsic size;
    /// hit testing and boundary math fall back to [`DEFAULT_NODE_SIZE`].
    pub size: Option<Size>,
    pub shape: Shape,
    /// Whether a resize handle is offered for this node.
    pub resizable: bool,
    /// Host-owned content, opaque to the engine.
    pub payload: Option<String>,
}

impl Node {
    pub fn new(id: ElementId, x: f32, y: f32, shape: Shape) -> Self {
        Self {
            id,
            position: Point::new(x, y),
            size: None,
            shape,
            resizable: false,
            payload: None,
        }
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    pub fn resizable(mut self) -> Self {
        self.resizable = true;
        self
    }

    pub fn effective_size(&self) -> Size {
        self.size.unwrap_or(DEFAULT_NODE_SIZE)
    }

    pub fn bounds(&self) -> Bounds {
        let s = self.effective_size();
        Bounds::new(self.position.x, self.position.y, s.width, s.height)
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// One end of a connection: either a literal coordinate or a reference to a
/// node, in which case the point is recomputed from the live node position
/// on every use — never cached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Endpoint {
    Literal(Point),
    NodeRef(ElementId),
}

/// How the connection path is drawn between its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Straight,
    Orthogonal,
    Curved,
}

/// A visual connection between two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ElementId,
    pub source: Endpoint,
    pub target: Endpoint,
    /// Per-end anchor overrides. When present, the end attaches at the
    /// anchor instead of the computed boundary intersection.
    pub source_anchor: Option<Anchor>,
    pub target_anchor: Option<Anchor>,
    /// User-adjusted routing points (0–2), set by control-point drags.
    pub control_points: SmallVec<[Point; 2]>,
    pub line_style: LineStyle,
    pub arrow_start: bool,
    pub arrow_end: bool,
    pub label: Option<String>,
    /// Fraction along the path where the label sits. 0.5 = midpoint.
    pub label_position: f32,
    /// Optional color override, opaque to the engine (host resolves it).
    pub color: Option<String>,
}

impl Connection {
    pub fn new(id: ElementId, source: Endpoint, target: Endpoint) -> Self {
        Self {
            id,
            source,
            target,
            source_anchor: None,
            target_anchor: None,
            control_points: SmallVec::new(),
            line_style: LineStyle::default(),
            arrow_start: false,
            arrow_end: true,
            label: None,
            label_position: 0.5,
            color: None,
        }
    }

    /// Connect two nodes by id with the default style.
    pub fn between(id: ElementId, source: ElementId, target: ElementId) -> Self {
        Self::new(id, Endpoint::NodeRef(source), Endpoint::NodeRef(target))
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.line_style = style;
        self
    }
}

// ─── Documents (host-side persistence helper) ────────────────────────────

/// A plain serializable bundle of nodes and connections.
///
/// The engine owns no history and no storage; this type exists so hosts can
/// snapshot their translated model around gestures (MessagePack via
/// rmp-serde) without inventing their own envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagramDoc {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl DiagramDoc {
    pub fn to_msgpack(&self) -> Result<Vec<u8>, String> {
        rmp_serde::to_vec(self).map_err(|e| e.to_string())
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, String> {
        rmp_serde::from_slice(bytes).map_err(|e| e.to_string())
    }
}

// ─── Snapshot (per-render index) ─────────────────────────────────────────

/// An indexed view over the host's current node/connection arrays.
///
/// Built fresh on every render. Node-referencing connections whose ids
/// resolve become edges of a [`StableDiGraph`]; connections with a literal
/// endpoint live in a side list. A connection referencing an unknown node
/// id never makes it in at all — malformed references are implicitly
/// absent, not an error.
#[derive(Debug, Default)]
pub struct DiagramSnapshot {
    graph: StableDiGraph<Node, Connection>,
    id_index: HashMap<ElementId, NodeIndex>,
    /// Renderable connections with at least one literal endpoint.
    floating: Vec<Connection>,
    conn_ids: HashSet<ElementId>,
}

impl DiagramSnapshot {
    pub fn new(nodes: &[Node], connections: &[Connection]) -> Self {
        let mut graph = StableDiGraph::new();
        let mut id_index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if id_index.contains_key(&node.id) {
                log::debug!("duplicate node id {}, keeping the first", node.id);
                continue;
            }
            if !node.position.x.is_finite() || !node.position.y.is_finite() {
                log::debug!("node {} has a non-finite position, skipping", node.id);
                continue;
            }
            let idx = graph.add_node(node.clone());
            id_index.insert(node.id, idx);
        }

        let mut floating = Vec::new();
        let mut conn_ids = HashSet::new();
        for conn in connections {
            let valid = |end: &Endpoint| match end {
                Endpoint::NodeRef(id) => id_index.contains_key(id),
                Endpoint::Literal(p) => p.x.is_finite() && p.y.is_finite(),
            };
            if !valid(&conn.source) || !valid(&conn.target) {
                log::debug!("connection {} references a missing node, dropped", conn.id);
                continue;
            }
            let resolve = |end: &Endpoint| match end {
                Endpoint::NodeRef(id) => id_index.get(id).copied(),
                Endpoint::Literal(_) => None,
            };
            conn_ids.insert(conn.id);
            match (resolve(&conn.source), resolve(&conn.target)) {
                (Some(a), Some(b)) => {
                    graph.add_edge(a, b, conn.clone());
                }
                _ => floating.push(conn.clone()),
            }
        }

        Self {
            graph,
            id_index,
            floating,
            conn_ids,
        }
    }

    pub fn node(&self, id: ElementId) -> Option<&Node> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn contains_node(&self, id: ElementId) -> bool {
        self.id_index.contains_key(&id)
    }

    /// Whether `id` names a live node or a renderable connection.
    pub fn contains(&self, id: ElementId) -> bool {
        self.id_index.contains_key(&id) || self.conn_ids.contains(&id)
    }

    /// Nodes in host (paint) order — last is topmost.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Every renderable connection: all node-to-node edges plus the
    /// literal-endpoint ones. Connections that referenced missing nodes are
    /// simply not here.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.edge_weights().chain(self.floating.iter())
    }

    pub fn connection(&self, id: ElementId) -> Option<&Connection> {
        self.connections().find(|c| c.id == id)
    }

    /// Union bounding box of all nodes, or `None` for an empty diagram.
    pub fn content_bounds(&self) -> Option<Bounds> {
        let mut iter = self.nodes();
        let first = iter.next()?.bounds();
        Some(iter.fold(first, |acc, n| acc.union(&n.bounds())))
    }
}
