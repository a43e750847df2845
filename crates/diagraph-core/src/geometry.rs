//! Pure geometry: shape boundary intersections, connection path building,
//! and label placement.
//!
//! Everything here fails soft. Degenerate input (zero-size shapes,
//! coincident points, zero-length rays) returns a safe default — typically
//! the unperturbed center point — never a NaN, an infinity, or an error.

use crate::model::{Anchor, Connection, DiagramSnapshot, Endpoint, LineStyle, Node, Point, Shape};
use serde::{Deserialize, Serialize};

/// Minimum horizontal control-point offset for curved connections.
pub const MIN_CURVE_OFFSET: f32 = 50.0;

/// Segments used when flattening a cubic for distance queries.
const CUBIC_FLATTEN_STEPS: u32 = 16;

// ─── Boundary intersection ───────────────────────────────────────────────

/// Where a ray from the node's center toward `toward` crosses the node's
/// outline. With a degenerate direction (or a degenerate node) the center
/// itself comes back unchanged.
pub fn boundary_intersection(node: &Node, toward: Point) -> Point {
    let b = node.bounds();
    let c = b.center();
    let dx = toward.x - c.x;
    let dy = toward.y - c.y;
    let hw = b.width / 2.0;
    let hh = b.height / 2.0;
    if (dx == 0.0 && dy == 0.0) || hw <= 0.0 || hh <= 0.0 {
        return c;
    }

    match node.shape {
        Shape::Ellipse => ellipse_crossing(c, dx, dy, hw, hh),
        Shape::Circle => {
            // A true circle is the special case rx = ry = min(w, h) / 2.
            let r = hw.min(hh);
            ellipse_crossing(c, dx, dy, r, r)
        }
        Shape::Rect | Shape::RoundedRect => rect_crossing(c, dx, dy, hw, hh),
    }
}

/// Solve the implicit ellipse equation along the direction vector:
/// `t = 1 / sqrt((dx/rx)² + (dy/ry)²)`, crossing at `center + t·(dx, dy)`.
fn ellipse_crossing(c: Point, dx: f32, dy: f32, rx: f32, ry: f32) -> Point {
    let k = (dx / rx).powi(2) + (dy / ry).powi(2);
    if k <= 0.0 || !k.is_finite() {
        return c;
    }
    let t = 1.0 / k.sqrt();
    Point::new(c.x + dx * t, c.y + dy * t)
}

/// Pick the crossing with the vertical edge at `x = ±hw` when the resulting
/// y lies within `±hh`, else the crossing with the horizontal edge.
fn rect_crossing(c: Point, dx: f32, dy: f32, hw: f32, hh: f32) -> Point {
    if dx != 0.0 {
        let x_edge = hw.copysign(dx);
        let y_at = dy * x_edge / dx;
        if y_at.abs() <= hh {
            return Point::new(c.x + x_edge, c.y + y_at);
        }
    }
    if dy != 0.0 {
        let y_edge = hh.copysign(dy);
        let x_at = dx * y_edge / dy;
        return Point::new(c.x + x_at, c.y + y_edge);
    }
    c
}

// ─── Path building ───────────────────────────────────────────────────────

/// A path command in the vocabulary connection routing emits. The host's
/// renderer maps these 1:1 onto its own path API (SVG, canvas, skia, …).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCmd {
    MoveTo(Point),
    LineTo(Point),
    /// c1, c2, end.
    CubicTo(Point, Point, Point),
}

/// Build the path for one connection between already-resolved endpoints.
/// `control` holds the user-adjusted routing points, which override the
/// computed ones when present.
pub fn path_for(style: LineStyle, start: Point, end: Point, control: &[Point]) -> Vec<PathCmd> {
    match style {
        LineStyle::Straight => vec![PathCmd::MoveTo(start), PathCmd::LineTo(end)],
        LineStyle::Orthogonal => {
            // One elbow at the horizontal midpoint; a dragged control point
            // moves the elbow column.
            let mid_x = control
                .first()
                .map(|p| p.x)
                .unwrap_or((start.x + end.x) / 2.0);
            vec![
                PathCmd::MoveTo(start),
                PathCmd::LineTo(Point::new(mid_x, start.y)),
                PathCmd::LineTo(Point::new(mid_x, end.y)),
                PathCmd::LineTo(end),
            ]
        }
        LineStyle::Curved => {
            let offset = ((end.x - start.x).abs() * 0.5).max(MIN_CURVE_OFFSET);
            let c1 = control
                .first()
                .copied()
                .unwrap_or(Point::new(start.x + offset, start.y));
            let c2 = control
                .get(1)
                .copied()
                .unwrap_or(Point::new(end.x - offset, end.y));
            vec![PathCmd::MoveTo(start), PathCmd::CubicTo(c1, c2, end)]
        }
    }
}

/// Label placement: linear interpolation between the endpoints. This is an
/// accepted approximation for orthogonal and curved styles — it does not
/// follow the actual path.
pub fn label_position(start: Point, end: Point, fraction: f32) -> Point {
    Point {
        x: start.x + (end.x - start.x) * fraction,
        y: start.y + (end.y - start.y) * fraction,
    }
}

// ─── Endpoint resolution ─────────────────────────────────────────────────

/// The raw position an endpoint aims at: a literal point, or the live
/// center of the referenced node.
fn raw_point(snapshot: &DiagramSnapshot, end: &Endpoint) -> Option<Point> {
    match end {
        Endpoint::Literal(p) => Some(*p),
        Endpoint::NodeRef(id) => snapshot.node(*id).map(Node::center),
    }
}

/// The actual attach position of an endpoint: the anchor override when one
/// is set, otherwise the boundary intersection toward the opposite end.
fn attach_point(
    snapshot: &DiagramSnapshot,
    end: &Endpoint,
    anchor: Option<Anchor>,
    toward: Point,
) -> Option<Point> {
    match end {
        Endpoint::Literal(p) => Some(*p),
        Endpoint::NodeRef(id) => {
            let node = snapshot.node(*id)?;
            Some(match anchor {
                Some(a) => a.resolve(&node.bounds()),
                None => boundary_intersection(node, toward),
            })
        }
    }
}

/// Resolve a connection's endpoints against the live snapshot. `None` means
/// the connection is unrenderable this frame (a referenced node is gone) —
/// callers skip it, they do not error.
pub fn resolve_endpoints(snapshot: &DiagramSnapshot, conn: &Connection) -> Option<(Point, Point)> {
    let raw_source = raw_point(snapshot, &conn.source)?;
    let raw_target = raw_point(snapshot, &conn.target)?;
    let start = attach_point(snapshot, &conn.source, conn.source_anchor, raw_target)?;
    let end = attach_point(snapshot, &conn.target, conn.target_anchor, raw_source)?;
    Some((start, end))
}

/// Resolve and route a connection in one step.
pub fn connection_path(snapshot: &DiagramSnapshot, conn: &Connection) -> Option<Vec<PathCmd>> {
    let (start, end) = resolve_endpoints(snapshot, conn)?;
    Some(path_for(conn.line_style, start, end, &conn.control_points))
}

/// Where a connection's label sits, at its configured fraction along the
/// endpoints.
pub fn connection_label_position(snapshot: &DiagramSnapshot, conn: &Connection) -> Option<Point> {
    let (start, end) = resolve_endpoints(snapshot, conn)?;
    Some(label_position(start, end, conn.label_position))
}

// ─── Distance queries (connection hit testing) ───────────────────────────

/// Distance from `p` to the segment `a..b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq <= f32::EPSILON {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + abx * t, a.y + aby * t))
}

fn cubic_at(a: Point, c1: Point, c2: Point, b: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    Point {
        x: w0 * a.x + w1 * c1.x + w2 * c2.x + w3 * b.x,
        y: w0 * a.y + w1 * c1.y + w2 * c2.y + w3 * b.y,
    }
}

/// Distance from `p` to a path, flattening cubics by fixed-step sampling.
/// An empty path is infinitely far away.
pub fn distance_to_path(p: Point, path: &[PathCmd]) -> f32 {
    let mut best = f32::INFINITY;
    let mut cursor: Option<Point> = None;
    for cmd in path {
        match *cmd {
            PathCmd::MoveTo(to) => cursor = Some(to),
            PathCmd::LineTo(to) => {
                if let Some(from) = cursor {
                    best = best.min(distance_to_segment(p, from, to));
                }
                cursor = Some(to);
            }
            PathCmd::CubicTo(c1, c2, to) => {
                if let Some(from) = cursor {
                    let mut prev = from;
                    for i in 1..=CUBIC_FLATTEN_STEPS {
                        let t = i as f32 / CUBIC_FLATTEN_STEPS as f32;
                        let next = cubic_at(from, c1, c2, to, t);
                        best = best.min(distance_to_segment(p, prev, next));
                        prev = next;
                    }
                }
                cursor = Some(to);
            }
        }
    }
    best
}
