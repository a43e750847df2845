//! Hit testing: pointer position → diagram element.
//!
//! Node and box tests work in logical space. Handle and control-point tests
//! work in screen space, so the clickable area stays a constant pixel size
//! at every zoom level.

use crate::geometry::{connection_path, distance_to_path};
use crate::id::ElementId;
use crate::model::{Bounds, DiagramSnapshot, Point};
use crate::viewport::{ViewState, logical_to_screen};

/// Side length of the square resize handle, in screen pixels.
pub const RESIZE_HANDLE_PX: f32 = 8.0;
/// Hit radius around a connection control point, in screen pixels.
pub const CONTROL_POINT_PX: f32 = 6.0;
/// Maximum distance (screen pixels) at which a click selects a connection.
pub const CONNECTION_HIT_PX: f32 = 5.0;

/// Topmost node at a logical position. Later nodes paint on top, so the
/// walk runs back-to-front over the host's order.
pub fn hit_node(snapshot: &DiagramSnapshot, p: Point) -> Option<ElementId> {
    let nodes: Vec<_> = snapshot.nodes().collect();
    nodes
        .iter()
        .rev()
        .find(|n| n.bounds().contains(p))
        .map(|n| n.id)
}

/// All nodes whose bounding box overlaps `rect` (open intersection), in
/// host order. Used for box selection; connections are never box-selected.
pub fn nodes_in_rect(snapshot: &DiagramSnapshot, rect: &Bounds) -> Vec<ElementId> {
    snapshot
        .nodes()
        .filter(|n| n.bounds().intersects(rect))
        .map(|n| n.id)
        .collect()
}

/// The connection nearest to a logical position, if any is within
/// [`CONNECTION_HIT_PX`] screen pixels at the current zoom. Paths are
/// resolved against the live snapshot and flattened for the distance query.
pub fn hit_connection(
    snapshot: &DiagramSnapshot,
    view: &ViewState,
    logical: Point,
) -> Option<ElementId> {
    let tolerance = CONNECTION_HIT_PX / view.zoom;
    let mut best: Option<(f32, ElementId)> = None;
    for conn in snapshot.connections() {
        let Some(path) = connection_path(snapshot, conn) else {
            continue;
        };
        let d = distance_to_path(logical, &path);
        if d <= tolerance && best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, conn.id));
        }
    }
    best.map(|(_, id)| id)
}

/// The node whose resize handle sits under a screen position.
///
/// The handle is a [`RESIZE_HANDLE_PX`] square centered on the node's
/// bottom-right corner, and it is only offered for resizable nodes with an
/// explicit size — a non-resizable node structurally cannot start a resize.
pub fn hit_resize_handle(
    snapshot: &DiagramSnapshot,
    view: &ViewState,
    screen: Point,
) -> Option<ElementId> {
    let half = RESIZE_HANDLE_PX / 2.0;
    let nodes: Vec<_> = snapshot.nodes().collect();
    nodes
        .iter()
        .rev()
        .filter(|n| n.resizable && n.size.is_some())
        .find(|n| {
            let b = n.bounds();
            let corner = logical_to_screen(Point::new(b.right(), b.bottom()), view);
            (screen.x - corner.x).abs() <= half && (screen.y - corner.y).abs() <= half
        })
        .map(|n| n.id)
}

/// The connection control point under a screen position, as
/// `(connection id, control point index)`.
pub fn hit_control_point(
    snapshot: &DiagramSnapshot,
    view: &ViewState,
    screen: Point,
) -> Option<(ElementId, usize)> {
    for conn in snapshot.connections() {
        for (i, cp) in conn.control_points.iter().enumerate() {
            let on_screen = logical_to_screen(*cp, view);
            if screen.distance_to(on_screen) <= CONTROL_POINT_PX {
                return Some((conn.id, i));
            }
        }
    }
    None
}
