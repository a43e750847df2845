//! Diagraph core — the data model and pure math under the interactive
//! diagram editor: node/connection records, pan/zoom transforms, shape
//! boundary geometry, connection routing, and hit testing.
//!
//! The host application owns the diagram; this crate owns no state beyond
//! the per-render [`model::DiagramSnapshot`] index. The interaction state
//! machine lives in the `diagraph-editor` crate.

pub mod geometry;
pub mod hit;
pub mod id;
pub mod model;
pub mod viewport;

pub use geometry::{
    PathCmd, boundary_intersection, connection_label_position, connection_path, label_position,
    path_for,
};
pub use id::ElementId;
pub use model::{
    Anchor, Bounds, Connection, DiagramDoc, DiagramSnapshot, Endpoint, LineStyle, Node, Point,
    Shape, Side, Size, Vector,
};
pub use viewport::{ViewState, fit_to_content, logical_to_screen, screen_to_logical};
