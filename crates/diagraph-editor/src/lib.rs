//! Diagraph editor — the interaction engine shared by every diagram type:
//! selection, drag, resize, connection drawing, box selection, pan/zoom
//! gestures, and keyboard shortcuts.
//!
//! The host owns the diagram data and applies the mutations this crate
//! proposes through [`host::EditorHost`]; see `diagraph-core` for the data
//! model and geometry underneath.

pub mod controller;
pub mod host;
pub mod input;
pub mod selection;
pub mod shortcuts;
pub mod subscription;

pub use controller::{DRAG_DEAD_ZONE, EditorController, MIN_NODE_SIZE, Tool};
pub use host::{EditorHost, GestureKind};
pub use input::{Key, KeyInput, Modifiers, PointerButton, PointerInput, TouchAdapter};
pub use selection::Selection;
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use subscription::{EditorListeners, InputSubscription};
