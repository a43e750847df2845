//! The host boundary: one callback per mutation kind.
//!
//! The engine proposes, the host disposes. Every callback reads as "the
//! user asked for this" — the host applies it to its own domain model (or
//! refuses: ignoring `on_connection_create` is how domain validation
//! happens) and re-supplies fresh node/connection arrays on the next
//! render.

use diagraph_core::ElementId;

/// One complete pointer-down → move → up interaction episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
    Pan,
    BoxSelect,
    ConnectionDraw,
    ControlPoint,
}

/// Callbacks the engine invokes on the host.
///
/// Drag, resize, and control-point gestures **stream** continuously — there
/// is no discrete commit call. A host implementing undo must snapshot its
/// model exactly once per gesture, in [`EditorHost::on_gesture_start`],
/// never once per streamed move (that would record one history entry per
/// pixel of drag).
pub trait EditorHost {
    /// A node's proposed new position, streamed during a drag.
    fn on_node_move(&mut self, id: ElementId, x: f32, y: f32);

    /// A node's proposed new size, streamed during a resize. Never below
    /// the 50-unit floor on either axis.
    fn on_node_resize(&mut self, id: ElementId, width: f32, height: f32);

    /// The user finished drawing a connection. `source != target` is
    /// guaranteed; whether the connection is meaningful is the host's call.
    fn on_connection_create(&mut self, source: ElementId, target: ElementId);

    /// A connection control point's proposed new position, streamed.
    fn on_control_point_move(&mut self, id: ElementId, index: usize, x: f32, y: f32);

    /// Delete the current selection. The engine clears its selection right
    /// after this returns.
    fn on_delete(&mut self);

    /// The selection changed. Only invoked on actual changes.
    fn on_selection_change(&mut self, selected: &[ElementId]);

    /// A gesture began. The right moment for a history snapshot.
    fn on_gesture_start(&mut self, _kind: GestureKind) {}

    /// The gesture ended (pointer-up or pointer-leave — identical).
    fn on_gesture_end(&mut self, _kind: GestureKind) {}

    // ── History hooks. The engine stores nothing; it only forwards the
    //    keyboard shortcuts, gated on the flags below. ──

    fn undo(&mut self) {}

    fn redo(&mut self) {}

    fn can_undo(&self) -> bool {
        false
    }

    fn can_redo(&self) -> bool {
        false
    }
}
