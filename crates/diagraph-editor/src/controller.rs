//! The pointer/keyboard-driven interaction state machine.
//!
//! One controller instance per embedded diagram. Every transition runs
//! synchronously inside the input handler that triggered it; the controller
//! reads the host's current [`DiagramSnapshot`] on each event and proposes
//! mutations through [`EditorHost`] callbacks. It never raises an error to
//! the host — invalid gestures are structurally unreachable and geometric
//! degeneracies fail soft.

use crate::host::{EditorHost, GestureKind};
use crate::input::{Key, KeyInput, PointerButton, PointerInput};
use crate::selection::Selection;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use diagraph_core::viewport::{FIT_PADDING, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT};
use diagraph_core::{
    Bounds, DiagramSnapshot, ElementId, Point, Size, ViewState, fit_to_content, hit,
    screen_to_logical,
};

/// Pointer travel (screen pixels, Euclidean) below which a press-move-release
/// still counts as a plain click. Suppresses phantom drags.
pub const DRAG_DEAD_ZONE: f32 = 5.0;
/// Floor for node width and height during a resize, in logical units.
pub const MIN_NODE_SIZE: f32 = 50.0;

/// The active tool gates which transitions out of Idle are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Connect,
    Pan,
}

#[derive(Debug, Clone)]
enum State {
    Idle,
    PanningCanvas {
        last: Point,
    },
    BoxSelecting {
        /// Logical-space drag rectangle corners.
        origin: Point,
        cursor: Point,
        additive: bool,
    },
    DraggingNode {
        origin_screen: Point,
        /// Initial positions of every selected node, captured at press.
        initial: Vec<(ElementId, Point)>,
        /// Whether the pointer has left the dead-zone.
        live: bool,
    },
    ResizingNode {
        id: ElementId,
        origin_screen: Point,
        initial: Size,
    },
    DrawingConnection {
        source: ElementId,
        cursor: Point,
    },
    DraggingControlPoint {
        id: ElementId,
        index: usize,
    },
}

/// The interaction engine: tool mode, view transform, selection, and the
/// gesture state machine.
pub struct EditorController {
    tool: Tool,
    /// Tool to restore when a held Space is released.
    prev_tool: Tool,
    space_held: bool,
    state: State,
    view: ViewState,
    selection: Selection,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorController {
    pub fn new() -> Self {
        Self {
            tool: Tool::Select,
            prev_tool: Tool::Select,
            space_held: false,
            state: State::Idle,
            view: ViewState::default(),
            selection: Selection::new(),
        }
    }

    // ─── View ────────────────────────────────────────────────────────────

    /// The live view transform. The host may read, override, or reset it.
    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    /// One wheel tick: positive zooms in (×1.1), negative zooms out (×0.9).
    pub fn wheel(&mut self, ticks: i32) {
        let factor = if ticks >= 0 {
            WHEEL_ZOOM_IN
        } else {
            WHEEL_ZOOM_OUT
        };
        for _ in 0..ticks.unsigned_abs() {
            self.view.zoom_by(factor);
        }
    }

    /// Toolbar zoom-in button: +0.1, clamped.
    pub fn zoom_in(&mut self) {
        self.view.zoom_step(1.0);
    }

    /// Toolbar zoom-out button: −0.1, clamped.
    pub fn zoom_out(&mut self) {
        self.view.zoom_step(-1.0);
    }

    /// Fit the whole diagram into `container`. An empty diagram resets the
    /// view instead of producing a degenerate transform.
    pub fn fit_to_content(&mut self, snapshot: &DiagramSnapshot, container: Size) {
        self.view = match snapshot.content_bounds() {
            Some(bounds) => fit_to_content(bounds, container, FIT_PADDING),
            None => ViewState::default(),
        };
    }

    // ─── Tool & selection ────────────────────────────────────────────────

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tool {
            self.prev_tool = self.tool;
            self.tool = tool;
        }
    }

    pub fn selected_ids(&self) -> &[ElementId] {
        self.selection.ids()
    }

    /// Drop selected ids that no longer exist. Hosts call this after
    /// applying external mutations (their own deletes, undo, redo).
    pub fn prune_selection(&mut self, snapshot: &DiagramSnapshot, host: &mut impl EditorHost) {
        if self.selection.prune(snapshot) {
            host.on_selection_change(self.selection.ids());
        }
    }

    // ─── Render overlays ─────────────────────────────────────────────────

    /// The in-progress box-selection rectangle, for the host to render.
    pub fn box_selection_rect(&self) -> Option<Bounds> {
        match &self.state {
            State::BoxSelecting { origin, cursor, .. } => {
                Some(Bounds::from_corners(*origin, *cursor))
            }
            _ => None,
        }
    }

    /// The rubber-band line of an in-progress connection draw: live source
    /// node center → current pointer, in logical space.
    pub fn rubber_band(&self, snapshot: &DiagramSnapshot) -> Option<(Point, Point)> {
        match &self.state {
            State::DrawingConnection { source, cursor } => {
                snapshot.node(*source).map(|n| (n.center(), *cursor))
            }
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    // ─── Pointer events ──────────────────────────────────────────────────

    pub fn pointer_down(
        &mut self,
        snapshot: &DiagramSnapshot,
        input: PointerInput,
        host: &mut impl EditorHost,
    ) {
        let screen = input.pos;
        let logical = screen_to_logical(screen, &self.view);

        // An in-progress connection draw owns the pointer: presses on
        // nodes are ignored (the commit happens on release), presses on
        // empty canvas cancel without committing.
        if matches!(self.state, State::DrawingConnection { .. }) {
            if hit::hit_node(snapshot, logical).is_none() {
                log::debug!("connection draw cancelled on empty canvas");
                self.state = State::Idle;
                host.on_gesture_end(GestureKind::ConnectionDraw);
            }
            return;
        }
        if !matches!(self.state, State::Idle) {
            return;
        }

        // Middle button pans from anywhere, regardless of tool.
        if input.button == PointerButton::Middle {
            self.begin_pan(screen, host);
            return;
        }

        match self.tool {
            Tool::Pan => {
                if hit::hit_node(snapshot, logical).is_none() {
                    self.begin_pan(screen, host);
                }
            }
            Tool::Connect => {
                if let Some(source) = hit::hit_node(snapshot, logical) {
                    log::debug!("drawing connection from {source}");
                    host.on_gesture_start(GestureKind::ConnectionDraw);
                    let cursor = snapshot
                        .node(source)
                        .map(|n| n.center())
                        .unwrap_or(logical);
                    self.state = State::DrawingConnection { source, cursor };
                }
            }
            Tool::Select => self.pointer_down_select(snapshot, input, logical, host),
        }
    }

    fn pointer_down_select(
        &mut self,
        snapshot: &DiagramSnapshot,
        input: PointerInput,
        logical: Point,
        host: &mut impl EditorHost,
    ) {
        let screen = input.pos;
        let additive = input.modifiers.multi_select();

        if let Some(id) = hit::hit_resize_handle(snapshot, &self.view, screen) {
            // Only resizable nodes with an explicit size ever hit here.
            if let Some(node) = snapshot.node(id) {
                host.on_gesture_start(GestureKind::Resize);
                self.state = State::ResizingNode {
                    id,
                    origin_screen: screen,
                    initial: node.effective_size(),
                };
            }
            return;
        }

        if let Some((id, index)) = hit::hit_control_point(snapshot, &self.view, screen) {
            host.on_gesture_start(GestureKind::ControlPoint);
            self.state = State::DraggingControlPoint { id, index };
            return;
        }

        if let Some(id) = hit::hit_node(snapshot, logical) {
            let changed = if additive {
                self.selection.toggle(id, true)
            } else if !self.selection.contains(id) {
                // Plain click on an unselected node replaces the selection;
                // on an already-selected node it keeps it, so a multi-drag
                // can start.
                self.selection.replace(vec![id])
            } else {
                false
            };
            if changed {
                host.on_selection_change(self.selection.ids());
            }

            if self.selection.contains(id) {
                let initial: Vec<(ElementId, Point)> = self
                    .selection
                    .ids()
                    .iter()
                    .filter_map(|sel| snapshot.node(*sel).map(|n| (*sel, n.position)))
                    .collect();
                host.on_gesture_start(GestureKind::Drag);
                self.state = State::DraggingNode {
                    origin_screen: screen,
                    initial,
                    live: false,
                };
            }
            return;
        }

        if let Some(id) = hit::hit_connection(snapshot, &self.view, logical) {
            let changed = if additive {
                self.selection.toggle(id, true)
            } else {
                self.selection.replace(vec![id])
            };
            if changed {
                host.on_selection_change(self.selection.ids());
            }
            return;
        }

        // Empty canvas: box selection. A degenerate box (plain click)
        // resolves on release, clearing the selection unless additive.
        host.on_gesture_start(GestureKind::BoxSelect);
        self.state = State::BoxSelecting {
            origin: logical,
            cursor: logical,
            additive,
        };
    }

    pub fn pointer_move(
        &mut self,
        _snapshot: &DiagramSnapshot,
        input: PointerInput,
        host: &mut impl EditorHost,
    ) {
        let screen = input.pos;
        let logical = screen_to_logical(screen, &self.view);
        let zoom = self.view.zoom;

        match &mut self.state {
            State::Idle => {}
            State::PanningCanvas { last } => {
                let dx = screen.x - last.x;
                let dy = screen.y - last.y;
                *last = screen;
                self.view.pan_by(dx, dy);
            }
            State::BoxSelecting { cursor, .. } => *cursor = logical,
            State::DraggingNode {
                origin_screen,
                initial,
                live,
            } => {
                let dx = screen.x - origin_screen.x;
                let dy = screen.y - origin_screen.y;
                if !*live {
                    if dx.hypot(dy) < DRAG_DEAD_ZONE {
                        return;
                    }
                    *live = true;
                }
                for (id, start) in initial.iter() {
                    host.on_node_move(*id, start.x + dx / zoom, start.y + dy / zoom);
                }
            }
            State::ResizingNode {
                id,
                origin_screen,
                initial,
            } => {
                let width =
                    (initial.width + (screen.x - origin_screen.x) / zoom).max(MIN_NODE_SIZE);
                let height =
                    (initial.height + (screen.y - origin_screen.y) / zoom).max(MIN_NODE_SIZE);
                host.on_node_resize(*id, width, height);
            }
            State::DrawingConnection { cursor, .. } => *cursor = logical,
            State::DraggingControlPoint { id, index } => {
                host.on_control_point_move(*id, *index, logical.x, logical.y);
            }
        }
    }

    pub fn pointer_up(
        &mut self,
        snapshot: &DiagramSnapshot,
        input: PointerInput,
        host: &mut impl EditorHost,
    ) {
        let logical = screen_to_logical(input.pos, &self.view);

        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {}
            State::PanningCanvas { .. } => host.on_gesture_end(GestureKind::Pan),
            State::DraggingNode { .. } => host.on_gesture_end(GestureKind::Drag),
            State::ResizingNode { .. } => host.on_gesture_end(GestureKind::Resize),
            State::DraggingControlPoint { .. } => host.on_gesture_end(GestureKind::ControlPoint),
            State::BoxSelecting {
                origin, additive, ..
            } => {
                self.finish_box_select(snapshot, origin, logical, additive, host);
            }
            State::DrawingConnection { source, cursor } => {
                match hit::hit_node(snapshot, logical) {
                    // Releasing over a different node commits. Source ==
                    // target never creates a connection, independent of any
                    // host-side rule.
                    Some(target) if target != source => {
                        log::debug!("connection committed: {source} -> {target}");
                        host.on_connection_create(source, target);
                        host.on_gesture_end(GestureKind::ConnectionDraw);
                    }
                    // Same node or empty canvas: click-to-place, keep
                    // drawing until a different node is clicked.
                    _ => self.state = State::DrawingConnection { source, cursor },
                }
            }
        }
    }

    /// Pointer left the surface. Identical to pointer-up for pan, drag,
    /// resize, and box-select: whatever was last streamed stands. An
    /// in-progress connection draw stays alive (only an empty-canvas click
    /// cancels it).
    pub fn pointer_leave(&mut self, snapshot: &DiagramSnapshot, host: &mut impl EditorHost) {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {}
            State::PanningCanvas { .. } => host.on_gesture_end(GestureKind::Pan),
            State::DraggingNode { .. } => host.on_gesture_end(GestureKind::Drag),
            State::ResizingNode { .. } => host.on_gesture_end(GestureKind::Resize),
            State::DraggingControlPoint { .. } => host.on_gesture_end(GestureKind::ControlPoint),
            State::BoxSelecting {
                origin,
                cursor,
                additive,
            } => self.finish_box_select(snapshot, origin, cursor, additive, host),
            drawing @ State::DrawingConnection { .. } => self.state = drawing,
        }
    }

    fn begin_pan(&mut self, screen: Point, host: &mut impl EditorHost) {
        host.on_gesture_start(GestureKind::Pan);
        self.state = State::PanningCanvas { last: screen };
    }

    fn finish_box_select(
        &mut self,
        snapshot: &DiagramSnapshot,
        origin: Point,
        cursor: Point,
        additive: bool,
        host: &mut impl EditorHost,
    ) {
        let rect = Bounds::from_corners(origin, cursor);
        let hits = hit::nodes_in_rect(snapshot, &rect);
        let changed = if additive {
            self.selection.merge(hits)
        } else {
            self.selection.replace(hits)
        };
        if changed {
            host.on_selection_change(self.selection.ids());
        }
        host.on_gesture_end(GestureKind::BoxSelect);
    }

    // ─── Keyboard events ─────────────────────────────────────────────────

    pub fn key_down(&mut self, input: KeyInput, host: &mut impl EditorHost) {
        if input.in_text_field {
            return;
        }
        let Some(action) = ShortcutMap::resolve(input.key, input.modifiers) else {
            return;
        };

        match action {
            ShortcutAction::ToolSelect => self.set_tool(Tool::Select),
            ShortcutAction::ToolConnect => self.set_tool(Tool::Connect),
            ShortcutAction::PanHold => {
                if !self.space_held {
                    self.space_held = true;
                    self.set_tool(Tool::Pan);
                }
            }
            // Escape clears the selection but deliberately leaves an
            // in-progress connection draw alive.
            ShortcutAction::Deselect => {
                if self.selection.clear() {
                    host.on_selection_change(&[]);
                }
            }
            ShortcutAction::Delete => {
                if !self.selection.is_empty() {
                    host.on_delete();
                    self.selection.clear();
                    host.on_selection_change(&[]);
                    self.state = State::Idle;
                }
            }
            ShortcutAction::Undo => {
                if host.can_undo() {
                    host.undo();
                }
            }
            ShortcutAction::Redo => {
                if host.can_redo() {
                    host.redo();
                }
            }
        }
    }

    /// Key releases only matter for the held-Space pan: releasing restores
    /// the previous tool.
    pub fn key_up(&mut self, input: KeyInput) {
        if input.key == Key::Space && self.space_held {
            self.space_held = false;
            if self.tool == Tool::Pan {
                self.tool = self.prev_tool;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    struct NullHost;

    impl EditorHost for NullHost {
        fn on_node_move(&mut self, _: ElementId, _: f32, _: f32) {}
        fn on_node_resize(&mut self, _: ElementId, _: f32, _: f32) {}
        fn on_connection_create(&mut self, _: ElementId, _: ElementId) {}
        fn on_control_point_move(&mut self, _: ElementId, _: usize, _: f32, _: f32) {}
        fn on_delete(&mut self) {}
        fn on_selection_change(&mut self, _: &[ElementId]) {}
    }

    #[test]
    fn space_hold_swaps_to_pan_and_back() {
        let mut ctl = EditorController::new();
        ctl.set_tool(Tool::Connect);

        ctl.key_down(KeyInput::plain(Key::Space), &mut NullHost);
        assert_eq!(ctl.tool(), Tool::Pan);

        // Auto-repeat keeps the pan tool without clobbering prev_tool.
        ctl.key_down(KeyInput::plain(Key::Space), &mut NullHost);
        assert_eq!(ctl.tool(), Tool::Pan);

        ctl.key_up(KeyInput::plain(Key::Space));
        assert_eq!(ctl.tool(), Tool::Connect);
    }

    #[test]
    fn text_field_focus_swallows_shortcuts() {
        let mut ctl = EditorController::new();
        let mut input = KeyInput::plain(Key::Char('c'));
        input.in_text_field = true;
        ctl.key_down(input, &mut NullHost);
        assert_eq!(ctl.tool(), Tool::Select);
    }

    #[test]
    fn wheel_ticks_scale_zoom() {
        let mut ctl = EditorController::new();
        ctl.wheel(1);
        assert!((ctl.view().zoom - 1.1).abs() < 1e-4);
        ctl.wheel(-1);
        assert!((ctl.view().zoom - 0.99).abs() < 1e-4);
    }

    #[test]
    fn undo_shortcut_respects_can_undo() {
        struct CountingHost {
            undo_calls: u32,
            allow: bool,
        }
        impl EditorHost for CountingHost {
            fn on_node_move(&mut self, _: ElementId, _: f32, _: f32) {}
            fn on_node_resize(&mut self, _: ElementId, _: f32, _: f32) {}
            fn on_connection_create(&mut self, _: ElementId, _: ElementId) {}
            fn on_control_point_move(&mut self, _: ElementId, _: usize, _: f32, _: f32) {}
            fn on_delete(&mut self) {}
            fn on_selection_change(&mut self, _: &[ElementId]) {}
            fn undo(&mut self) {
                self.undo_calls += 1;
            }
            fn can_undo(&self) -> bool {
                self.allow
            }
        }

        let ctrl_z = KeyInput::with_modifiers(
            Key::Char('z'),
            Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        );

        let mut ctl = EditorController::new();
        let mut host = CountingHost {
            undo_calls: 0,
            allow: false,
        };
        ctl.key_down(ctrl_z, &mut host);
        assert_eq!(host.undo_calls, 0);

        host.allow = true;
        ctl.key_down(ctrl_z, &mut host);
        assert_eq!(host.undo_calls, 1);
    }
}
