//! End-to-end gesture tests: drag, resize, pan, and box selection driven
//! through the controller against a recording host.

use diagraph_core::{Connection, DiagramSnapshot, ElementId, Node, Point, Shape, Vector, ViewState};
use diagraph_editor::{
    EditorController, EditorHost, GestureKind, Key, KeyInput, Modifiers, PointerButton,
    PointerInput, Tool,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Default)]
struct RecordingHost {
    moves: Vec<(ElementId, f32, f32)>,
    resizes: Vec<(ElementId, f32, f32)>,
    creates: Vec<(ElementId, ElementId)>,
    control_moves: Vec<(ElementId, usize, f32, f32)>,
    deletes: usize,
    selections: Vec<Vec<ElementId>>,
    gestures: Vec<(GestureKind, bool)>,
}

impl EditorHost for RecordingHost {
    fn on_node_move(&mut self, id: ElementId, x: f32, y: f32) {
        self.moves.push((id, x, y));
    }
    fn on_node_resize(&mut self, id: ElementId, width: f32, height: f32) {
        self.resizes.push((id, width, height));
    }
    fn on_connection_create(&mut self, source: ElementId, target: ElementId) {
        self.creates.push((source, target));
    }
    fn on_control_point_move(&mut self, id: ElementId, index: usize, x: f32, y: f32) {
        self.control_moves.push((id, index, x, y));
    }
    fn on_delete(&mut self) {
        self.deletes += 1;
    }
    fn on_selection_change(&mut self, selected: &[ElementId]) {
        self.selections.push(selected.to_vec());
    }
    fn on_gesture_start(&mut self, kind: GestureKind) {
        self.gestures.push((kind, true));
    }
    fn on_gesture_end(&mut self, kind: GestureKind) {
        self.gestures.push((kind, false));
    }
}

fn id(s: &str) -> ElementId {
    ElementId::intern(s)
}

fn down(x: f32, y: f32) -> PointerInput {
    PointerInput::mouse(x, y, PointerButton::Primary, Modifiers::NONE)
}

fn shift_down(x: f32, y: f32) -> PointerInput {
    PointerInput::mouse(
        x,
        y,
        PointerButton::Primary,
        Modifiers {
            shift: true,
            ..Modifiers::NONE
        },
    )
}

/// Two 100x50 nodes: `a` at the origin (resizable), `b` at (200, 100).
fn two_node_snapshot() -> DiagramSnapshot {
    let a = Node::new(id("a"), 0.0, 0.0, Shape::Rect)
        .with_size(100.0, 50.0)
        .resizable();
    let b = Node::new(id("b"), 200.0, 100.0, Shape::Rect).with_size(100.0, 50.0);
    DiagramSnapshot::new(&[a, b], &[])
}

fn click(
    ctl: &mut EditorController,
    snap: &DiagramSnapshot,
    host: &mut RecordingHost,
    x: f32,
    y: f32,
) {
    ctl.pointer_down(snap, down(x, y), host);
    ctl.pointer_up(snap, down(x, y), host);
}

#[test]
fn drag_moves_by_screen_delta_over_zoom() {
    init_logging();
    for zoom in [0.5_f32, 1.0, 2.0] {
        let snap = two_node_snapshot();
        let mut ctl = EditorController::new();
        let mut host = RecordingHost::default();
        ctl.set_view(ViewState {
            zoom,
            pan: Vector::new(0.0, 0.0),
        });

        // Press on a's center, then move 40 right and 20 down in screen px.
        let cx = 50.0 * zoom;
        let cy = 25.0 * zoom;
        ctl.pointer_down(&snap, down(cx, cy), &mut host);
        ctl.pointer_move(&snap, down(cx + 40.0, cy + 20.0), &mut host);
        ctl.pointer_up(&snap, down(cx + 40.0, cy + 20.0), &mut host);

        let (moved, x, y) = *host.moves.last().expect("drag should stream a move");
        assert_eq!(moved, id("a"));
        assert!(
            (x - 40.0 / zoom).abs() < 1e-3 && (y - 20.0 / zoom).abs() < 1e-3,
            "zoom {zoom}: moved to ({x}, {y})"
        );
    }
}

#[test]
fn dead_zone_suppresses_phantom_drags() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    ctl.pointer_down(&snap, down(50.0, 25.0), &mut host);
    ctl.pointer_move(&snap, down(52.0, 27.0), &mut host);
    ctl.pointer_up(&snap, down(52.0, 27.0), &mut host);
    assert!(host.moves.is_empty(), "a 2px wiggle is a click, not a drag");

    // Past the dead-zone the full delta streams, not a re-based one.
    ctl.pointer_down(&snap, down(50.0, 25.0), &mut host);
    ctl.pointer_move(&snap, down(58.0, 25.0), &mut host);
    let (_, x, y) = *host.moves.last().unwrap();
    assert!((x - 8.0).abs() < 1e-3 && y.abs() < 1e-3);
}

#[test]
fn drag_streams_between_gesture_hooks() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    ctl.pointer_down(&snap, down(50.0, 25.0), &mut host);
    ctl.pointer_move(&snap, down(90.0, 45.0), &mut host);
    ctl.pointer_move(&snap, down(100.0, 55.0), &mut host);
    ctl.pointer_up(&snap, down(100.0, 55.0), &mut host);

    assert_eq!(host.gestures.first(), Some(&(GestureKind::Drag, true)));
    assert_eq!(host.gestures.last(), Some(&(GestureKind::Drag, false)));
    // Two streamed proposals, no discrete commit call beyond the hook.
    assert_eq!(host.moves.len(), 2);
}

#[test]
fn multi_selection_drags_every_selected_node() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    // Shift-click both nodes, then drag from a.
    ctl.pointer_down(&snap, shift_down(50.0, 25.0), &mut host);
    ctl.pointer_up(&snap, shift_down(50.0, 25.0), &mut host);
    ctl.pointer_down(&snap, shift_down(250.0, 125.0), &mut host);
    ctl.pointer_up(&snap, shift_down(250.0, 125.0), &mut host);

    ctl.pointer_down(&snap, down(50.0, 25.0), &mut host);
    ctl.pointer_move(&snap, down(60.0, 35.0), &mut host);
    ctl.pointer_up(&snap, down(60.0, 35.0), &mut host);

    let a_move = host.moves.iter().find(|(m, _, _)| *m == id("a")).unwrap();
    let b_move = host.moves.iter().find(|(m, _, _)| *m == id("b")).unwrap();
    assert!((a_move.1 - 10.0).abs() < 1e-3 && (a_move.2 - 10.0).abs() < 1e-3);
    assert!((b_move.1 - 210.0).abs() < 1e-3 && (b_move.2 - 110.0).abs() < 1e-3);
}

#[test]
fn resize_streams_and_floors_at_minimum() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    // a's resize handle sits on its bottom-right corner (100, 50).
    ctl.pointer_down(&snap, down(100.0, 50.0), &mut host);
    ctl.pointer_move(&snap, down(160.0, 90.0), &mut host);
    assert_eq!(host.resizes.last(), Some(&(id("a"), 160.0, 90.0)));

    // Dragging far past the floor clamps both axes to 50.
    ctl.pointer_move(&snap, down(-400.0, -450.0), &mut host);
    assert_eq!(host.resizes.last(), Some(&(id("a"), 50.0, 50.0)));
    ctl.pointer_up(&snap, down(-400.0, -450.0), &mut host);
}

#[test]
fn resize_scales_screen_delta_by_zoom() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();
    ctl.set_view(ViewState {
        zoom: 2.0,
        pan: Vector::new(0.0, 0.0),
    });

    // Corner (100, 50) maps to (200, 100) on screen.
    ctl.pointer_down(&snap, down(200.0, 100.0), &mut host);
    ctl.pointer_move(&snap, down(260.0, 140.0), &mut host);
    assert_eq!(host.resizes.last(), Some(&(id("a"), 130.0, 70.0)));
}

#[test]
fn non_resizable_node_offers_no_handle() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    // b's bottom-right corner is (300, 150); b is not resizable, so this
    // press lands on the node body (a drag), not a handle.
    ctl.pointer_down(&snap, down(299.0, 149.0), &mut host);
    ctl.pointer_move(&snap, down(320.0, 170.0), &mut host);
    ctl.pointer_up(&snap, down(320.0, 170.0), &mut host);

    assert!(host.resizes.is_empty());
    assert!(!host.moves.is_empty());
}

#[test]
fn box_selection_is_drag_direction_symmetric() {
    let forward = {
        let snap = two_node_snapshot();
        let mut ctl = EditorController::new();
        let mut host = RecordingHost::default();
        ctl.pointer_down(&snap, down(150.0, 60.0), &mut host);
        ctl.pointer_move(&snap, down(400.0, 400.0), &mut host);
        ctl.pointer_up(&snap, down(400.0, 400.0), &mut host);
        ctl.selected_ids().to_vec()
    };
    let backward = {
        let snap = two_node_snapshot();
        let mut ctl = EditorController::new();
        let mut host = RecordingHost::default();
        ctl.pointer_down(&snap, down(400.0, 400.0), &mut host);
        ctl.pointer_move(&snap, down(150.0, 60.0), &mut host);
        ctl.pointer_up(&snap, down(150.0, 60.0), &mut host);
        ctl.selected_ids().to_vec()
    };

    assert_eq!(forward, vec![id("b")]);
    assert_eq!(backward, forward);
}

#[test]
fn box_selection_union_with_modifier_replace_without() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    // Select a by clicking it.
    click(&mut ctl, &snap, &mut host, 50.0, 25.0);
    assert_eq!(ctl.selected_ids(), &[id("a")]);

    // Shift-box over b only: union keeps a.
    ctl.pointer_down(&snap, shift_down(180.0, 90.0), &mut host);
    ctl.pointer_move(&snap, shift_down(320.0, 170.0), &mut host);
    ctl.pointer_up(&snap, shift_down(320.0, 170.0), &mut host);
    assert_eq!(ctl.selected_ids(), &[id("a"), id("b")]);

    // Plain box over b replaces.
    ctl.pointer_down(&snap, down(180.0, 90.0), &mut host);
    ctl.pointer_move(&snap, down(320.0, 170.0), &mut host);
    ctl.pointer_up(&snap, down(320.0, 170.0), &mut host);
    assert_eq!(ctl.selected_ids(), &[id("b")]);
}

#[test]
fn empty_canvas_click_clears_selection() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    click(&mut ctl, &snap, &mut host, 50.0, 25.0);
    assert_eq!(ctl.selected_ids(), &[id("a")]);

    click(&mut ctl, &snap, &mut host, 600.0, 600.0);
    assert!(ctl.selected_ids().is_empty());
    assert_eq!(host.selections.last(), Some(&vec![]));
}

#[test]
fn pan_tool_drags_the_view() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();
    ctl.set_tool(Tool::Pan);

    ctl.pointer_down(&snap, down(500.0, 500.0), &mut host);
    ctl.pointer_move(&snap, down(520.0, 530.0), &mut host);
    ctl.pointer_move(&snap, down(525.0, 535.0), &mut host);
    assert_eq!(ctl.view().pan, Vector::new(25.0, 35.0));

    // Pointer-leave ends the gesture exactly like pointer-up.
    ctl.pointer_leave(&snap, &mut host);
    ctl.pointer_move(&snap, down(900.0, 900.0), &mut host);
    assert_eq!(ctl.view().pan, Vector::new(25.0, 35.0));
    assert!(host.gestures.contains(&(GestureKind::Pan, false)));
}

#[test]
fn middle_button_pans_with_any_tool() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    // Over a node, select tool active: middle button still pans.
    let press = PointerInput::mouse(50.0, 25.0, PointerButton::Middle, Modifiers::NONE);
    ctl.pointer_down(&snap, press, &mut host);
    ctl.pointer_move(
        &snap,
        PointerInput::mouse(80.0, 45.0, PointerButton::Middle, Modifiers::NONE),
        &mut host,
    );
    ctl.pointer_up(
        &snap,
        PointerInput::mouse(80.0, 45.0, PointerButton::Middle, Modifiers::NONE),
        &mut host,
    );

    assert_eq!(ctl.view().pan, Vector::new(30.0, 20.0));
    assert!(host.moves.is_empty(), "middle button never drags nodes");
}

#[test]
fn pointer_leave_commits_last_streamed_drag() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    ctl.pointer_down(&snap, down(50.0, 25.0), &mut host);
    ctl.pointer_move(&snap, down(90.0, 25.0), &mut host);
    ctl.pointer_leave(&snap, &mut host);

    assert_eq!(host.moves.last(), Some(&(id("a"), 40.0, 0.0)));
    assert_eq!(host.gestures.last(), Some(&(GestureKind::Drag, false)));

    // The gesture is over; further movement streams nothing.
    ctl.pointer_move(&snap, down(200.0, 200.0), &mut host);
    assert_eq!(host.moves.len(), 1);
}

#[test]
fn delete_invokes_host_and_clears_selection() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    // Delete with nothing selected is a no-op.
    ctl.key_down(KeyInput::plain(Key::Delete), &mut host);
    assert_eq!(host.deletes, 0);

    click(&mut ctl, &snap, &mut host, 50.0, 25.0);
    ctl.key_down(KeyInput::plain(Key::Backspace), &mut host);
    assert_eq!(host.deletes, 1);
    assert!(ctl.selected_ids().is_empty());
    assert_eq!(host.selections.last(), Some(&vec![]));
}

#[test]
fn escape_clears_selection() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    click(&mut ctl, &snap, &mut host, 50.0, 25.0);
    ctl.key_down(KeyInput::plain(Key::Escape), &mut host);
    assert!(ctl.selected_ids().is_empty());
}

#[test]
fn selection_prunes_after_external_delete() {
    let snap = two_node_snapshot();
    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    click(&mut ctl, &snap, &mut host, 50.0, 25.0);

    // The host deleted node a out from under the engine (e.g. via its own
    // undo); the next render's snapshot no longer contains it.
    let b = Node::new(id("b"), 200.0, 100.0, Shape::Rect).with_size(100.0, 50.0);
    let next = DiagramSnapshot::new(&[b], &[]);
    ctl.prune_selection(&next, &mut host);
    assert!(ctl.selected_ids().is_empty());
}

#[test]
fn clicking_a_connection_selects_it() {
    let a = Node::new(id("a"), 0.0, 0.0, Shape::Rect).with_size(100.0, 50.0);
    let b = Node::new(id("b"), 300.0, 0.0, Shape::Rect).with_size(100.0, 50.0);
    let conn = Connection::between(id("ab"), id("a"), id("b"));
    let snap = DiagramSnapshot::new(&[a, b], &[conn]);

    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    // The straight path runs along y = 25 between the nodes.
    click(&mut ctl, &snap, &mut host, 200.0, 26.0);
    assert_eq!(ctl.selected_ids(), &[id("ab")]);
}

#[test]
fn control_point_drag_streams_logical_positions() {
    let a = Node::new(id("a"), 0.0, 0.0, Shape::Rect).with_size(100.0, 50.0);
    let b = Node::new(id("b"), 300.0, 0.0, Shape::Rect).with_size(100.0, 50.0);
    let mut conn = Connection::between(id("ab"), id("a"), id("b"));
    conn.control_points.push(Point::new(200.0, 120.0));
    let snap = DiagramSnapshot::new(&[a, b], &[conn]);

    let mut ctl = EditorController::new();
    let mut host = RecordingHost::default();

    ctl.pointer_down(&snap, down(200.0, 120.0), &mut host);
    ctl.pointer_move(&snap, down(230.0, 150.0), &mut host);
    ctl.pointer_up(&snap, down(230.0, 150.0), &mut host);

    assert_eq!(host.control_moves.last(), Some(&(id("ab"), 0, 230.0, 150.0)));
    assert!(host.gestures.contains(&(GestureKind::ControlPoint, true)));
    assert!(host.gestures.contains(&(GestureKind::ControlPoint, false)));
}
