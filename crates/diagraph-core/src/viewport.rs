//! Pan/zoom view state and coordinate transforms.
//!
//! Screen space is the pixel surface the pointer lives on; logical space is
//! the diagram's own coordinate system, invariant under pan/zoom. The pan
//! translation is applied before scaling: `screen = logical * zoom + pan`.

use crate::model::{Bounds, Point, Size, Vector};
use serde::{Deserialize, Serialize};

// Interactive zoom clamp (wheel ticks, toolbar buttons).
pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 3.0;

// Fit-to-content uses its own, wider-at-the-bottom clamp. The two ranges
// are intentionally distinct; do not unify them.
pub const FIT_MIN_ZOOM: f32 = 0.1;
pub const FIT_MAX_ZOOM: f32 = 1.5;

/// Multiplicative zoom factor for one wheel tick up (toward the screen).
pub const WHEEL_ZOOM_IN: f32 = 1.1;
/// Multiplicative zoom factor for one wheel tick down.
pub const WHEEL_ZOOM_OUT: f32 = 0.9;
/// Additive zoom step for the toolbar +/- buttons.
pub const ZOOM_STEP: f32 = 0.1;
/// Screen-space padding fit-to-content leaves on every side of the container.
pub const FIT_PADDING: f32 = 50.0;

/// The transient view transform. Engine-local UI state; serializable so a
/// host can persist it if it chooses to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Always strictly positive.
    pub zoom: f32,
    /// Screen-space translation applied before scaling.
    pub pan: Vector,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vector::new(0.0, 0.0),
        }
    }
}

impl ViewState {
    /// Multiply zoom by `factor`, clamped to the interactive range.
    /// Zoom is anchored at the coordinate origin, not the pointer.
    pub fn zoom_by(&mut self, factor: f32) {
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Toolbar-style additive step (`+ZOOM_STEP` / `-ZOOM_STEP`), clamped
    /// to the interactive range.
    pub fn zoom_step(&mut self, direction: f32) {
        self.zoom = (self.zoom + ZOOM_STEP * direction.signum()).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan.x += dx;
        self.pan.y += dy;
    }
}

/// `(screen − pan) / zoom`.
pub fn screen_to_logical(screen: Point, view: &ViewState) -> Point {
    Point {
        x: (screen.x - view.pan.x) / view.zoom,
        y: (screen.y - view.pan.y) / view.zoom,
    }
}

/// Exact inverse of [`screen_to_logical`].
pub fn logical_to_screen(logical: Point, view: &ViewState) -> Point {
    Point {
        x: logical.x * view.zoom + view.pan.x,
        y: logical.y * view.zoom + view.pan.y,
    }
}

/// Compute the view that fits `bounds` inside `container` with
/// [`FIT_PADDING`] on every side, centered.
///
/// Degenerate input (zero content or container extent) yields the default
/// view rather than an infinite zoom.
pub fn fit_to_content(bounds: Bounds, container: Size, padding: f32) -> ViewState {
    let avail_w = container.width - 2.0 * padding;
    let avail_h = container.height - 2.0 * padding;
    if bounds.width <= 0.0 || bounds.height <= 0.0 || avail_w <= 0.0 || avail_h <= 0.0 {
        return ViewState::default();
    }

    let zoom = (avail_w / bounds.width)
        .min(avail_h / bounds.height)
        .clamp(FIT_MIN_ZOOM, FIT_MAX_ZOOM);

    // Choose pan so the content center maps onto the container center.
    let content_center = bounds.center();
    let pan = Vector {
        x: container.width / 2.0 - zoom * content_center.x,
        y: container.height / 2.0 - zoom * content_center.y,
    };
    ViewState { zoom, pan }
}
