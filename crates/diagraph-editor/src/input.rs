//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into unified pointer/keyboard inputs
//! consumed by the controller. Touch reuses the exact same state machine:
//! the first contact becomes the primary pointer and further contacts are
//! ignored (no multi-touch gestures).

use diagraph_core::Point;

/// Keyboard modifier state attached to every input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// The multi-select modifier used by box selection and click-toggle.
    pub fn multi_select(&self) -> bool {
        self.shift
    }

    /// Platform-aware command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// A normalized pointer event position in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub pos: Point,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerInput {
    pub fn mouse(x: f32, y: f32, button: PointerButton, modifiers: Modifiers) -> Self {
        Self {
            pos: Point::new(x, y),
            button,
            modifiers,
        }
    }

    /// A primary-button input with no modifiers, as produced by touch.
    pub fn touch(x: f32, y: f32) -> Self {
        Self::mouse(x, y, PointerButton::Primary, Modifiers::NONE)
    }
}

/// A key, already decoded from whatever windowing layer the host uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Delete,
    Backspace,
    Space,
}

/// A normalized keyboard event.
///
/// `in_text_field` must be set when input focus is inside a text control;
/// the controller ignores such events entirely so shortcuts never fire
/// while the user is typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
    pub in_text_field: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            in_text_field: false,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            in_text_field: false,
        }
    }
}

/// Collapses multi-contact touch input onto the single-pointer model.
/// Only the first contact is tracked; the rest are dropped.
#[derive(Debug, Default)]
pub struct TouchAdapter {
    active: Option<u64>,
}

impl TouchAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A contact went down. Returns a pointer-down input only for the
    /// first contact.
    pub fn begin(&mut self, contact: u64, x: f32, y: f32) -> Option<PointerInput> {
        if self.active.is_some() {
            return None;
        }
        self.active = Some(contact);
        Some(PointerInput::touch(x, y))
    }

    /// A contact moved. Ignored unless it is the tracked one.
    pub fn movement(&mut self, contact: u64, x: f32, y: f32) -> Option<PointerInput> {
        (self.active == Some(contact)).then(|| PointerInput::touch(x, y))
    }

    /// A contact lifted. Returns a pointer-up input for the tracked
    /// contact and frees the adapter for the next gesture.
    pub fn end(&mut self, contact: u64, x: f32, y: f32) -> Option<PointerInput> {
        if self.active != Some(contact) {
            return None;
        }
        self.active = None;
        Some(PointerInput::touch(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn touch_adapter_tracks_first_contact_only() {
        let mut touch = TouchAdapter::new();

        let down = touch.begin(1, 10.0, 20.0).unwrap();
        assert_eq!(down.pos, Point::new(10.0, 20.0));
        assert_eq!(down.button, PointerButton::Primary);

        // A second finger is ignored entirely.
        assert!(touch.begin(2, 50.0, 50.0).is_none());
        assert!(touch.movement(2, 60.0, 60.0).is_none());
        assert!(touch.end(2, 60.0, 60.0).is_none());

        // The first finger keeps driving the pointer.
        assert!(touch.movement(1, 15.0, 25.0).is_some());
        assert!(touch.end(1, 15.0, 25.0).is_some());

        // After release a new contact can take over.
        assert!(touch.begin(3, 0.0, 0.0).is_some());
    }

    #[test]
    fn command_is_platform_aware() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(ctrl.command());
        assert!(meta.command());
        assert!(!Modifiers::NONE.command());
    }
}
