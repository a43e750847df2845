//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map is
//! pure: the controller decides what each action does and when it is legal.

use crate::input::{Key, Modifiers};

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Switch to the select tool (`v`).
    ToolSelect,
    /// Switch to the connect tool (`c`).
    ToolConnect,
    /// Space pressed: temporarily pan until the key is released.
    PanHold,
    Undo,
    Redo,
    /// Delete the current selection.
    Delete,
    /// Escape: clear the selection.
    Deselect,
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘, on other
/// platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key + modifiers to an action. Returns `None` if the combo
    /// has no binding.
    pub fn resolve(key: Key, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        if cmd && modifiers.shift {
            return match key {
                Key::Char('z') | Key::Char('Z') => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                Key::Char('z') | Key::Char('Z') => Some(ShortcutAction::Undo),
                Key::Char('y') | Key::Char('Y') => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        match key {
            Key::Char('v') | Key::Char('V') => Some(ShortcutAction::ToolSelect),
            Key::Char('c') | Key::Char('C') => Some(ShortcutAction::ToolConnect),
            Key::Space => Some(ShortcutAction::PanHold),
            Key::Delete | Key::Backspace => Some(ShortcutAction::Delete),
            Key::Escape => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}
