//! Keyboard shortcut registry and resolution.

use crate::input::Modifiers;

/// Editor-level actions reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    NextBubble,
    PrevBubble,
    Save,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    NextPage,
    PrevPage,
    RemoveBubble,
    ToggleDraw,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Platform command modifier (Ctrl, or Cmd on macOS).
    pub command: bool,
    pub shift: bool,
    pub action: EditorAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        command: bool,
        shift: bool,
        action: EditorAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            command,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use EditorAction::*;
        vec![
            Shortcut::new("ArrowDown", false, false, NextBubble, "Next bubble"),
            Shortcut::new("ArrowUp", false, false, PrevBubble, "Previous bubble"),
            Shortcut::new("S", true, false, Save, "Save annotations"),
            Shortcut::new("Z", true, false, Undo, "Undo"),
            Shortcut::new("Z", true, true, Redo, "Redo"),
            Shortcut::new("Y", true, false, Redo, "Redo"),
            Shortcut::new("=", false, false, ZoomIn, "Zoom in"),
            Shortcut::new("-", false, false, ZoomOut, "Zoom out"),
            Shortcut::new("0", false, false, ZoomReset, "Reset zoom"),
            Shortcut::new("ArrowLeft", false, true, PanLeft, "Pan left"),
            Shortcut::new("ArrowRight", false, true, PanRight, "Pan right"),
            Shortcut::new("ArrowUp", false, true, PanUp, "Pan up"),
            Shortcut::new("ArrowDown", false, true, PanDown, "Pan down"),
            Shortcut::new("PageDown", false, false, NextPage, "Next page"),
            Shortcut::new("PageUp", false, false, PrevPage, "Previous page"),
            Shortcut::new("Delete", false, false, RemoveBubble, "Remove selected bubble"),
            Shortcut::new("Backspace", false, false, RemoveBubble, "Remove selected bubble"),
            Shortcut::new("B", false, false, ToggleDraw, "Toggle draw-bubble mode"),
        ]
    }

    /// Resolve a key press to an action. Returns None for unbound keys.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<EditorAction> {
        Self::all()
            .into_iter()
            .find(|s| {
                s.key.eq_ignore_ascii_case(key)
                    && s.command == modifiers.command()
                    && s.shift == modifiers.shift
            })
            .map(|s| s.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mods(command: bool, shift: bool) -> Modifiers {
        Modifiers {
            ctrl: command,
            shift,
            ..Modifiers::default()
        }
    }

    #[test]
    fn test_undo_redo_resolution() {
        assert_eq!(
            ShortcutRegistry::resolve("z", mods(true, false)),
            Some(EditorAction::Undo)
        );
        assert_eq!(
            ShortcutRegistry::resolve("z", mods(true, true)),
            Some(EditorAction::Redo)
        );
        assert_eq!(
            ShortcutRegistry::resolve("y", mods(true, false)),
            Some(EditorAction::Redo)
        );
        assert_eq!(ShortcutRegistry::resolve("z", mods(false, false)), None);
    }

    #[test]
    fn test_meta_counts_as_command() {
        let mac = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert_eq!(ShortcutRegistry::resolve("s", mac), Some(EditorAction::Save));
    }

    #[test]
    fn test_arrows_cycle_without_shift_and_pan_with_shift() {
        assert_eq!(
            ShortcutRegistry::resolve("ArrowDown", mods(false, false)),
            Some(EditorAction::NextBubble)
        );
        assert_eq!(
            ShortcutRegistry::resolve("ArrowDown", mods(false, true)),
            Some(EditorAction::PanDown)
        );
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(ShortcutRegistry::resolve("Q", mods(false, false)), None);
    }

    #[test]
    fn test_format() {
        let s = Shortcut::new("Z", true, true, EditorAction::Redo, "Redo");
        assert_eq!(s.format(), "Ctrl+Shift+Z");
    }
}
