//! Input event types for the canvas and keyboard dispatch.
//!
//! The editor has no per-frame input poll; gestures are tracked by the
//! interaction controller, so the events themselves are the whole surface.
//! Key presses carry the modifier state at the time of the event, keeping
//! shortcut resolution from ever going stale.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// The platform command modifier: Ctrl, or Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
    Scroll { position: Point, delta: Vec2 },
    /// Pointer capture lost or the gesture was aborted by the platform.
    Cancel,
}

/// Keyboard event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed { key: String, modifiers: Modifiers },
    Released { key: String },
}

impl KeyEvent {
    /// A key press with no modifiers held.
    pub fn pressed(key: impl Into<String>) -> Self {
        Self::Pressed {
            key: key.into(),
            modifiers: Modifiers::default(),
        }
    }

    /// A key press with the given modifier state.
    pub fn pressed_with(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::Pressed {
            key: key.into(),
            modifiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_modifier() {
        let mut mods = Modifiers::default();
        assert!(!mods.command());
        mods.ctrl = true;
        assert!(mods.command());
        mods = Modifiers {
            meta: true,
            ..Modifiers::default()
        };
        assert!(mods.command());
    }

    #[test]
    fn test_key_press_carries_modifiers() {
        let event = KeyEvent::pressed_with(
            "z",
            Modifiers {
                ctrl: true,
                shift: true,
                ..Modifiers::default()
            },
        );
        let KeyEvent::Pressed { key, modifiers } = event else {
            panic!("expected a press");
        };
        assert_eq!(key, "z");
        assert!(modifiers.command());
        assert!(modifiers.shift);
    }

    #[test]
    fn test_pointer_event_roundtrip() {
        let event = PointerEvent::Down {
            position: Point::new(10.0, 20.0),
            button: MouseButton::Left,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PointerEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            PointerEvent::Down {
                button: MouseButton::Left,
                ..
            }
        ));
    }
}
