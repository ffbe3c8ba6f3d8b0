use std::fmt;

use serde::{Deserialize, Serialize};

/// Mouse buttons that can be bound to a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X,
    X2,
}

impl MouseButton {
    pub const ALL: [MouseButton; 5] = [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::X,
        MouseButton::X2,
    ];

    /// Display name shown for a bound mouse button.
    pub fn name(self) -> &'static str {
        match self {
            MouseButton::Left => "Button-1",
            MouseButton::Right => "Button-2",
            MouseButton::Middle => "Button-3",
            MouseButton::X => "Button-X",
            MouseButton::X2 => "Button-X2",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.name() == name)
    }
}

/// Opaque hardware code delivered by the hook layer.
///
/// Keyboard keys are identified by scan code so that layout changes do not
/// break bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "device", content = "code")]
pub enum InputCode {
    Key(u32),
    Mouse(MouseButton),
}

impl fmt::Display for InputCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputCode::Key(scan_code) => write!(f, "key:{scan_code}"),
            InputCode::Mouse(button) => f.write_str(button.name()),
        }
    }
}
