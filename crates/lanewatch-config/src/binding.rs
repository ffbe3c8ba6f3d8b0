use lanewatch_types::InputCode;
use serde::{Deserialize, Serialize};

/// A hardware code bound to a slot, with the name shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub code: InputCode,
    pub name: String,
}

impl Binding {
    pub fn new(code: InputCode, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }

    /// Keyboard binding by scan code.
    pub fn key(scan_code: u32, name: impl Into<String>) -> Self {
        Self::new(InputCode::Key(scan_code), name)
    }

    /// Mouse button binding, named after the button.
    pub fn mouse(button: lanewatch_types::MouseButton) -> Self {
        Self::new(InputCode::Mouse(button), button.name())
    }
}
