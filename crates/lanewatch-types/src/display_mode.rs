use serde::{Deserialize, Serialize};

/// How a lane is labelled in a mistake line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum KeyDisplayMode {
    /// One-based lane number.
    #[default]
    #[serde(rename = "key numbers")]
    KeyNumbers,
    /// Name of the bound key or mouse button.
    #[serde(rename = "key binds")]
    KeyBinds,
    /// User-chosen alias.
    #[serde(rename = "aliases")]
    Aliases,
}
