use lanewatch_types::Colour;
use serde::{Deserialize, Serialize};

/// Flash the background in `colour` when a mistake description matches `regex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeripheryRuleConfig {
    pub regex: String,
    pub colour: Colour,
}

/// Play `sounds/<filename>` `delay_ms` after a mistake description matches `regex`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundRuleConfig {
    pub regex: String,
    pub filename: String,
    #[serde(default)]
    pub delay_ms: u32,
}
