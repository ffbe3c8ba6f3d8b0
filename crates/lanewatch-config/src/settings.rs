use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use lanewatch_types::{Colour, KeyDisplayMode, MIN_LANE_COUNT};
use serde::{Deserialize, Serialize};

use crate::binding::Binding;
use crate::rules::{PeripheryRuleConfig, SoundRuleConfig};

pub const MAX_LANE_COUNT: usize = 10;
/// Aliases longer than this are truncated.
pub const ALIAS_LIMIT: usize = 10;

pub const FONT_SIZE_MIN: u32 = 1;
pub const FONT_SIZE_MAX: u32 = 200;
pub const RELEASE_SECONDS_MAX: f32 = 60.0;
pub const LINE_SPACING_MIN: f32 = 1.0;
pub const LINE_SPACING_MAX: f32 = 5.0;
pub const PERIPHERY_DECAY_MAX: u32 = 10_000;
pub const SOUND_DELAY_MAX: u32 = 60_000;

const DEFAULT_COLOURS: [Colour; 4] = [
    Colour::rgb(0xDC, 0x00, 0x14),
    Colour::rgb(0xFF, 0x8C, 0x0A),
    Colour::rgb(0x00, 0xC1, 0xC1),
    Colour::rgb(0x28, 0x32, 0xE6),
];
const DEFAULT_ALIASES: [&str; 4] = ["ring", "middle", "index", "thumb"];

/// User settings (settings.json).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct Settings {
    // lanes
    pub lane_count: usize,
    pub lane_bindings: Vec<Option<Binding>>,
    pub clear_binding: Option<Binding>,
    pub toggle_analysis_binding: Option<Binding>,
    pub colours: Vec<Colour>,
    pub aliases: Vec<String>,

    // display
    pub key_display_mode: KeyDisplayMode,
    pub colour_enabled: bool,
    pub font_size: u32,
    pub relative_pad_left: f32,
    pub line_spacing: f32,
    pub min_width: u32,
    pub min_height: u32,

    // behaviour
    pub full_release_enabled: bool,
    pub release_seconds: f32,

    // timing analysis
    pub analysis_enabled: bool,
    pub divider_stroke: f32,
    pub scale_mark_prominence: f32,

    // feedback
    pub periphery_mode_enabled: bool,
    pub periphery_background_colour: Colour,
    pub periphery_decay_ms: u32,
    pub periphery_rules: Vec<PeripheryRuleConfig>,
    pub sound_enabled: bool,
    pub sound_rules: Vec<SoundRuleConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lane_count: 4,
            lane_bindings: vec![
                Some(Binding::key(30, "a")),
                Some(Binding::key(31, "s")),
                Some(Binding::key(32, "d")),
                Some(Binding::key(57, "space")),
            ],
            clear_binding: Some(Binding::key(41, "`")),
            toggle_analysis_binding: None,
            colours: DEFAULT_COLOURS.to_vec(),
            aliases: DEFAULT_ALIASES.iter().map(|s| s.to_string()).collect(),
            key_display_mode: KeyDisplayMode::KeyNumbers,
            colour_enabled: true,
            font_size: 18,
            relative_pad_left: 0.5,
            line_spacing: 1.5,
            min_width: 400,
            min_height: 600,
            full_release_enabled: true,
            release_seconds: 2.0,
            analysis_enabled: false,
            divider_stroke: 2.0,
            scale_mark_prominence: 0.25,
            periphery_mode_enabled: false,
            periphery_background_colour: Colour::WHITE,
            periphery_decay_ms: 500,
            periphery_rules: Vec::new(),
            sound_enabled: false,
            sound_rules: Vec::new(),
        }
    }
}

impl Settings {
    /// Clamp numeric fields and make every per-lane vector exactly `lane_count` long.
    pub fn validate(&mut self) {
        self.lane_count = self.lane_count.clamp(MIN_LANE_COUNT, MAX_LANE_COUNT);
        let n = self.lane_count;

        self.lane_bindings.resize(n, None);
        self.dedup_bindings();

        if self.colours.len() > n {
            self.colours.truncate(n);
        }
        while self.colours.len() < n {
            let i = self.colours.len();
            self.colours.push(DEFAULT_COLOURS[i % DEFAULT_COLOURS.len()]);
        }

        self.aliases.truncate(n);
        while self.aliases.len() < n {
            self.aliases.push(format!("lane {}", self.aliases.len() + 1));
        }
        for alias in &mut self.aliases {
            if alias.chars().count() > ALIAS_LIMIT {
                *alias = alias.chars().take(ALIAS_LIMIT).collect();
            }
        }

        self.font_size = self.font_size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
        self.relative_pad_left = self.relative_pad_left.clamp(0.0, 5.0);
        self.line_spacing = self.line_spacing.clamp(LINE_SPACING_MIN, LINE_SPACING_MAX);
        self.release_seconds = self.release_seconds.clamp(0.0, RELEASE_SECONDS_MAX);
        self.divider_stroke = self.divider_stroke.clamp(0.0, 20.0);
        self.scale_mark_prominence = self.scale_mark_prominence.clamp(0.0, 0.5);
        self.periphery_decay_ms = self.periphery_decay_ms.min(PERIPHERY_DECAY_MAX);
        for rule in &mut self.sound_rules {
            rule.delay_ms = rule.delay_ms.min(SOUND_DELAY_MAX);
        }
    }

    /// A code may be bound to one slot only; later duplicates are dropped.
    fn dedup_bindings(&mut self) {
        let mut seen = HashSet::new();
        let slots = self
            .lane_bindings
            .iter_mut()
            .chain([&mut self.clear_binding, &mut self.toggle_analysis_binding]);
        for slot in slots {
            if let Some(binding) = slot
                && !seen.insert(binding.code)
            {
                log::warn!("dropping duplicate binding {} ({})", binding.name, binding.code);
                *slot = None;
            }
        }
    }

    /// Idle time after a full release that starts a fresh sequence, or `None`
    /// when the grace window is disabled.
    pub fn release_grace_us(&self) -> Option<i64> {
        self.full_release_enabled
            .then(|| (self.release_seconds as f64 * 1_000_000.0).round() as i64)
    }

    /// Read settings from a JSON file and validate them.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let mut settings: Settings = serde_json::from_str(&data)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        settings.validate();
        Ok(settings)
    }

    /// Read settings, falling back to defaults when the file is missing or invalid.
    pub fn read_or_default(path: &Path) -> Self {
        match Self::read(path) {
            Ok(settings) => {
                log::info!("loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::info!("using default settings: {e:#}");
                Self::default()
            }
        }
    }

    /// Write settings to a JSON file.
    pub fn write(&self, path: &Path) -> Result<()> {
        log::info!("saving settings to {}", path.display());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        Ok(())
    }
}
