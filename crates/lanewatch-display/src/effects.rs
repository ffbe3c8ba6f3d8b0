use std::path::PathBuf;

use chrono::{NaiveDateTime, TimeDelta};
use lanewatch_config::Settings;
use lanewatch_types::Colour;
use regex::Regex;
use thiserror::Error;

/// Directory sound files are resolved against.
const SOUND_DIR: &str = "sounds";

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("{kind} rule {index} has an invalid pattern {pattern:?}")]
    InvalidPattern {
        kind: &'static str,
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A sound to play at a given wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundCue {
    pub path: PathBuf,
    pub at: NaiveDateTime,
}

#[derive(Debug, Clone)]
struct PeripheryRule {
    pattern: Regex,
    colour: Colour,
}

#[derive(Debug, Clone)]
struct SoundRule {
    pattern: Regex,
    filename: String,
    delay: TimeDelta,
}

/// Compiled periphery and sound rules, matched against mistake descriptions.
#[derive(Debug, Clone, Default)]
pub struct FeedbackRules {
    periphery_enabled: bool,
    periphery: Vec<PeripheryRule>,
    sound_enabled: bool,
    sound: Vec<SoundRule>,
}

fn compile(kind: &'static str, index: usize, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
        kind,
        index,
        pattern: pattern.to_string(),
        source,
    })
}

impl FeedbackRules {
    pub fn from_settings(settings: &Settings) -> Result<Self, RuleError> {
        let periphery = settings
            .periphery_rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                Ok(PeripheryRule {
                    pattern: compile("periphery", i, &rule.regex)?,
                    colour: rule.colour,
                })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;
        let sound = settings
            .sound_rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                Ok(SoundRule {
                    pattern: compile("sound", i, &rule.regex)?,
                    filename: rule.filename.clone(),
                    delay: TimeDelta::milliseconds(rule.delay_ms.into()),
                })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;
        log::info!(
            "loaded {} periphery and {} sound rules",
            periphery.len(),
            sound.len()
        );
        Ok(Self {
            periphery_enabled: settings.periphery_mode_enabled,
            periphery,
            sound_enabled: settings.sound_enabled,
            sound,
        })
    }

    /// Flash colours of every periphery rule matching `description`, in rule order.
    pub fn flash_colours(&self, description: &str) -> Vec<Colour> {
        if !self.periphery_enabled {
            return Vec::new();
        }
        self.periphery
            .iter()
            .filter(|r| r.pattern.is_match(description))
            .map(|r| r.colour)
            .collect()
    }

    /// One cue per matching sound rule, scheduled relative to `now`.
    pub fn sound_cues(&self, description: &str, now: NaiveDateTime) -> Vec<SoundCue> {
        if !self.sound_enabled {
            return Vec::new();
        }
        self.sound
            .iter()
            .filter(|r| r.pattern.is_match(description))
            .map(|r| SoundCue {
                path: PathBuf::from(SOUND_DIR).join(&r.filename),
                at: now + r.delay,
            })
            .collect()
    }
}
