use lanewatch_config::Settings;
use lanewatch_types::{Colour, KeyDisplayMode, LaneIndex};

/// Text colour used for lane tokens when colour mode is off, and for separators.
pub const NEUTRAL: Colour = Colour::BLACK;

/// Everything needed to label lanes in a mistake line.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub mode: KeyDisplayMode,
    pub colour_enabled: bool,
    pub lane_colours: Vec<Colour>,
    /// Names of the bound inputs; empty for an unbound lane.
    pub lane_names: Vec<String>,
    pub lane_aliases: Vec<String>,
}

impl DisplayConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            mode: settings.key_display_mode,
            colour_enabled: settings.colour_enabled,
            lane_colours: settings.colours.clone(),
            lane_names: settings
                .lane_bindings
                .iter()
                .map(|b| b.as_ref().map(|b| b.name.clone()).unwrap_or_default())
                .collect(),
            lane_aliases: settings.aliases.clone(),
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lane_colours.len()
    }

    /// Label for `lane` under the current display mode.
    ///
    /// Falls back to the lane number when the bound name or alias is empty.
    pub fn token(&self, lane: LaneIndex) -> String {
        let label = match self.mode {
            KeyDisplayMode::KeyNumbers => None,
            KeyDisplayMode::KeyBinds => self.lane_names.get(lane),
            KeyDisplayMode::Aliases => self.lane_aliases.get(lane),
        };
        match label {
            Some(label) if !label.is_empty() => label.clone(),
            _ => (lane + 1).to_string(),
        }
    }

    pub fn token_colour(&self, lane: LaneIndex) -> Colour {
        if self.colour_enabled {
            self.lane_colours[lane]
        } else {
            NEUTRAL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: KeyDisplayMode) -> DisplayConfig {
        let mut c = DisplayConfig::from_settings(&Settings::default());
        c.mode = mode;
        c
    }

    #[test]
    fn tokens_follow_mode() {
        assert_eq!(config(KeyDisplayMode::KeyNumbers).token(0), "1");
        assert_eq!(config(KeyDisplayMode::KeyBinds).token(3), "space");
        assert_eq!(config(KeyDisplayMode::Aliases).token(1), "middle");
    }

    #[test]
    fn unbound_lane_falls_back_to_number() {
        let mut c = config(KeyDisplayMode::KeyBinds);
        c.lane_names[2].clear();
        assert_eq!(c.token(2), "3");
    }

    #[test]
    fn colour_mode_off_is_neutral() {
        let mut c = config(KeyDisplayMode::KeyNumbers);
        assert_eq!(c.token_colour(0), Colour::rgb(0xDC, 0x00, 0x14));
        c.colour_enabled = false;
        assert_eq!(c.token_colour(0), NEUTRAL);
    }
}
