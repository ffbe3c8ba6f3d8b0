use lanewatch_types::Colour;

/// Frame interval of a background flash, in milliseconds (30 fps).
pub const FRAME_MS: u32 = 1000 / 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashStep {
    /// Offset from the start of the flash.
    pub at_ms: u32,
    pub colour: Colour,
}

/// Colour steps fading from a flash colour back to the background.
///
/// Only the schedule with the newest id should be applied; a UI drops steps of
/// an older flash once a newer one starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashSchedule {
    pub id: u64,
    pub steps: Vec<FlashStep>,
}

impl FlashSchedule {
    pub fn new(id: u64, flash: Colour, background: Colour, decay_ms: u32) -> Self {
        let frames = decay_ms / FRAME_MS;
        let steps = if frames == 0 {
            vec![FlashStep {
                at_ms: 0,
                colour: background,
            }]
        } else {
            (0..=frames)
                .map(|s| FlashStep {
                    at_ms: s * FRAME_MS,
                    colour: flash.interpolate(background, s as f64 / frames as f64),
                })
                .collect()
        };
        Self { id, steps }
    }
}

/// Hands out flash schedules and remembers which one is current.
#[derive(Debug, Clone)]
pub struct Flasher {
    background: Colour,
    decay_ms: u32,
    current: u64,
}

impl Flasher {
    pub fn new(background: Colour, decay_ms: u32) -> Self {
        Self {
            background,
            decay_ms,
            current: 0,
        }
    }

    pub fn background(&self) -> Colour {
        self.background
    }

    /// Start a flash; supersedes any earlier one.
    pub fn flash(&mut self, colour: Colour) -> FlashSchedule {
        self.current += 1;
        log::debug!("flash {} in {colour}", self.current);
        FlashSchedule::new(self.current, colour, self.background, self.decay_ms)
    }

    pub fn is_current(&self, id: u64) -> bool {
        id == self.current
    }
}
