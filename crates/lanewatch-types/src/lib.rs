// Shared vocabulary for lanes, input codes, colours and display options

mod colour;
mod display_mode;
mod event;
mod input_code;

pub use colour::{Colour, ColourError};
pub use display_mode::KeyDisplayMode;
pub use event::{LaneEvent, LaneIndex, PressKind};
pub use input_code::{InputCode, MouseButton};

/// Smallest lane count for which "two lanes back" names a different lane.
pub const MIN_LANE_COUNT: usize = 3;
