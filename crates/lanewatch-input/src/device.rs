use lanewatch_types::{InputCode, LaneEvent, PressKind};

use crate::binding_table::ControlAction;

/// Event as delivered by the hook layer, before any binding lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    pub code: InputCode,
    pub kind: PressKind,
    pub time_us: i64,
}

impl RawInputEvent {
    pub fn new(code: InputCode, kind: PressKind, time_us: i64) -> Self {
        Self {
            code,
            kind,
            time_us,
        }
    }
}

/// A raw event resolved against the binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedEvent {
    Lane(LaneEvent),
    Control {
        action: ControlAction,
        kind: PressKind,
        time_us: i64,
    },
}
