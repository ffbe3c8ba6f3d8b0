/// Index of a lane in `0..lane_count`.
pub type LaneIndex = usize;

/// Whether an input went down or came back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressKind {
    Press,
    Release,
}

impl PressKind {
    pub fn is_press(self) -> bool {
        self == PressKind::Press
    }
}

/// A press or release already resolved to a lane.
///
/// `time_us` is a monotonic timestamp in microseconds; only differences between
/// timestamps of the same session are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneEvent {
    pub lane: LaneIndex,
    pub kind: PressKind,
    pub time_us: i64,
}

impl LaneEvent {
    pub fn press(lane: LaneIndex, time_us: i64) -> Self {
        Self {
            lane,
            kind: PressKind::Press,
            time_us,
        }
    }

    pub fn release(lane: LaneIndex, time_us: i64) -> Self {
        Self {
            lane,
            kind: PressKind::Release,
            time_us,
        }
    }
}
