use lanewatch_types::LaneIndex;

/// Kind of timing mistake, with the lanes involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MistakeKind {
    /// `lanes.1` was pressed while `lanes.0`, two lanes behind it, was still held.
    Keylock { lanes: (LaneIndex, LaneIndex) },
    /// The same lane was activated twice in a row.
    Repeat { lane: LaneIndex },
    /// Lanes passed over between two consecutive activations, in rotation order.
    Skip { lanes: Vec<LaneIndex> },
}

impl MistakeKind {
    /// Verb used when the mistake is shown or matched against rules.
    pub fn label(&self) -> &'static str {
        match self {
            MistakeKind::Keylock { .. } => "keylocked",
            MistakeKind::Repeat { .. } => "repeated",
            MistakeKind::Skip { .. } => "skipped",
        }
    }

    /// Lanes in display order.
    pub fn lanes(&self) -> Vec<LaneIndex> {
        match self {
            MistakeKind::Keylock { lanes: (a, b) } => vec![*a, *b],
            MistakeKind::Repeat { lane } => vec![*lane],
            MistakeKind::Skip { lanes } => lanes.clone(),
        }
    }
}

/// A classified mistake. Ownership passes to whoever presents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mistake {
    /// Timestamp of the press that caused it (monotonic microseconds).
    pub time_us: i64,
    pub kind: MistakeKind,
}

impl Mistake {
    /// # Panics
    /// If either lane is out of range or both are the same lane.
    pub fn keylock(held: LaneIndex, pressed: LaneIndex, lane_count: usize, time_us: i64) -> Self {
        assert!(
            held < lane_count && pressed < lane_count,
            "keylock lanes ({held}, {pressed}) out of range for {lane_count} lanes"
        );
        assert_ne!(held, pressed, "a lane cannot keylock against itself");
        Self {
            time_us,
            kind: MistakeKind::Keylock {
                lanes: (held, pressed),
            },
        }
    }

    /// # Panics
    /// If `lane` is out of range.
    pub fn repeat(lane: LaneIndex, lane_count: usize, time_us: i64) -> Self {
        assert!(
            lane < lane_count,
            "repeat lane {lane} out of range for {lane_count} lanes"
        );
        Self {
            time_us,
            kind: MistakeKind::Repeat { lane },
        }
    }

    /// # Panics
    /// If `lanes` is empty or holds an out-of-range lane.
    pub fn skip(lanes: Vec<LaneIndex>, lane_count: usize, time_us: i64) -> Self {
        assert!(!lanes.is_empty(), "a skip needs at least one lane");
        assert!(
            lanes.iter().all(|&l| l < lane_count),
            "skip lanes {lanes:?} out of range for {lane_count} lanes"
        );
        Self {
            time_us,
            kind: MistakeKind::Skip { lanes },
        }
    }
}
