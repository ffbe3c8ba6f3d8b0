//! Cyclic timing partitioner.
//!
//! Splits one rotation into three bars:
//! - all lanes: one segment per lane, as long as the gap to the next press;
//! - even lanes (0, 2, 4, ...) and odd lanes (1, 3, 5, ...): each lane owns the
//!   slot from its press to the press of the next lane in its group, shown as
//!   held time followed by idle time, or by a keylock when the hold runs into
//!   the next slot.
//!
//! A keylock is carried into the following slot so the next lane's held time
//! starts after it. The group is circular: the last lane's slot ends at the
//! first lane's press in the next rotation, so its overlap is computed first
//! and placed at the start of the bar. Every parity bar sums to the rotation
//! length and the wraparound overlap appears exactly once.

use lanewatch_types::{Colour, LaneIndex, MIN_LANE_COUNT};

use crate::overlay::TimingOverlay;
use crate::sample::CycleSample;
use crate::segment::{BarLine, BarSegment, SegmentKind};

/// Split pieces shorter than this are dropped when a bar is rotated.
const SPLIT_EPSILON_MS: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct PartitionerConfig {
    lane_colours: Vec<Colour>,
}

impl PartitionerConfig {
    /// One colour per lane; the lane count is taken from its length.
    ///
    /// # Panics
    /// If fewer than [`MIN_LANE_COUNT`] colours are given.
    pub fn new(lane_colours: Vec<Colour>) -> Self {
        assert!(
            lane_colours.len() >= MIN_LANE_COUNT,
            "timing bars need at least {MIN_LANE_COUNT} lanes, got {}",
            lane_colours.len()
        );
        Self { lane_colours }
    }

    pub fn lane_count(&self) -> usize {
        self.lane_colours.len()
    }

    pub fn lane_colours(&self) -> &[Colour] {
        &self.lane_colours
    }
}

/// The three bars of one rotation plus where to draw dividers and scale marks.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingBars {
    pub all: BarLine,
    pub even: BarLine,
    pub odd: BarLine,
    pub overlay: TimingOverlay,
}

impl TimingBars {
    /// Bars in drawing order, top to bottom.
    pub fn lines(&self) -> [&BarLine; 3] {
        [&self.all, &self.even, &self.odd]
    }
}

#[derive(Debug, Clone)]
pub struct CyclePartitioner {
    config: PartitionerConfig,
}

impl CyclePartitioner {
    pub fn new(config: PartitionerConfig) -> Self {
        Self { config }
    }

    /// # Panics
    /// If the sample's lane count differs from the configured one.
    pub fn partition(&self, sample: &CycleSample) -> TimingBars {
        let n = self.config.lane_count();
        assert_eq!(
            sample.lane_count(),
            n,
            "sample has {} lanes, partitioner is configured for {n}",
            sample.lane_count()
        );
        let bars = TimingBars {
            all: self.all_lanes_bar(sample),
            even: self.parity_bar(sample, 0),
            odd: self.parity_bar(sample, 1),
            overlay: TimingOverlay::for_lanes(n),
        };
        log::debug!(
            "partitioned {:.1}ms rotation: {} + {} keylocks",
            sample.cycle_ms(),
            bars.even.keylock_count(),
            bars.odd.keylock_count()
        );
        bars
    }

    fn all_lanes_bar(&self, sample: &CycleSample) -> BarLine {
        let pieces = sample
            .press_ms()
            .iter()
            .enumerate()
            .map(|(lane, &d)| (d, SegmentKind::Held(lane)))
            .collect();
        self.to_bar(pieces)
    }

    fn parity_bar(&self, sample: &CycleSample, parity: usize) -> BarLine {
        let n = sample.lane_count();
        let press = sample.press_ms();
        let hold = sample.hold_ms();

        let group: Vec<LaneIndex> = (parity..n).step_by(2).collect();
        let m = group.len();
        let slots: Vec<f64> = (0..m)
            .map(|j| {
                let step = if j + 1 < m {
                    group[j + 1] - group[j]
                } else {
                    group[0] + n - group[j]
                };
                (0..step).map(|d| press[(group[j] + d) % n]).sum()
            })
            .collect();
        // hold running past the slot, capped at the following slot
        let overshoot = |j: usize| (hold[group[j]] - slots[j]).max(0.0).min(slots[(j + 1) % m]);

        let mut pieces = Vec::with_capacity(2 * m + 1);
        let wrap = overshoot(m - 1);
        if wrap > 0.0 {
            pieces.push((wrap, SegmentKind::Keylock));
        }
        let mut carried = wrap;
        for (j, &lane) in group.iter().enumerate() {
            let slot = slots[j];
            let h = hold[lane];
            pieces.push(((h.min(slot) - carried).max(0.0), SegmentKind::Held(lane)));
            if h > slot {
                let keylock = overshoot(j);
                // the last lane's overlap already opens the bar
                if j + 1 < m {
                    pieces.push((keylock, SegmentKind::Keylock));
                }
                carried = keylock;
            } else {
                pieces.push((slot - h.max(carried), SegmentKind::Idle(lane)));
                carried = 0.0;
            }
        }

        // the group starts at its first lane's press; the bar starts at lane 0's
        let start: f64 = press[..group[0]].iter().sum();
        if start > 0.0 {
            pieces = rotate(pieces, sample.cycle_ms() - start);
        }
        self.to_bar(pieces)
    }

    fn to_bar(&self, pieces: Vec<(f64, SegmentKind)>) -> BarLine {
        let colours = self.config.lane_colours();
        BarLine::new(
            pieces
                .into_iter()
                .map(|(duration_ms, kind)| BarSegment {
                    duration_ms,
                    kind,
                    colour: kind.colour(colours),
                })
                .collect(),
        )
    }
}

/// Move everything after `cut` to the front, splitting the piece that straddles it.
fn rotate(pieces: Vec<(f64, SegmentKind)>, cut: f64) -> Vec<(f64, SegmentKind)> {
    let mut head = Vec::with_capacity(pieces.len());
    let mut tail = Vec::new();
    let mut t = 0.0;
    for (d, kind) in pieces {
        let end = t + d;
        if end <= cut {
            head.push((d, kind));
        } else if t >= cut {
            tail.push((d, kind));
        } else {
            if cut - t > SPLIT_EPSILON_MS {
                head.push((cut - t, kind));
            }
            if end - cut > SPLIT_EPSILON_MS {
                tail.push((end - cut, kind));
            }
        }
        t = end;
    }
    tail.extend(head);
    tail
}
