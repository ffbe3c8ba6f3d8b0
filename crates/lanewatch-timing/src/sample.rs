use lanewatch_types::MIN_LANE_COUNT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("a rotation needs at least {MIN_LANE_COUNT} lanes, got {0}")]
    TooFewLanes(usize),
    #[error("press and release lists differ in length ({presses} vs {releases})")]
    LengthMismatch { presses: usize, releases: usize },
    #[error("lane {lane}: {value} is not a finite, non-negative duration")]
    InvalidDuration { lane: usize, value: f64 },
    #[error("lane {lane} is pressed before lane {prev}")]
    OutOfOrder { lane: usize, prev: usize },
    #[error("lane {lane} is released before it is pressed")]
    ReleaseBeforePress { lane: usize },
    #[error("the rotation ends before the last lane is pressed")]
    EndBeforeLastPress,
}

/// One full rotation of press/release timing, in milliseconds.
///
/// Stored as durations measured from each lane's own press:
/// - `press_ms[i]`: from lane `i`'s press to the next lane's press (for the
///   last lane, to lane 0's press in the next rotation). The sum is the
///   rotation length.
/// - `hold_ms[i]`: from lane `i`'s press to its release.
///
/// Construction validates the sample, so the partitioner never sees a
/// release before its press.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSample", into = "RawSample")]
pub struct CycleSample {
    press_ms: Vec<f64>,
    hold_ms: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSample {
    press_ms: Vec<f64>,
    hold_ms: Vec<f64>,
}

impl TryFrom<RawSample> for CycleSample {
    type Error = SampleError;

    fn try_from(raw: RawSample) -> Result<Self, Self::Error> {
        CycleSample::from_durations(raw.press_ms, raw.hold_ms)
    }
}

impl From<CycleSample> for RawSample {
    fn from(sample: CycleSample) -> Self {
        RawSample {
            press_ms: sample.press_ms,
            hold_ms: sample.hold_ms,
        }
    }
}

fn check_duration(lane: usize, value: f64) -> Result<(), SampleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SampleError::InvalidDuration { lane, value })
    }
}

impl CycleSample {
    /// Build from per-lane durations (see the type docs for their meaning).
    pub fn from_durations(press_ms: Vec<f64>, hold_ms: Vec<f64>) -> Result<Self, SampleError> {
        if press_ms.len() != hold_ms.len() {
            return Err(SampleError::LengthMismatch {
                presses: press_ms.len(),
                releases: hold_ms.len(),
            });
        }
        if press_ms.len() < MIN_LANE_COUNT {
            return Err(SampleError::TooFewLanes(press_ms.len()));
        }
        for (lane, (&p, &h)) in press_ms.iter().zip(&hold_ms).enumerate() {
            check_duration(lane, p)?;
            check_duration(lane, h)?;
        }
        Ok(Self { press_ms, hold_ms })
    }

    /// Build from absolute instants measured from a common reference.
    ///
    /// `press_at[i]` and `release_at[i]` are lane `i`'s press and release;
    /// `cycle_end` is lane 0's press in the following rotation.
    pub fn from_instants(
        press_at: &[f64],
        release_at: &[f64],
        cycle_end: f64,
    ) -> Result<Self, SampleError> {
        if press_at.len() != release_at.len() {
            return Err(SampleError::LengthMismatch {
                presses: press_at.len(),
                releases: release_at.len(),
            });
        }
        let n = press_at.len();
        if n < MIN_LANE_COUNT {
            return Err(SampleError::TooFewLanes(n));
        }
        for lane in 1..n {
            if press_at[lane] < press_at[lane - 1] {
                return Err(SampleError::OutOfOrder {
                    lane,
                    prev: lane - 1,
                });
            }
        }
        if cycle_end < press_at[n - 1] {
            return Err(SampleError::EndBeforeLastPress);
        }
        for lane in 0..n {
            if release_at[lane] < press_at[lane] {
                return Err(SampleError::ReleaseBeforePress { lane });
            }
        }
        let press_ms = (0..n)
            .map(|i| {
                let next = if i + 1 < n { press_at[i + 1] } else { cycle_end };
                next - press_at[i]
            })
            .collect();
        let hold_ms = (0..n).map(|i| release_at[i] - press_at[i]).collect();
        Self::from_durations(press_ms, hold_ms)
    }

    pub fn lane_count(&self) -> usize {
        self.press_ms.len()
    }

    pub fn press_ms(&self) -> &[f64] {
        &self.press_ms
    }

    pub fn hold_ms(&self) -> &[f64] {
        &self.hold_ms
    }

    /// Length of the rotation.
    pub fn cycle_ms(&self) -> f64 {
        self.press_ms.iter().sum()
    }

    /// Press instant of each lane relative to lane 0's press.
    pub fn press_offsets(&self) -> Vec<f64> {
        self.press_ms
            .iter()
            .scan(0.0, |at, &d| {
                let here = *at;
                *at += d;
                Some(here)
            })
            .collect()
    }
}
