//! Collects lane events into complete rotations.
//!
//! A rotation starts with a press on lane 0 and expects every following lane
//! in order. The next press on lane 0 after all lanes were pressed closes it.
//! A closed rotation is reported once each of its lanes has been released, so
//! a lane still held across the boundary delays the sample until it comes up.

use lanewatch_types::{LaneEvent, LaneIndex, MIN_LANE_COUNT, PressKind};

use crate::sample::{CycleSample, SampleError};

#[derive(Debug, Clone)]
struct Rotation {
    press_us: Vec<i64>,
    release_us: Vec<Option<i64>>,
}

impl Rotation {
    fn starting_at(time_us: i64, lane_count: usize) -> Self {
        let mut press_us = Vec::with_capacity(lane_count);
        press_us.push(time_us);
        Self {
            press_us,
            release_us: vec![None; lane_count],
        }
    }

    fn pressed_lanes(&self) -> usize {
        self.press_us.len()
    }

    /// Records the release if `lane` was pressed here and is still down.
    fn release(&mut self, lane: LaneIndex, time_us: i64) -> bool {
        if lane < self.press_us.len() && self.release_us[lane].is_none() {
            self.release_us[lane] = Some(time_us);
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone)]
struct Closed {
    rotation: Rotation,
    end_us: i64,
}

impl Closed {
    /// `None` while a lane is still held.
    fn to_sample(&self) -> Option<Result<CycleSample, SampleError>> {
        let releases: Option<Vec<i64>> = self.rotation.release_us.iter().copied().collect();
        let releases = releases?;
        let origin = self.rotation.press_us[0];
        let ms = |t: i64| (t - origin) as f64 / 1000.0;
        let press: Vec<f64> = self.rotation.press_us.iter().map(|&t| ms(t)).collect();
        let release: Vec<f64> = releases.iter().map(|&t| ms(t)).collect();
        Some(CycleSample::from_instants(&press, &release, ms(self.end_us)))
    }
}

#[derive(Debug, Clone)]
pub struct CycleRecorder {
    lane_count: usize,
    held: Vec<bool>,
    current: Option<Rotation>,
    closed: Option<Closed>,
}

impl CycleRecorder {
    /// # Panics
    /// If `lane_count` is below [`MIN_LANE_COUNT`].
    pub fn new(lane_count: usize) -> Self {
        assert!(
            lane_count >= MIN_LANE_COUNT,
            "rotations need at least {MIN_LANE_COUNT} lanes, got {lane_count}"
        );
        Self {
            lane_count,
            held: vec![false; lane_count],
            current: None,
            closed: None,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// Feed one event; returns a sample when a rotation is complete.
    ///
    /// # Panics
    /// If the event's lane is out of range.
    pub fn record(&mut self, event: &LaneEvent) -> Option<CycleSample> {
        let lane = event.lane;
        assert!(
            lane < self.lane_count,
            "lane {lane} is out of range for {} lanes",
            self.lane_count
        );
        match event.kind {
            PressKind::Press => {
                if self.held[lane] {
                    return None;
                }
                self.held[lane] = true;
                self.press(lane, event.time_us);
            }
            PressKind::Release => {
                self.held[lane] = false;
                let taken = self
                    .closed
                    .as_mut()
                    .is_some_and(|c| c.rotation.release(lane, event.time_us));
                if !taken && let Some(current) = self.current.as_mut() {
                    current.release(lane, event.time_us);
                }
            }
        }
        self.take_complete()
    }

    /// Forget any partial or unreported rotation.
    pub fn reset(&mut self) {
        self.held.fill(false);
        self.current = None;
        self.closed = None;
    }

    fn press(&mut self, lane: LaneIndex, time_us: i64) {
        if lane == 0 {
            match self.current.take() {
                Some(rotation) if rotation.pressed_lanes() == self.lane_count => {
                    if self.closed.is_some() {
                        log::debug!("previous rotation never fully released, dropping it");
                    }
                    self.closed = Some(Closed {
                        rotation,
                        end_us: time_us,
                    });
                }
                Some(rotation) => log::debug!(
                    "rotation restarted after {} of {} lanes",
                    rotation.pressed_lanes(),
                    self.lane_count
                ),
                None => {}
            }
            self.current = Some(Rotation::starting_at(time_us, self.lane_count));
            return;
        }
        match self.current.as_mut() {
            Some(rotation) if rotation.pressed_lanes() == lane => rotation.press_us.push(time_us),
            Some(_) => {
                log::debug!("lane {lane} pressed out of order, discarding rotation");
                self.current = None;
            }
            None => {}
        }
    }

    fn take_complete(&mut self) -> Option<CycleSample> {
        let result = self.closed.as_ref()?.to_sample()?;
        self.closed = None;
        match result {
            Ok(sample) => Some(sample),
            Err(e) => {
                log::warn!("dropping recorded rotation: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(t: i64) -> i64 {
        t * 1000
    }

    fn press(rec: &mut CycleRecorder, lane: LaneIndex, at_ms: i64) -> Option<CycleSample> {
        rec.record(&LaneEvent::press(lane, ms(at_ms)))
    }

    fn release(rec: &mut CycleRecorder, lane: LaneIndex, at_ms: i64) -> Option<CycleSample> {
        rec.record(&LaneEvent::release(lane, ms(at_ms)))
    }

    /// Presses lanes 0..4 every 100ms from `start`, each held `hold` ms.
    fn rotation(rec: &mut CycleRecorder, start: i64, hold: [i64; 4]) -> Vec<CycleSample> {
        let mut out = Vec::new();
        for lane in 0..4 {
            let at = start + 100 * lane as i64;
            out.extend(press(rec, lane, at));
            out.extend(release(rec, lane, at + hold[lane]));
        }
        out
    }

    #[test]
    fn closing_press_emits_sample() {
        let mut rec = CycleRecorder::new(4);
        assert!(rotation(&mut rec, 0, [80, 50, 90, 60]).is_empty());
        let sample = press(&mut rec, 0, 400).unwrap();
        assert_eq!(sample.press_ms(), &[100.0; 4]);
        assert_eq!(sample.hold_ms(), &[80.0, 50.0, 90.0, 60.0]);
    }

    #[test]
    fn late_release_delays_sample() {
        let mut rec = CycleRecorder::new(4);
        press(&mut rec, 0, 0);
        release(&mut rec, 0, 50);
        press(&mut rec, 1, 100);
        release(&mut rec, 1, 150);
        press(&mut rec, 2, 200);
        release(&mut rec, 2, 250);
        press(&mut rec, 3, 300);
        assert!(press(&mut rec, 0, 400).is_none());
        assert!(release(&mut rec, 0, 420).is_none());
        let sample = release(&mut rec, 3, 450).unwrap();
        assert_eq!(sample.hold_ms(), &[50.0, 50.0, 50.0, 150.0]);
        assert_eq!(sample.cycle_ms(), 400.0);
    }

    #[test]
    fn consecutive_rotations() {
        let mut rec = CycleRecorder::new(4);
        let mut samples = rotation(&mut rec, 0, [50; 4]);
        samples.extend(rotation(&mut rec, 400, [60; 4]));
        samples.extend(press(&mut rec, 0, 800));
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].hold_ms(), &[60.0; 4]);
    }

    #[test]
    fn out_of_order_press_discards_rotation() {
        let mut rec = CycleRecorder::new(4);
        press(&mut rec, 0, 0);
        release(&mut rec, 0, 50);
        press(&mut rec, 2, 100);
        release(&mut rec, 2, 150);
        press(&mut rec, 3, 200);
        release(&mut rec, 3, 250);
        assert!(press(&mut rec, 0, 300).is_none());
        // the press at 300 starts a fresh rotation
        let samples = {
            let mut s = Vec::new();
            for lane in 1..4 {
                let at = 300 + 100 * lane as i64;
                s.extend(release(&mut rec, lane - 1, at - 20));
                s.extend(press(&mut rec, lane, at));
            }
            s.extend(release(&mut rec, 3, 680));
            s.extend(press(&mut rec, 0, 700));
            s
        };
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].press_ms(), &[100.0; 4]);
    }

    #[test]
    fn key_repeat_is_ignored() {
        let mut rec = CycleRecorder::new(4);
        press(&mut rec, 0, 0);
        press(&mut rec, 0, 30);
        press(&mut rec, 0, 60);
        release(&mut rec, 0, 80);
        for lane in 1..4 {
            press(&mut rec, lane, 100 * lane as i64);
            release(&mut rec, lane, 100 * lane as i64 + 50);
        }
        let sample = press(&mut rec, 0, 400).unwrap();
        assert_eq!(sample.press_ms()[0], 100.0);
        assert_eq!(sample.hold_ms()[0], 80.0);
    }

    #[test]
    fn reset_forgets_partial_rotation() {
        let mut rec = CycleRecorder::new(4);
        rotation(&mut rec, 0, [50; 4]);
        rec.reset();
        assert!(press(&mut rec, 0, 400).is_none());
    }

    #[test]
    fn presses_before_lane_zero_are_ignored() {
        let mut rec = CycleRecorder::new(3);
        press(&mut rec, 1, 0);
        release(&mut rec, 1, 10);
        press(&mut rec, 2, 20);
        release(&mut rec, 2, 30);
        assert!(press(&mut rec, 0, 40).is_none());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn lane_out_of_range() {
        CycleRecorder::new(4).record(&LaneEvent::press(4, 0));
    }
}
