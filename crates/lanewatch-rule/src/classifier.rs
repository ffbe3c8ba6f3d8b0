//! Mistake classifier.
//!
//! Consumes lane presses and releases in time order and reports keylocks,
//! repeats and skips. Holds per-lane press state, the last activated lane and
//! the instant all lanes were last released. Not thread-safe by construction:
//! feed it from a single consumer.

use lanewatch_types::{LaneEvent, LaneIndex, MIN_LANE_COUNT, PressKind};

use crate::mistake::Mistake;
use crate::modular_range::modular_range;

/// What the classifier needs to know about the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierConfig {
    lane_count: usize,
    release_grace_us: Option<i64>,
}

impl ClassifierConfig {
    /// `release_grace_us` is the idle time after a full release that makes the
    /// next press start a fresh sequence; `None` disables the grace window.
    ///
    /// # Panics
    /// If `lane_count` is below [`MIN_LANE_COUNT`]: with fewer lanes "two lanes
    /// back" is the pressed lane itself.
    pub fn new(lane_count: usize, release_grace_us: Option<i64>) -> Self {
        assert!(
            lane_count >= MIN_LANE_COUNT,
            "mistake classification needs at least {MIN_LANE_COUNT} lanes, got {lane_count}"
        );
        Self {
            lane_count,
            release_grace_us,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn release_grace_us(&self) -> Option<i64> {
        self.release_grace_us
    }
}

/// Mutable classifier state. Exposed read-only for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierState {
    pressed: Vec<bool>,
    last_activated: Option<LaneIndex>,
    full_release_us: Option<i64>,
}

impl ClassifierState {
    fn new(lane_count: usize) -> Self {
        Self {
            pressed: vec![false; lane_count],
            last_activated: None,
            full_release_us: None,
        }
    }

    pub fn is_pressed(&self, lane: LaneIndex) -> bool {
        self.pressed[lane]
    }

    pub fn pressed_count(&self) -> usize {
        self.pressed.iter().filter(|&&p| p).count()
    }

    pub fn last_activated(&self) -> Option<LaneIndex> {
        self.last_activated
    }

    pub fn full_release_us(&self) -> Option<i64> {
        self.full_release_us
    }
}

#[derive(Debug, Clone)]
pub struct MistakeClassifier {
    config: ClassifierConfig,
    state: ClassifierState,
}

impl MistakeClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            state: ClassifierState::new(config.lane_count),
            config,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    /// Forget pressed lanes and the last activated lane.
    ///
    /// The full-release instant is kept, so a clear does not open a grace window.
    pub fn clear(&mut self) {
        self.state.pressed.fill(false);
        self.state.last_activated = None;
    }

    /// Process one event and return the mistakes it causes (zero, one or two).
    ///
    /// # Panics
    /// If `event.lane` is not a lane of this session. Unbound input must be
    /// filtered out before it gets here.
    pub fn handle(&mut self, event: LaneEvent) -> Vec<Mistake> {
        let n = self.config.lane_count;
        let k = event.lane;
        assert!(k < n, "lane {k} is not bound (lane count {n})");

        if event.kind == PressKind::Release {
            self.state.pressed[k] = false;
            if !self.state.pressed.contains(&true) {
                self.state.full_release_us = Some(event.time_us);
                log::debug!("all lanes released at {}us", event.time_us);
            }
            return Vec::new();
        }

        // key repeat from holding the key down
        if self.state.pressed[k] {
            log::debug!("ignoring repeated press on held lane {k}");
            return Vec::new();
        }

        if let Some(released_at) = self.state.full_release_us.take()
            && let Some(grace) = self.config.release_grace_us
        {
            let elapsed = event.time_us - released_at;
            if elapsed >= grace {
                log::debug!("press on lane {k} {elapsed}us after full release starts a new sequence");
                self.activate(k);
                return Vec::new();
            }
        }

        let mistakes = self.evaluate(k, event.time_us);
        self.activate(k);
        mistakes
    }

    fn evaluate(&self, k: LaneIndex, time_us: i64) -> Vec<Mistake> {
        let n = self.config.lane_count;
        let mut mistakes = Vec::new();

        let two_back = (k + n - 2) % n;
        if self.state.pressed[two_back] {
            log::debug!("{two_back}-{k} keylock");
            mistakes.push(Mistake::keylock(two_back, k, n, time_us));
        }

        match self.state.last_activated {
            Some(last) if last == k => {
                log::debug!("{k} repeat");
                mistakes.push(Mistake::repeat(k, n, time_us));
            }
            Some(last) => {
                let skipped: Vec<LaneIndex> =
                    modular_range(n, last as i64 + 1, k as i64).collect();
                if !skipped.is_empty() {
                    log::debug!("skipped lanes {skipped:?}");
                    mistakes.push(Mistake::skip(skipped, n, time_us));
                }
            }
            None => {}
        }
        mistakes
    }

    fn activate(&mut self, k: LaneIndex) {
        self.state.pressed[k] = true;
        self.state.last_activated = Some(k);
    }
}
