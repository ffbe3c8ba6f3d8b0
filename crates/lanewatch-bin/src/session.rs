//! The monitoring session.
//!
//! Owns every piece of mutable state and is driven by exactly one consumer:
//! either [`Session::run`] on the event queue or direct calls in tests.
//! Bindings only change through messages handled here, so a rebind always
//! lands between two events.

use anyhow::{Context, Result};
use lanewatch_config::{Binding, Settings};
use lanewatch_display::{
    DisplayConfig, FeedbackRules, FlashSchedule, Flasher, LineMetrics, MistakeLine, MistakeLog,
    SessionClock, SoundCue,
};
use lanewatch_input::{
    BindError, BindingTable, ControlAction, EventReceiver, NormalizedEvent, RawInputEvent,
    SessionMessage, Slot,
};
use lanewatch_rule::{ClassifierConfig, ClassifierState, MistakeClassifier};
use lanewatch_timing::{CyclePartitioner, CycleRecorder, PartitionerConfig, TimingBars};
use lanewatch_types::{LaneEvent, PressKind};

/// Rows the timing bars occupy above the mistake lines.
const BAR_ROWS: usize = 3;

/// Receives everything the session wants shown or played.
pub trait PresentationSink {
    fn mistake(&mut self, line: &MistakeLine);

    fn flash(&mut self, _schedule: &FlashSchedule) {}

    fn sound(&mut self, _cue: &SoundCue) {}

    fn bars(&mut self, _bars: &TimingBars) {}

    /// The display was cleared.
    fn cleared(&mut self) {}
}

pub struct Session {
    bindings: BindingTable,
    classifier: MistakeClassifier,
    recorder: CycleRecorder,
    partitioner: CyclePartitioner,
    display: DisplayConfig,
    rules: FeedbackRules,
    flasher: Flasher,
    clock: SessionClock,
    log: MistakeLog,
    analysis_enabled: bool,
    last_bars: Option<TimingBars>,
}

impl Session {
    pub fn new(settings: &Settings, clock: SessionClock) -> Result<Self> {
        let mut settings = settings.clone();
        settings.validate();
        let rules = FeedbackRules::from_settings(&settings).context("compiling feedback rules")?;
        let metrics = LineMetrics::from_settings(&settings);
        log::info!(
            "session with {} lanes, {} text rows",
            settings.lane_count,
            metrics.rows
        );
        Ok(Self {
            bindings: BindingTable::from_settings(&settings),
            classifier: MistakeClassifier::new(ClassifierConfig::new(
                settings.lane_count,
                settings.release_grace_us(),
            )),
            recorder: CycleRecorder::new(settings.lane_count),
            partitioner: CyclePartitioner::new(PartitionerConfig::new(settings.colours.clone())),
            display: DisplayConfig::from_settings(&settings),
            rules,
            flasher: Flasher::new(
                settings.periphery_background_colour,
                settings.periphery_decay_ms,
            ),
            clock,
            log: MistakeLog::new(metrics.rows),
            analysis_enabled: settings.analysis_enabled,
            last_bars: None,
        })
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn classifier_state(&self) -> &ClassifierState {
        self.classifier.state()
    }

    pub fn mistake_log(&self) -> &MistakeLog {
        &self.log
    }

    pub fn analysis_enabled(&self) -> bool {
        self.analysis_enabled
    }

    pub fn last_bars(&self) -> Option<&TimingBars> {
        self.last_bars.as_ref()
    }

    /// Handle messages until `Shutdown` or until every sender is gone.
    /// Returns the number of input events processed.
    pub fn run(&mut self, rx: &EventReceiver, sink: &mut impl PresentationSink) -> usize {
        let mut processed = 0;
        while let Some(message) = rx.recv() {
            match message {
                SessionMessage::Input(event) => {
                    self.handle_raw(&event, sink);
                    processed += 1;
                }
                SessionMessage::Rebind { slot, binding } => {
                    if let Err(e) = self.rebind(slot, binding) {
                        log::warn!("rebind of {slot} rejected: {e}");
                    }
                }
                SessionMessage::Unbind(slot) => self.unbind(slot),
                SessionMessage::Shutdown => {
                    log::info!("session shutting down after {processed} events");
                    break;
                }
            }
        }
        processed
    }

    pub fn rebind(&mut self, slot: Slot, binding: Binding) -> Result<(), BindError> {
        self.bindings.bind(slot, binding)?;
        self.display.lane_names = self.bindings.lane_names();
        Ok(())
    }

    pub fn unbind(&mut self, slot: Slot) {
        if let Some(old) = self.bindings.unbind(slot) {
            log::info!("unbound {} from {slot}", old.name);
            self.display.lane_names = self.bindings.lane_names();
        }
    }

    pub fn handle_raw(&mut self, event: &RawInputEvent, sink: &mut impl PresentationSink) {
        match self.bindings.normalize(event) {
            Some(NormalizedEvent::Lane(lane_event)) => self.handle_lane(lane_event, sink),
            Some(NormalizedEvent::Control {
                action,
                kind: PressKind::Press,
                ..
            }) => self.handle_control(action, sink),
            Some(NormalizedEvent::Control { .. }) | None => {}
        }
    }

    fn handle_control(&mut self, action: ControlAction, sink: &mut impl PresentationSink) {
        match action {
            ControlAction::Clear => {
                log::info!("clearing display");
                self.log.clear();
                self.classifier.clear();
                self.recorder.reset();
                sink.cleared();
            }
            ControlAction::ToggleAnalysis => {
                self.analysis_enabled = !self.analysis_enabled;
                log::info!(
                    "timing analysis {}",
                    if self.analysis_enabled { "on" } else { "off" }
                );
                let rows = if self.analysis_enabled && self.last_bars.is_some() {
                    BAR_ROWS
                } else {
                    0
                };
                self.log.set_bar_rows(rows);
            }
        }
    }

    fn handle_lane(&mut self, event: LaneEvent, sink: &mut impl PresentationSink) {
        for mistake in self.classifier.handle(event) {
            let at = self.clock.at(mistake.time_us);
            let line = MistakeLine::render(&mistake, at, &self.display);
            for colour in self.rules.flash_colours(&line.description) {
                sink.flash(&self.flasher.flash(colour));
            }
            for cue in self.rules.sound_cues(&line.description, at) {
                sink.sound(&cue);
            }
            sink.mistake(&line);
            self.log.insert(line);
        }

        if let Some(sample) = self.recorder.record(&event)
            && self.analysis_enabled
        {
            let bars = self.partitioner.partition(&sample);
            sink.bars(&bars);
            self.log.set_bar_rows(BAR_ROWS);
            self.last_bars = Some(bars);
        }
    }
}
