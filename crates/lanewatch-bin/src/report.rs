use std::io::{self, Write};

use lanewatch_display::{FlashSchedule, MistakeLine, SoundCue};
use lanewatch_timing::{BarLine, SegmentKind, TimingBars};

use crate::session::PresentationSink;

/// Writes everything the session presents as plain text lines.
pub struct TextReport<W: Write> {
    out: W,
    error: Option<io::Error>,
    mistakes: usize,
    rotations: usize,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            error: None,
            mistakes: 0,
            rotations: 0,
        }
    }

    pub fn mistakes(&self) -> usize {
        self.mistakes
    }

    pub fn rotations(&self) -> usize {
        self.rotations
    }

    /// The first write error, if any, and the writer.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn line(&mut self, text: &str) {
        if self.error.is_none()
            && let Err(e) = writeln!(self.out, "{text}")
        {
            self.error = Some(e);
        }
    }
}

impl<W: Write> PresentationSink for TextReport<W> {
    fn mistake(&mut self, line: &MistakeLine) {
        self.mistakes += 1;
        self.line(&line.text());
    }

    fn flash(&mut self, schedule: &FlashSchedule) {
        if let Some(first) = schedule.steps.first() {
            self.line(&format!(
                "  flash {} ({} steps)",
                first.colour,
                schedule.steps.len()
            ));
        }
    }

    fn sound(&mut self, cue: &SoundCue) {
        self.line(&format!(
            "  sound {} at {}",
            cue.path.display(),
            cue.at.format("%H:%M:%S%.3f")
        ));
    }

    fn bars(&mut self, bars: &TimingBars) {
        self.rotations += 1;
        self.line(&format_bars(bars));
    }

    fn cleared(&mut self) {
        self.line("-- cleared --");
    }
}

fn segment_label(kind: SegmentKind) -> String {
    match kind {
        SegmentKind::Held(lane) => format!("{}", lane + 1),
        SegmentKind::Idle(lane) => format!("{}~", lane + 1),
        SegmentKind::Keylock => "X".to_string(),
    }
}

fn format_bar(name: &str, bar: &BarLine) -> String {
    let segments: Vec<String> = bar
        .segments()
        .iter()
        .map(|s| format!("{} {:.1}", segment_label(s.kind), s.duration_ms))
        .collect();
    format!("{name:<5}| {}", segments.join(" | "))
}

/// Three lines, one per bar. Held segments show the lane number, idle ones a
/// trailing `~`, keylocks `X`.
pub fn format_bars(bars: &TimingBars) -> String {
    [
        format_bar("all", &bars.all),
        format_bar("even", &bars.even),
        format_bar("odd", &bars.odd),
    ]
    .join("\n")
}
