//! Mistake lines.
//!
//! A line is a timestamp prefix in gray, the mistake label, then one token per
//! lane. Keylock tokens are joined with `-`, skip tokens with `, `. The same
//! tokens without the prefix form the description that feedback rules match.

use chrono::NaiveDateTime;
use lanewatch_rule::{Mistake, MistakeKind, modular_range};
use lanewatch_types::{Colour, LaneIndex};

use crate::config::{DisplayConfig, NEUTRAL};

const STAMP_FORMAT: &str = "[%H:%M:%S] ";

/// A piece of text in one colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub colour: Colour,
}

impl TextRun {
    fn new(text: impl Into<String>, colour: Colour) -> Self {
        Self {
            text: text.into(),
            colour,
        }
    }
}

/// One rendered mistake, ready to be drawn run by run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MistakeLine {
    pub runs: Vec<TextRun>,
    /// Text used for rule matching, without the timestamp.
    pub description: String,
}

impl MistakeLine {
    pub fn render(mistake: &Mistake, at: NaiveDateTime, config: &DisplayConfig) -> Self {
        let mut runs = vec![
            TextRun::new(at.format(STAMP_FORMAT).to_string(), Colour::GRAY),
            TextRun::new(format!("{} ", mistake.kind.label()), NEUTRAL),
        ];
        let separator = separator(&mistake.kind);
        for (i, lane) in mistake.kind.lanes().into_iter().enumerate() {
            if i > 0 {
                runs.push(TextRun::new(separator, NEUTRAL));
            }
            runs.push(TextRun::new(config.token(lane), config.token_colour(lane)));
        }
        Self {
            runs,
            description: description(&mistake.kind, config),
        }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

fn separator(kind: &MistakeKind) -> &'static str {
    match kind {
        MistakeKind::Keylock { .. } => "-",
        MistakeKind::Repeat { .. } => "",
        MistakeKind::Skip { .. } => ", ",
    }
}

/// `keylocked 1-3`, `repeated 2`, `skipped 2, 3` with the active display tokens.
pub fn description(kind: &MistakeKind, config: &DisplayConfig) -> String {
    let tokens: Vec<String> = kind.lanes().into_iter().map(|l| config.token(l)).collect();
    format!("{} {}", kind.label(), tokens.join(separator(kind)))
}

/// The longest lines each lane can produce: a keylock against the lane two
/// ahead and a skip over every lane but two. A UI sizes its text area to the
/// widest of these.
pub fn widest_line_tokens(config: &DisplayConfig) -> Vec<MistakeLine> {
    let n = config.lane_count();
    // midnight renders with the same digit count as any other time
    let at = NaiveDateTime::default();
    (0..n)
        .flat_map(|i| {
            let skipped: Vec<LaneIndex> = modular_range(n, i as i64, i as i64 - 2).collect();
            [
                Mistake::keylock(i, (i + 2) % n, n, 0),
                Mistake::skip(skipped, n, 0),
            ]
        })
        .map(|m| MistakeLine::render(&m, at, config))
        .collect()
}
