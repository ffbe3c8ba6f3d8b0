// Presentation of mistakes: text lines, feedback rules, background flashes and the scrollable log

mod clock;
mod config;
mod effects;
mod flash;
mod format;
mod layout;
mod mistake_log;

pub use clock::SessionClock;
pub use config::DisplayConfig;
pub use effects::{FeedbackRules, RuleError, SoundCue};
pub use flash::{FRAME_MS, FlashSchedule, FlashStep, Flasher};
pub use format::{MistakeLine, TextRun, description, widest_line_tokens};
pub use layout::LineMetrics;
pub use mistake_log::MistakeLog;
