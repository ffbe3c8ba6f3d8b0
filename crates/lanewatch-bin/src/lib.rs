// Session wiring: one consumer drives normalizer, classifier, recorder and partitioner

pub mod report;
pub mod script;
pub mod session;

pub use report::{TextReport, format_bars};
pub use script::parse_script;
pub use session::{PresentationSink, Session};
