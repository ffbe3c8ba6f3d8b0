// Cyclic timing breakdown: held, keylocked and idle time per rotation

mod overlay;
mod partition;
mod recorder;
mod sample;
mod segment;

pub use overlay::TimingOverlay;
pub use partition::{CyclePartitioner, PartitionerConfig, TimingBars};
pub use recorder::CycleRecorder;
pub use sample::{CycleSample, SampleError};
pub use segment::{BarLine, BarSegment, SegmentKind, Span};
