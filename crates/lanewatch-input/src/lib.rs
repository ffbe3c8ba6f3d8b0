// Raw hardware events -> lane/control events

mod binding_table;
mod capture;
mod device;
mod queue;

pub use binding_table::{BindError, BindingTable, ControlAction, Slot};
pub use capture::{DEFAULT_CAPTURE_TIMEOUT, capture_next_code};
pub use device::{NormalizedEvent, RawInputEvent};
pub use queue::{EventReceiver, EventSender, SessionMessage, event_queue};
