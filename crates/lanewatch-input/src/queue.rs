//! Serialization point between hook threads and the session loop.
//!
//! Hook callbacks may fire on any thread. Everything they produce, including
//! rebind requests from the settings UI, goes through one channel with a
//! single consumer, so the classifier sees a totally ordered stream and a
//! rebind lands strictly between two events.
use std::sync::mpsc;

use lanewatch_config::Binding;

use crate::binding_table::Slot;
use crate::device::RawInputEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMessage {
    Input(RawInputEvent),
    Rebind { slot: Slot, binding: Binding },
    Unbind(Slot),
    Shutdown,
}

/// Producer half. Cheap to clone; one per hook.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<SessionMessage>,
}

/// Consumer half. Not `Clone`: there is exactly one.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<SessionMessage>,
}

pub fn event_queue() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, EventReceiver { rx })
}

impl EventSender {
    /// Returns `false` once the receiver has been dropped.
    pub fn send(&self, message: SessionMessage) -> bool {
        self.tx.send(message).is_ok()
    }

    pub fn input(&self, event: RawInputEvent) -> bool {
        self.send(SessionMessage::Input(event))
    }
}

impl EventReceiver {
    /// Block until the next message. `None` when every sender is gone.
    pub fn recv(&self) -> Option<SessionMessage> {
        self.rx.recv().ok()
    }

    /// Drain whatever is queued without blocking.
    pub fn try_iter(&self) -> impl Iterator<Item = SessionMessage> + '_ {
        self.rx.try_iter()
    }
}

impl Iterator for EventReceiver {
    type Item = SessionMessage;

    fn next(&mut self) -> Option<SessionMessage> {
        self.recv()
    }
}
