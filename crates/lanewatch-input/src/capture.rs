use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use lanewatch_types::InputCode;

use crate::device::RawInputEvent;

pub const DEFAULT_CAPTURE_TIMEOUT: Duration = Duration::from_secs(3);

/// Wait for the next press on a temporary all-device hook and return its code.
///
/// Releases are skipped. Returns `None` if nothing is pressed within `timeout`
/// or the hook goes away.
pub fn capture_next_code(rx: &Receiver<RawInputEvent>, timeout: Duration) -> Option<InputCode> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(event) if event.kind.is_press() => return Some(event.code),
            Ok(_) => continue,
            Err(RecvTimeoutError::Timeout) => {
                log::info!("key binding timed out");
                return None;
            }
            Err(RecvTimeoutError::Disconnected) => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanewatch_types::{MouseButton, PressKind};
    use std::sync::mpsc;

    #[test]
    fn returns_first_press_skipping_releases() {
        let (tx, rx) = mpsc::channel();
        tx.send(RawInputEvent::new(InputCode::Key(5), PressKind::Release, 0))
            .unwrap();
        tx.send(RawInputEvent::new(
            InputCode::Mouse(MouseButton::Right),
            PressKind::Press,
            1,
        ))
        .unwrap();
        assert_eq!(
            capture_next_code(&rx, Duration::from_millis(100)),
            Some(InputCode::Mouse(MouseButton::Right))
        );
    }

    #[test]
    fn times_out_without_press() {
        let (tx, rx) = mpsc::channel::<RawInputEvent>();
        let result = capture_next_code(&rx, Duration::from_millis(10));
        drop(tx);
        assert_eq!(result, None);
    }

    #[test]
    fn disconnected_hook_returns_none() {
        let (tx, rx) = mpsc::channel::<RawInputEvent>();
        drop(tx);
        assert_eq!(capture_next_code(&rx, Duration::from_secs(1)), None);
    }
}
