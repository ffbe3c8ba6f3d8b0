use chrono::{Local, NaiveDateTime, TimeDelta};

/// Maps monotonic event timestamps to local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionClock {
    origin_us: i64,
    origin: NaiveDateTime,
}

impl SessionClock {
    /// `origin_us` on the event clock corresponds to `origin` on the wall clock.
    pub fn new(origin_us: i64, origin: NaiveDateTime) -> Self {
        Self { origin_us, origin }
    }

    pub fn starting_now(origin_us: i64) -> Self {
        Self::new(origin_us, Local::now().naive_local())
    }

    /// Saturates at the ends of the calendar range.
    pub fn at(&self, time_us: i64) -> NaiveDateTime {
        let offset = time_us.saturating_sub(self.origin_us);
        self.origin
            .checked_add_signed(TimeDelta::microseconds(offset))
            .unwrap_or(if offset < 0 {
                NaiveDateTime::MIN
            } else {
                NaiveDateTime::MAX
            })
    }
}
