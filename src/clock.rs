//! Wall-clock abstraction
//!
//! The quote protocol only cares about the local calendar date and the minute
//! of the day. Both come from a `Clock` so tests can move time by hand.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};
use std::sync::Mutex;

/// Source of the current local time
pub trait Clock: Send + Sync {
    /// Returns the current local date and time
    fn now(&self) -> NaiveDateTime;

    /// Returns the current local calendar date
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Clock backed by the system's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock that only moves when told to
///
/// Used by tests to simulate day rollover without waiting for it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    /// Creates a clock frozen at `now`
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Creates a clock frozen at the given local date and time
    ///
    /// Returns `None` if the components do not form a valid date/time.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        let now = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
        Some(Self::new(now))
    }

    /// Jumps to an absolute time
    pub fn set(&self, now: NaiveDateTime) {
        *self.lock() = now;
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.lock();
        *now += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NaiveDateTime> {
        // A poisoned clock still holds a valid timestamp
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.lock()
    }
}

/// Formats a date as `YYYY-MM-DD`, the persisted fetch-date format
pub fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Minutes elapsed since local midnight (0..1440)
pub fn minutes_since_midnight(now: NaiveDateTime) -> u32 {
    now.hour() * 60 + now.minute()
}
