//! Wall-clock access and the tile clock label.
//!
//! The core never reads the system time itself. Callers hand in a [`Clock`]
//! so that rendering is deterministic under test.

use chrono::{DateTime, FixedOffset, TimeZone, Timelike};
use heapless::String;

/// Maximum length of a formatted clock label ("23:59").
pub const MAX_CLOCK_LABEL_LENGTH: usize = 8;

/// Source of "now" for rendering.
///
/// The offset of the returned time is the local timezone used for hour
/// ticks on the sparkline's time axis.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Format a point in time as `H:MM` in the timestamp's own timezone.
///
/// The hour is not padded and the minutes always are, so 09:05 renders as
/// `9:05` and 23:00 as `23:00`. Convert to local time before calling.
pub fn format_clock_label<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String<MAX_CLOCK_LABEL_LENGTH> {
    let mut s = String::new();
    let _ = core::fmt::write(
        &mut s,
        format_args!("{}:{:02}", timestamp.hour(), timestamp.minute()),
    );
    s
}
