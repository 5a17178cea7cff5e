//! Rolling time window, the "extend to now" transform and hour ticks

use alloc::vec::Vec;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use heapless::String;
use log::warn;

use crate::graph::TimeTick;
use crate::station::{Sample, Series};

use super::{SparklineError, SparklineResult};

const SECS_PER_HOUR: i64 = 3600;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Closed time interval `[start, end]` shown on the x-axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window of `hours` ending exactly at `end`
    pub fn ending_at(end: DateTime<Utc>, hours: u32) -> SparklineResult<Self> {
        let length = TimeDelta::try_hours(i64::from(hours))
            .filter(|length| *length > TimeDelta::zero())
            .ok_or(SparklineError::InvalidWindow)?;
        let start = end
            .checked_sub_signed(length)
            .ok_or(SparklineError::InvalidWindow)?;

        Ok(Self { start, end })
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Seconds from the window end to `timestamp`, negative inside the window
    pub fn offset_secs(&self, timestamp: DateTime<Utc>) -> f32 {
        (timestamp - self.end).num_milliseconds() as f32 / 1000.0
    }

    /// Offset of the window start, the x-axis lower bound
    pub fn start_offset_secs(&self) -> f32 {
        self.offset_secs(self.start)
    }
}

/// Working copy of the series with a copy of its last sample stamped at `now`
///
/// The appended sample carries the last sample's value as is, so a trailing
/// gap stays a gap. It is appended even when the newest sample is stamped
/// after `now`. The caller's series is left untouched.
pub fn extend_to_now(series: &Series, now: DateTime<Utc>) -> SparklineResult<Vec<Sample>> {
    let last = *series.last().ok_or(SparklineError::EmptySeries)?;

    if last.timestamp > now {
        warn!(
            "{}: newest sample is {}ms ahead of now",
            series.station(),
            (last.timestamp - now).num_milliseconds()
        );
    }

    let mut working = Vec::with_capacity(series.len() + 1);
    working.extend_from_slice(series.samples());
    working.push(Sample {
        timestamp: now,
        value: last.value,
    });

    Ok(working)
}

/// Tick every `step_hours` on local wall-clock hours within the window
///
/// Ticks land where the local hour is a multiple of `step_hours`, labelled
/// `HH`. The offset is applied to the whole window, so a DST change inside
/// the window shifts the earlier ticks by an hour.
pub fn hour_ticks(window: &TimeWindow, offset: FixedOffset, step_hours: u32) -> Vec<TimeTick> {
    let mut ticks = Vec::new();
    if step_hours == 0 {
        return ticks;
    }

    let offset_secs = i64::from(offset.local_minus_utc());
    let step = i64::from(step_hours) * SECS_PER_HOUR;
    let local_start = window.start.timestamp() + offset_secs;
    let local_end = window.end.timestamp() + offset_secs;
    let end_millis = i64::from(window.end.timestamp_subsec_millis());

    let mut tick = local_start + (step - local_start.rem_euclid(step)) % step;
    while tick <= local_end {
        let hour = tick.rem_euclid(SECS_PER_DAY) / SECS_PER_HOUR;
        let mut label = String::new();
        let _ = core::fmt::write(&mut label, format_args!("{:02}", hour));

        ticks.push(TimeTick {
            x: ((tick - local_end) * 1000 - end_millis) as f32 / 1000.0,
            label,
        });
        tick += step;
    }

    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::StationId;
    use alloc::vec;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, h, m, 0).unwrap()
    }

    fn series(samples: Vec<Sample>) -> Series {
        Series::from_samples(StationId::new("s1").unwrap(), samples).unwrap()
    }

    #[test]
    fn test_window_is_exactly_24h_ending_now() {
        let now = at(12, 34);
        let window = TimeWindow::ending_at(now, 24).unwrap();
        assert_eq!(window.end, now);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 1, 1, 12, 34, 0).unwrap());
        assert_eq!(window.duration(), TimeDelta::hours(24));
        assert_eq!(window.start_offset_secs(), -86_400.0);
    }

    #[test]
    fn test_zero_hour_window_rejected() {
        assert_eq!(
            TimeWindow::ending_at(at(1, 0), 0),
            Err(SparklineError::InvalidWindow)
        );
    }

    #[test]
    fn test_extend_appends_last_value_at_now() {
        let original = series(vec![Sample::new(at(8, 0), 19.0), Sample::new(at(9, 0), 20.5)]);
        let now = at(10, 15);

        let working = extend_to_now(&original, now).unwrap();

        assert_eq!(working.len(), 3);
        assert_eq!(working[2], Sample::new(now, 20.5));
        assert_eq!(original.len(), 2);
    }

    #[test]
    fn test_extend_copies_trailing_gap() {
        let original = series(vec![Sample::new(at(8, 0), 19.0), Sample::gap(at(9, 0))]);
        let now = at(10, 0);

        let working = extend_to_now(&original, now).unwrap();

        assert_eq!(working.len(), 3);
        assert_eq!(working[2], Sample::gap(now));
    }

    #[test]
    fn test_extend_appends_even_when_sample_is_in_the_future() {
        let original = series(vec![Sample::new(at(8, 0), 19.0), Sample::new(at(11, 0), 20.0)]);
        let now = at(10, 0);

        let working = extend_to_now(&original, now).unwrap();

        assert_eq!(working.len(), 3);
        assert_eq!(working[2], Sample::new(now, 20.0));
        assert_eq!(original.len(), 2);
    }

    #[test]
    fn test_extend_empty_series_fails() {
        let empty = Series::new(StationId::new("s1").unwrap());
        assert_eq!(
            extend_to_now(&empty, at(10, 0)),
            Err(SparklineError::EmptySeries)
        );
    }

    #[test]
    fn test_hour_ticks_every_six_local_hours() {
        // 10:30 UTC is 12:30 at +02:00
        let window = TimeWindow::ending_at(at(10, 30), 24).unwrap();
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();

        let ticks = hour_ticks(&window, offset, 6);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();

        assert_eq!(labels, ["18", "00", "06", "12"]);
        // 12:00 local is half an hour before now
        assert_eq!(ticks[3].x, -1800.0);
        assert!(ticks.iter().all(|t| t.x >= -86_400.0 && t.x <= 0.0));
    }

    #[test]
    fn test_hour_tick_on_window_edges_included() {
        let window = TimeWindow::ending_at(at(12, 0), 24).unwrap();
        let ticks = hour_ticks(&window, FixedOffset::east_opt(0).unwrap(), 6);
        assert_eq!(ticks.len(), 5);
        assert_eq!(ticks[0].x, -86_400.0);
        assert_eq!(ticks[4].x, 0.0);
    }
}
