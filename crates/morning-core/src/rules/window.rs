//! Clock-hour windows, interval checks and elapsed-time formatting.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::storage::TimeWindow;

const SECS_PER_DAY: i64 = 24 * 3600;

/// Morning window: `early_hour <= hour < late_hour`.
pub fn in_morning_window(window: &TimeWindow, now: NaiveDateTime) -> bool {
    let hour = now.hour();
    window.early_hour <= hour && hour < window.late_hour
}

/// Night window spanning midnight: `[early_hour, 24) ∪ [0, late_hour)`.
pub fn in_night_window(window: &TimeWindow, now: NaiveDateTime) -> bool {
    let hour = now.hour();
    hour >= window.early_hour || hour < window.late_hour
}

/// True when `last` lies less than `hours` before `now`.
///
/// A `last` in the future counts as within any interval.
pub fn within_interval(last: NaiveDateTime, now: NaiveDateTime, hours: u32) -> bool {
    now - last < Duration::hours(i64::from(hours))
}

/// Hours, minutes and seconds of an elapsed time shorter than a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSpan {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl ClockSpan {
    pub fn as_seconds(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for ClockSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}时{}分{}秒", self.hours, self.minutes, self.seconds)
    }
}

/// Time between two check-ins.
///
/// Anything outside `[0, 24h)` collapses to `MultiDay` and carries no
/// duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Elapsed {
    Span(ClockSpan),
    MultiDay,
}

impl Elapsed {
    pub fn between(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        let secs = (to - from).num_seconds();
        if !(0..SECS_PER_DAY).contains(&secs) {
            return Elapsed::MultiDay;
        }
        let secs = secs as u32;
        Elapsed::Span(ClockSpan {
            hours: secs / 3600,
            minutes: secs % 3600 / 60,
            seconds: secs % 60,
        })
    }

    pub fn span(&self) -> Option<ClockSpan> {
        match self {
            Elapsed::Span(span) => Some(*span),
            Elapsed::MultiDay => None,
        }
    }
}

/// Seconds since noon, so that early-morning times rank after the evening.
fn night_offset(t: NaiveTime) -> u32 {
    (t.num_seconds_from_midnight() + 12 * 3600) % (24 * 3600)
}

/// Whether `candidate` is a later bedtime than `current`.
pub fn is_later_bedtime(candidate: NaiveDateTime, current: NaiveDateTime) -> bool {
    night_offset(candidate.time()) > night_offset(current.time())
}

/// Whether `candidate` is an earlier time of day than `current`.
pub fn is_earlier_in_day(candidate: NaiveDateTime, current: NaiveDateTime) -> bool {
    candidate.time() < current.time()
}
