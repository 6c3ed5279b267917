//! Time source for check-ins.
//!
//! The rule engine never reads the wall clock itself; callers pass `now`
//! explicitly. Timestamps are local, timezone-free clock readings because
//! every rule is phrased in terms of the local clock hour.

use chrono::{Local, NaiveDateTime};

/// Format used for parsing and displaying check-in timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Supplies the current local time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn fixed_clock_returns_its_instant() {
        let at = parse_timestamp("2024-03-01 07:30:00").unwrap();
        assert_eq!(FixedClock(at).now(), at);
    }

    #[test]
    fn parse_timestamp_accepts_padded_input() {
        let at = parse_timestamp(" 2024-03-01 23:05:09 ").unwrap();
        assert_eq!(at.day(), 1);
        assert_eq!(at.hour(), 23);
        assert_eq!(at.second(), 9);
    }

    #[test]
    fn parse_timestamp_rejects_date_only() {
        assert!(parse_timestamp("2024-03-01").is_err());
    }
}
