//! Rule engine for wake and sleep check-ins.
//!
//! Evaluation is pure: the engine reads the user's record, the group's daily
//! counters and `now`, and returns a [`Decision`]. Nothing is written until
//! the caller applies an accepted outcome to the [`RecordStore`].
//!
//! [`RecordStore`]: crate::records::RecordStore

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::window::{
    in_morning_window, in_night_window, is_earlier_in_day, is_later_bedtime, within_interval,
    Elapsed,
};
use crate::records::{GroupDailyCounters, UserRecord};
use crate::storage::RuleConfig;

/// Longest sleep after which a wake is still accepted.
const MAX_SLEEP_HOURS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckinKind {
    Wake,
    Sleep,
}

/// Why a check-in was refused. Carries the bound and the observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Rejection {
    OutsideTimeWindow {
        check_in: CheckinKind,
        early_hour: u32,
        late_hour: u32,
        hour: u32,
    },
    /// No sleep on record (`slept_secs` is `None`), or the last one is
    /// more than `max_hours` old.
    NotAsleep {
        max_hours: u32,
        slept_secs: Option<i64>,
    },
    TooSoonAfterLastWake {
        interval_hours: u32,
        elapsed_secs: i64,
    },
    SleepTooShort {
        interval_hours: u32,
        slept_secs: i64,
    },
    TooSoonAfterLastSleep {
        interval_hours: u32,
        elapsed_secs: i64,
    },
    AwakeTooShort {
        interval_hours: u32,
        awake_secs: i64,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::OutsideTimeWindow {
                check_in: CheckinKind::Wake,
                early_hour,
                late_hour,
                hour,
            } => write!(
                f,
                "wake allowed from {early_hour}:00 to {late_hour}:00 (now {hour}:xx)"
            ),
            Rejection::OutsideTimeWindow {
                check_in: CheckinKind::Sleep,
                early_hour,
                late_hour,
                hour,
            } => write!(
                f,
                "sleep allowed from {early_hour}:00 to {late_hour}:00 next day (now {hour}:xx)"
            ),
            Rejection::NotAsleep {
                max_hours,
                slept_secs: None,
            } => write!(f, "no sleep recorded (must wake within {max_hours}h of sleeping)"),
            Rejection::NotAsleep {
                max_hours,
                slept_secs: Some(slept_secs),
            } => write!(
                f,
                "last sleep was {slept_secs}s ago (must wake within {max_hours}h)"
            ),
            Rejection::TooSoonAfterLastWake {
                interval_hours,
                elapsed_secs,
            } => write!(
                f,
                "already woke up {elapsed_secs}s ago (minimum gap {interval_hours}h)"
            ),
            Rejection::SleepTooShort {
                interval_hours,
                slept_secs,
            } => write!(
                f,
                "slept only {slept_secs}s (minimum {interval_hours}h)"
            ),
            Rejection::TooSoonAfterLastSleep {
                interval_hours,
                elapsed_secs,
            } => write!(
                f,
                "already went to sleep {elapsed_secs}s ago (minimum gap {interval_hours}h)"
            ),
            Rejection::AwakeTooShort {
                interval_hours,
                awake_secs,
            } => write!(
                f,
                "awake only {awake_secs}s (minimum {interval_hours}h)"
            ),
        }
    }
}

/// Record fields produced by an accepted wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeOutcome {
    pub woke_at: NaiveDateTime,
    pub wake_count: u32,
    pub weekly_wake_count: u32,
    pub earliest_wake: NaiveDateTime,
    /// Time since the last sleep.
    pub slept: Elapsed,
    /// Position among today's wakes in the group.
    pub daily_rank: u32,
}

/// Record fields produced by an accepted sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepOutcome {
    pub slept_at: NaiveDateTime,
    pub sleep_count: u32,
    pub weekly_sleep_count: u32,
    pub latest_sleep: NaiveDateTime,
    /// The user had no record before this sleep.
    pub first_record: bool,
    /// Time since the last wake, if the user ever woke.
    pub awake: Option<Elapsed>,
    /// Position among today's sleeps in the group.
    pub daily_rank: u32,
}

/// Result of evaluating a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "detail")]
pub enum Decision<T> {
    Accept(T),
    Reject(Rejection),
}

pub type WakeDecision = Decision<WakeOutcome>;
pub type SleepDecision = Decision<SleepOutcome>;

impl<T> Decision<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accept(_))
    }

    pub fn accepted(&self) -> Option<&T> {
        match self {
            Decision::Accept(outcome) => Some(outcome),
            Decision::Reject(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Decision::Accept(_) => None,
            Decision::Reject(rejection) => Some(*rejection),
        }
    }
}

/// Evaluates check-ins against a rule configuration.
pub struct RuleEngine<'a> {
    config: &'a RuleConfig,
}

impl<'a> RuleEngine<'a> {
    pub fn new(config: &'a RuleConfig) -> Self {
        Self { config }
    }

    /// Decide whether the user may wake up at `now`.
    pub fn evaluate_wake(
        &self,
        record: Option<&UserRecord>,
        counters: &GroupDailyCounters,
        now: NaiveDateTime,
    ) -> WakeDecision {
        let rules = &self.config.morning;

        let window = &rules.good_morning_intime;
        if window.enabled && !in_morning_window(window, now) {
            return reject(Rejection::OutsideTimeWindow {
                check_in: CheckinKind::Wake,
                early_hour: window.early_hour,
                late_hour: window.late_hour,
                hour: now.hour(),
            });
        }

        let Some((record, last_sleep)) =
            record.and_then(|r| r.last_sleep.map(|sleep| (r, sleep)))
        else {
            return reject(Rejection::NotAsleep {
                max_hours: MAX_SLEEP_HOURS,
                slept_secs: None,
            });
        };
        if now - last_sleep > Duration::hours(i64::from(MAX_SLEEP_HOURS)) {
            return reject(Rejection::NotAsleep {
                max_hours: MAX_SLEEP_HOURS,
                slept_secs: Some((now - last_sleep).num_seconds()),
            });
        }

        let multi = &rules.multi_get_up;
        if !multi.enabled {
            if let Some(last_wake) = record.last_wake {
                if within_interval(last_wake, now, multi.interval_hours) {
                    return reject(Rejection::TooSoonAfterLastWake {
                        interval_hours: multi.interval_hours,
                        elapsed_secs: (now - last_wake).num_seconds(),
                    });
                }
            }
        }

        let super_get_up = &rules.super_get_up;
        if !super_get_up.enabled && within_interval(last_sleep, now, super_get_up.interval_hours) {
            return reject(Rejection::SleepTooShort {
                interval_hours: super_get_up.interval_hours,
                slept_secs: (now - last_sleep).num_seconds(),
            });
        }

        let earliest_wake = match record.weekly.earliest_wake {
            Some(earliest) if !is_earlier_in_day(now, earliest) => earliest,
            _ => now,
        };

        Decision::Accept(WakeOutcome {
            woke_at: now,
            wake_count: record.wake_count + 1,
            weekly_wake_count: record.weekly.wake_count + 1,
            earliest_wake,
            slept: Elapsed::between(last_sleep, now),
            daily_rank: counters.wake_count + 1,
        })
    }

    /// Decide whether the user may go to sleep at `now`.
    pub fn evaluate_sleep(
        &self,
        record: Option<&UserRecord>,
        counters: &GroupDailyCounters,
        now: NaiveDateTime,
    ) -> SleepDecision {
        let rules = &self.config.night;

        let window = &rules.good_night_intime;
        if window.enabled && !in_night_window(window, now) {
            return reject(Rejection::OutsideTimeWindow {
                check_in: CheckinKind::Sleep,
                early_hour: window.early_hour,
                late_hour: window.late_hour,
                hour: now.hour(),
            });
        }

        if let Some(record) = record {
            let good_sleep = &rules.good_sleep;
            if good_sleep.enabled {
                if let Some(last_sleep) = record.last_sleep {
                    if within_interval(last_sleep, now, good_sleep.interval_hours) {
                        return reject(Rejection::TooSoonAfterLastSleep {
                            interval_hours: good_sleep.interval_hours,
                            elapsed_secs: (now - last_sleep).num_seconds(),
                        });
                    }
                }
            }

            let deep_sleep = &rules.deep_sleep;
            if !deep_sleep.enabled {
                if let Some(last_wake) = record.last_wake {
                    if within_interval(last_wake, now, deep_sleep.interval_hours) {
                        return reject(Rejection::AwakeTooShort {
                            interval_hours: deep_sleep.interval_hours,
                            awake_secs: (now - last_wake).num_seconds(),
                        });
                    }
                }
            }
        }

        let latest_sleep = match record.and_then(|r| r.weekly.latest_sleep) {
            Some(latest) if !is_later_bedtime(now, latest) => latest,
            _ => now,
        };

        Decision::Accept(SleepOutcome {
            slept_at: now,
            sleep_count: record.map_or(0, |r| r.sleep_count) + 1,
            weekly_sleep_count: record.map_or(0, |r| r.weekly.sleep_count) + 1,
            latest_sleep,
            first_record: record.is_none(),
            awake: record
                .and_then(|r| r.last_wake)
                .map(|last_wake| Elapsed::between(last_wake, now)),
            daily_rank: counters.sleep_count + 1,
        })
    }
}

fn reject<T>(rejection: Rejection) -> Decision<T> {
    debug!(?rejection, "check-in rejected");
    Decision::Reject(rejection)
}
