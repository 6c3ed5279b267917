//! Per-group, per-user check-in records.
//!
//! [`RecordStore`] is the only owner of check-in state. It is mutated solely
//! by applying outcomes the rule engine has already accepted, plus the
//! daily and weekly rollover resets.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::rules::{ClockSpan, SleepOutcome, WakeOutcome};

/// Aggregates cleared by the weekly rollover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub wake_count: u32,
    pub sleep_count: u32,
    /// One entry per wake whose preceding sleep was shorter than a day.
    pub sleep_durations: Vec<ClockSpan>,
    pub latest_sleep: Option<NaiveDateTime>,
    pub earliest_wake: Option<NaiveDateTime>,
}

/// Check-in history of one user in one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub last_wake: Option<NaiveDateTime>,
    pub last_sleep: Option<NaiveDateTime>,
    pub wake_count: u32,
    pub sleep_count: u32,
    #[serde(default)]
    pub weekly: WeeklyStats,
}

/// The user with the shortest single sleep of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepingKing {
    pub user_id: String,
    pub slept: ClockSpan,
}

/// Group-level counters. Wake/sleep counts are cleared daily; the sleeping
/// king weekly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDailyCounters {
    pub wake_count: u32,
    pub sleep_count: u32,
    #[serde(default)]
    pub sleeping_king: Option<SleepingKing>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupData {
    pub daily: GroupDailyCounters,
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
}

/// Read-only view of a user's routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub last_wake: Option<NaiveDateTime>,
    pub last_sleep: Option<NaiveDateTime>,
    pub wake_count: u32,
    pub sleep_count: u32,
    pub weekly: WeeklyStats,
}

impl From<&UserRecord> for UserSummary {
    fn from(record: &UserRecord) -> Self {
        Self {
            last_wake: record.last_wake,
            last_sleep: record.last_sleep,
            wake_count: record.wake_count,
            sleep_count: record.sleep_count,
            weekly: record.weekly.clone(),
        }
    }
}

/// Read-only view of a group's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub wake_today: u32,
    pub sleep_today: u32,
    pub sleeping_king: Option<SleepingKing>,
    pub members: usize,
}

/// All groups known to this process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    groups: BTreeMap<String, GroupData>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a group, creating an empty one on first access.
    pub fn get_group(&mut self, gid: &str) -> &GroupData {
        self.group_mut(gid)
    }

    fn group_mut(&mut self, gid: &str) -> &mut GroupData {
        if !self.groups.contains_key(gid) {
            debug!(group = gid, "creating group record");
        }
        self.groups.entry(gid.to_string()).or_default()
    }

    /// Look up a group without creating it.
    pub fn group(&self, gid: &str) -> Option<&GroupData> {
        self.groups.get(gid)
    }

    /// Look up a user's record; `None` means the user never checked in.
    pub fn get_user(&self, gid: &str, uid: &str) -> Option<&UserRecord> {
        self.groups.get(gid)?.users.get(uid)
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Commit an accepted wake.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingRecord`] if the user has no record; an
    /// accepted wake always follows a recorded sleep.
    pub fn apply_wake(&mut self, gid: &str, uid: &str, outcome: &WakeOutcome) -> Result<()> {
        let GroupData { daily, users } = self.group_mut(gid);
        let record = users.get_mut(uid).ok_or_else(|| CoreError::MissingRecord {
            group: gid.to_string(),
            user: uid.to_string(),
        })?;

        record.last_wake = Some(outcome.woke_at);
        record.wake_count = outcome.wake_count;
        record.weekly.wake_count = outcome.weekly_wake_count;
        record.weekly.earliest_wake = Some(outcome.earliest_wake);
        daily.wake_count = outcome.daily_rank;

        if let Some(span) = outcome.slept.span() {
            record.weekly.sleep_durations.push(span);
            let crowned = daily
                .sleeping_king
                .as_ref()
                .map_or(true, |king| span.as_seconds() < king.slept.as_seconds());
            if crowned {
                daily.sleeping_king = Some(SleepingKing {
                    user_id: uid.to_string(),
                    slept: span,
                });
            }
        }
        Ok(())
    }

    /// Commit an accepted sleep, creating the user's record if needed.
    pub fn apply_sleep(&mut self, gid: &str, uid: &str, outcome: &SleepOutcome) {
        let GroupData { daily, users } = self.group_mut(gid);
        let record = users.entry(uid.to_string()).or_default();

        record.last_sleep = Some(outcome.slept_at);
        record.sleep_count = outcome.sleep_count;
        record.weekly.sleep_count = outcome.weekly_sleep_count;
        record.weekly.latest_sleep = Some(outcome.latest_sleep);
        daily.sleep_count = outcome.daily_rank;
    }

    /// Zero every group's daily wake and sleep counters.
    pub fn reset_daily(&mut self) {
        for group in self.groups.values_mut() {
            group.daily.wake_count = 0;
            group.daily.sleep_count = 0;
        }
    }

    /// Clear weekly aggregates and the sleeping king in every group.
    pub fn reset_weekly(&mut self) {
        for group in self.groups.values_mut() {
            group.daily.sleeping_king = None;
            for record in group.users.values_mut() {
                record.weekly = WeeklyStats::default();
            }
        }
    }

    pub fn user_summary(&self, gid: &str, uid: &str) -> Option<UserSummary> {
        self.get_user(gid, uid).map(UserSummary::from)
    }

    pub fn group_summary(&mut self, gid: &str) -> GroupSummary {
        let group = self.get_group(gid);
        GroupSummary {
            wake_today: group.daily.wake_count,
            sleep_today: group.daily.sleep_count,
            sleeping_king: group.daily.sleeping_king.clone(),
            members: group.users.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_timestamp;
    use crate::rules::Elapsed;

    fn at(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn sleep_outcome(slept_at: &str, count: u32, rank: u32) -> SleepOutcome {
        SleepOutcome {
            slept_at: at(slept_at),
            sleep_count: count,
            weekly_sleep_count: count,
            latest_sleep: at(slept_at),
            first_record: count == 1,
            awake: None,
            daily_rank: rank,
        }
    }

    fn wake_outcome(woke_at: &str, slept: Elapsed, rank: u32) -> WakeOutcome {
        WakeOutcome {
            woke_at: at(woke_at),
            wake_count: 1,
            weekly_wake_count: 1,
            earliest_wake: at(woke_at),
            slept,
            daily_rank: rank,
        }
    }

    fn span(hours: u32) -> Elapsed {
        Elapsed::Span(ClockSpan {
            hours,
            minutes: 0,
            seconds: 0,
        })
    }

    #[test]
    fn get_group_creates_once_and_is_idempotent() {
        let mut store = RecordStore::new();
        assert!(store.group("g").is_none());
        let first = store.get_group("g").clone();
        let second = store.get_group("g").clone();
        assert_eq!(first, second);
        assert_eq!(first.daily, GroupDailyCounters::default());
        assert_eq!(store.group_ids().collect::<Vec<_>>(), vec!["g"]);
    }

    #[test]
    fn get_user_never_mutates() {
        let mut store = RecordStore::new();
        store.apply_sleep("g", "u", &sleep_outcome("2024-01-01 23:00:00", 1, 1));
        let snapshot = store.clone();
        for _ in 0..3 {
            assert!(store.get_user("g", "u").is_some());
            assert!(store.get_user("g", "nobody").is_none());
            assert!(store.get_user("other", "u").is_none());
        }
        assert_eq!(store, snapshot);
    }

    #[test]
    fn apply_wake_without_record_fails() {
        let mut store = RecordStore::new();
        let err = store
            .apply_wake("g", "u", &wake_outcome("2024-01-02 07:00:00", span(8), 1))
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingRecord { .. }));
    }

    #[test]
    fn apply_wake_records_duration_and_crowns_shortest_sleeper() {
        let mut store = RecordStore::new();
        store.apply_sleep("g", "a", &sleep_outcome("2024-01-01 23:00:00", 1, 1));
        store.apply_sleep("g", "b", &sleep_outcome("2024-01-01 23:30:00", 1, 2));

        store
            .apply_wake("g", "a", &wake_outcome("2024-01-02 07:00:00", span(8), 1))
            .unwrap();
        store
            .apply_wake("g", "b", &wake_outcome("2024-01-02 04:30:00", span(5), 2))
            .unwrap();

        let group = store.group("g").unwrap();
        assert_eq!(group.daily.wake_count, 2);
        let king = group.daily.sleeping_king.as_ref().unwrap();
        assert_eq!(king.user_id, "b");
        assert_eq!(king.slept.hours, 5);
        assert_eq!(group.users["a"].weekly.sleep_durations.len(), 1);
    }

    #[test]
    fn multi_day_wake_records_no_duration() {
        let mut store = RecordStore::new();
        store.apply_sleep("g", "a", &sleep_outcome("2024-01-01 23:00:00", 1, 1));
        store
            .apply_wake("g", "a", &wake_outcome("2024-01-02 23:00:00", Elapsed::MultiDay, 1))
            .unwrap();
        let group = store.group("g").unwrap();
        assert!(group.users["a"].weekly.sleep_durations.is_empty());
        assert!(group.daily.sleeping_king.is_none());
    }

    #[test]
    fn reset_daily_keeps_lifetime_and_weekly() {
        let mut store = RecordStore::new();
        store.apply_sleep("g1", "a", &sleep_outcome("2024-01-01 23:00:00", 3, 1));
        store.apply_sleep("g2", "b", &sleep_outcome("2024-01-01 23:00:00", 1, 4));
        store
            .apply_wake("g1", "a", &wake_outcome("2024-01-02 07:00:00", span(8), 1))
            .unwrap();

        let before = store.get_user("g1", "a").cloned().unwrap();
        store.reset_daily();

        for gid in ["g1", "g2"] {
            let daily = &store.group(gid).unwrap().daily;
            assert_eq!(daily.wake_count, 0);
            assert_eq!(daily.sleep_count, 0);
        }
        assert_eq!(store.get_user("g1", "a"), Some(&before));
        assert!(store.group("g1").unwrap().daily.sleeping_king.is_some());
    }

    #[test]
    fn reset_weekly_clears_weekly_only() {
        let mut store = RecordStore::new();
        store.apply_sleep("g", "a", &sleep_outcome("2024-01-01 23:00:00", 2, 1));
        store
            .apply_wake("g", "a", &wake_outcome("2024-01-02 07:00:00", span(8), 1))
            .unwrap();
        store.reset_weekly();

        let record = store.get_user("g", "a").unwrap();
        assert_eq!(record.weekly, WeeklyStats::default());
        assert_eq!(record.sleep_count, 2);
        assert_eq!(record.wake_count, 1);
        assert!(store.group("g").unwrap().daily.sleeping_king.is_none());
    }

    #[test]
    fn store_json_roundtrip() {
        let mut store = RecordStore::new();
        store.apply_sleep("g", "a", &sleep_outcome("2024-01-01 23:00:00", 1, 1));
        store
            .apply_wake("g", "a", &wake_outcome("2024-01-02 07:00:00", span(8), 1))
            .unwrap();
        let json = serde_json::to_string_pretty(&store).unwrap();
        let parsed: RecordStore = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, store);
    }
}
