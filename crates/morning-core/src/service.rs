//! Check-in service: the only entry point that mutates state.
//!
//! Every check-in runs evaluate-then-commit: the rule engine decides on an
//! immutable view, the store applies an accepted outcome, and the snapshot is
//! persisted immediately. `&mut self` on every mutating method makes each
//! sequence atomic with respect to other requests on the same service.

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::records::{GroupSummary, RecordStore, UserSummary};
use crate::rules::{RuleEngine, SleepDecision, WakeDecision};
use crate::storage::{ConfigChange, Feature, Persistence, RuleConfig, Setting};

pub struct MorningService<P: Persistence> {
    config: RuleConfig,
    records: RecordStore,
    persistence: P,
}

impl<P: Persistence> MorningService<P> {
    /// Load state from `persistence`.
    pub fn open(persistence: P) -> Result<Self> {
        let (records, config) = persistence.load()?;
        Ok(Self {
            config,
            records,
            persistence,
        })
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Evaluate a wake check-in and commit it when accepted.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the accepted check-in could not be saved.
    /// The check-in stays committed in memory; call [`flush`](Self::flush)
    /// to retry.
    pub fn good_morning(&mut self, gid: &str, uid: &str, now: NaiveDateTime) -> Result<WakeDecision> {
        let counters = self.records.get_group(gid).daily.clone();
        let decision = RuleEngine::new(&self.config).evaluate_wake(
            self.records.get_user(gid, uid),
            &counters,
            now,
        );

        if let Some(outcome) = decision.accepted() {
            self.records.apply_wake(gid, uid, outcome)?;
            info!(group = gid, user = uid, rank = outcome.daily_rank, "good morning accepted");
            self.flush()?;
        }
        Ok(decision)
    }

    /// Evaluate a sleep check-in and commit it when accepted.
    ///
    /// # Errors
    ///
    /// Same as [`good_morning`](Self::good_morning).
    pub fn good_night(&mut self, gid: &str, uid: &str, now: NaiveDateTime) -> Result<SleepDecision> {
        let counters = self.records.get_group(gid).daily.clone();
        let decision = RuleEngine::new(&self.config).evaluate_sleep(
            self.records.get_user(gid, uid),
            &counters,
            now,
        );

        if let Some(outcome) = decision.accepted() {
            self.records.apply_sleep(gid, uid, outcome);
            info!(group = gid, user = uid, rank = outcome.daily_rank, "good night accepted");
            self.flush()?;
        }
        Ok(decision)
    }

    /// Set a feature's boundary. Invalid input leaves config untouched.
    ///
    /// # Errors
    ///
    /// A storage error keeps the change in memory; retry with
    /// [`flush_config`](Self::flush_config).
    pub fn change_config(&mut self, feature: Feature, setting: Setting) -> Result<ConfigChange> {
        let mut next = self.config.clone();
        let change = next.change(feature, setting)?;
        self.config = next;
        info!(feature = %feature, ?setting, forced = ?change.forced_enabled, "config changed");
        self.flush_config()?;
        Ok(change)
    }

    pub fn toggle_feature(&mut self, feature: Feature, enabled: bool) -> Result<()> {
        self.config.toggle(feature, enabled);
        info!(feature = %feature, enabled, "feature toggled");
        self.flush_config()
    }

    /// Day rollover: zero every group's daily counters.
    pub fn reset_daily(&mut self) -> Result<()> {
        self.records.reset_daily();
        debug!("daily counters reset");
        self.flush()
    }

    /// Week rollover: clear weekly aggregates and sleeping kings.
    pub fn reset_weekly(&mut self) -> Result<()> {
        self.records.reset_weekly();
        debug!("weekly aggregates reset");
        self.flush()
    }

    pub fn user_summary(&self, gid: &str, uid: &str) -> Option<UserSummary> {
        self.records.user_summary(gid, uid)
    }

    pub fn group_summary(&mut self, gid: &str) -> GroupSummary {
        self.records.group_summary(gid)
    }

    /// Persist the in-memory records.
    pub fn flush(&self) -> Result<()> {
        self.persistence.save(&self.records).map_err(|e| {
            warn!(error = %e, "failed to save check-in records");
            e.into()
        })
    }

    /// Persist the in-memory rule config.
    pub fn flush_config(&self) -> Result<()> {
        self.persistence.save_config(&self.config).map_err(|e| {
            warn!(error = %e, "failed to save rule config");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_timestamp;
    use crate::error::CoreError;
    use crate::rules::Rejection;
    use crate::storage::MemoryStore;

    fn at(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn rejected_check_in_is_not_persisted() {
        let mut service = MorningService::open(MemoryStore::new()).unwrap();
        let decision = service.good_morning("g", "u", at("2024-01-02 07:00:00")).unwrap();
        assert!(matches!(
            decision.rejection(),
            Some(Rejection::NotAsleep { slept_secs: None, .. })
        ));
        assert!(service.persistence().saved_records().is_none());
        assert!(service.user_summary("g", "u").is_none());
    }

    #[test]
    fn failed_save_keeps_memory_and_can_be_retried() {
        let mut service = MorningService::open(MemoryStore::new()).unwrap();
        service.persistence().set_fail_saves(true);

        let err = service.good_night("g", "u", at("2024-01-01 23:00:00")).unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
        assert_eq!(service.user_summary("g", "u").unwrap().sleep_count, 1);

        service.persistence().set_fail_saves(false);
        service.flush().unwrap();
        let saved = service.persistence().saved_records().unwrap();
        assert_eq!(saved.get_user("g", "u").unwrap().sleep_count, 1);
    }

    #[test]
    fn failed_config_save_can_be_retried() {
        let mut service = MorningService::open(MemoryStore::new()).unwrap();
        service.persistence().set_fail_saves(true);

        let err = service
            .change_config(Feature::GoodSleep, Setting::Interval(8))
            .unwrap_err();
        assert!(matches!(err, CoreError::Storage(_)));
        assert_eq!(service.config().night.good_sleep.interval_hours, 8);
        assert!(service.toggle_feature(Feature::DeepSleep, true).is_err());

        service.persistence().set_fail_saves(false);
        service.flush_config().unwrap();
        let saved = service.persistence().saved_config().unwrap();
        assert_eq!(saved.night.good_sleep.interval_hours, 8);
        assert!(saved.night.deep_sleep.enabled);
    }

    #[test]
    fn invalid_config_change_is_not_saved() {
        let mut service = MorningService::open(MemoryStore::new()).unwrap();
        let err = service
            .change_config(Feature::GoodSleep, Setting::Interval(30))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(service.config(), &RuleConfig::default());
        assert!(service.persistence().saved_config().is_none());
    }
}
