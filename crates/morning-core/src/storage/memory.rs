//! In-process persistence, for tests and embedders that persist elsewhere.

use std::sync::{Mutex, MutexGuard};

use super::{Persistence, RuleConfig};
use crate::error::StorageError;
use crate::records::RecordStore;

#[derive(Debug, Default)]
struct Snapshot {
    records: Option<RecordStore>,
    config: Option<RuleConfig>,
    fail_saves: bool,
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    pub fn saved_records(&self) -> Option<RecordStore> {
        self.lock().records.clone()
    }

    pub fn saved_config(&self) -> Option<RuleConfig> {
        self.lock().config.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(snapshot: &Snapshot) -> Result<(), StorageError> {
        if snapshot.fail_saves {
            Err(StorageError::DataDir("memory store is read-only".into()))
        } else {
            Ok(())
        }
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> Result<(RecordStore, RuleConfig), StorageError> {
        let snapshot = self.lock();
        Ok((
            snapshot.records.clone().unwrap_or_default(),
            snapshot.config.clone().unwrap_or_default(),
        ))
    }

    fn save(&self, records: &RecordStore) -> Result<(), StorageError> {
        let mut snapshot = self.lock();
        Self::check_writable(&snapshot)?;
        snapshot.records = Some(records.clone());
        Ok(())
    }

    fn save_config(&self, config: &RuleConfig) -> Result<(), StorageError> {
        let mut snapshot = self.lock();
        Self::check_writable(&snapshot)?;
        snapshot.config = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_saves_leave_previous_snapshot() {
        let store = MemoryStore::new();
        store.save(&RecordStore::default()).unwrap();
        store.set_fail_saves(true);
        assert!(store.save_config(&RuleConfig::default()).is_err());
        assert!(store.saved_config().is_none());
        assert_eq!(store.saved_records(), Some(RecordStore::default()));
    }
}
