//! File-backed persistence.
//!
//! Records live in `morning.json` (pretty JSON), rules in `config.toml`.
//! Each write goes to a sibling temp file which is then renamed over the
//! target, so readers see either the old or the new snapshot.

use std::path::{Path, PathBuf};
use tracing::debug;

use super::{data_dir, Persistence, RuleConfig};
use crate::error::StorageError;
use crate::records::RecordStore;

const RECORDS_FILE: &str = "morning.json";
const CONFIG_FILE: &str = "config.toml";

/// Stores records and configuration in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store in the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self { dir: data_dir()? })
    }

    /// Open the store in `dir`, creating it if needed.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn records_path(&self) -> PathBuf {
        self.dir.join(RECORDS_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    fn write_atomic(path: &Path, content: &str) -> Result<(), StorageError> {
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, content).map_err(|e| StorageError::io(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| StorageError::io(path, e))?;
        Ok(())
    }
}

impl Persistence for FileStore {
    fn load(&self) -> Result<(RecordStore, RuleConfig), StorageError> {
        let records = match Self::read_optional(&self.records_path())? {
            Some(content) if !content.trim().is_empty() => serde_json::from_str(&content)?,
            _ => RecordStore::default(),
        };
        let config = match Self::read_optional(&self.config_path())? {
            Some(content) => toml::from_str(&content)?,
            None => RuleConfig::default(),
        };
        debug!(dir = %self.dir.display(), "loaded check-in data");
        Ok((records, config))
    }

    fn save(&self, records: &RecordStore) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(records)?;
        Self::write_atomic(&self.records_path(), &content)
    }

    fn save_config(&self, config: &RuleConfig) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(config)?;
        Self::write_atomic(&self.config_path(), &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Feature;
    use tempfile::TempDir;

    #[test]
    fn empty_directory_loads_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::with_dir(temp_dir.path()).unwrap();
        let (records, config) = store.load().unwrap();
        assert_eq!(records, RecordStore::default());
        assert_eq!(config, RuleConfig::default());
    }

    #[test]
    fn config_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::with_dir(temp_dir.path()).unwrap();
        let mut config = RuleConfig::default();
        config.toggle(Feature::DeepSleep, true);
        store.save_config(&config).unwrap();

        let (_, loaded) = store.load().unwrap();
        assert_eq!(loaded, config);
        assert!(!store.config_path().with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_records_surface_as_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::with_dir(temp_dir.path()).unwrap();
        std::fs::write(store.records_path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(StorageError::Json(_))));
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::with_dir(temp_dir.path().join("data")).unwrap();
        std::fs::remove_dir_all(store.dir()).unwrap();
        assert!(matches!(
            store.save(&RecordStore::default()),
            Err(StorageError::Io { .. })
        ));
    }
}
