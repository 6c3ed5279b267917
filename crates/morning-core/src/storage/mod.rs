mod config;
pub mod file;
pub mod memory;

pub use config::{
    validate_hour, ConfigChange, Feature, IntervalRule, MorningRules, NightRules, RuleConfig,
    Setting, TimeWindow,
};
pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StorageError;
use crate::records::RecordStore;

/// Snapshot persistence for records and configuration.
///
/// Each call is all-or-nothing. Callers save right after a successful
/// in-memory mutation; a failed save leaves memory authoritative and may be
/// retried without re-evaluating.
pub trait Persistence {
    /// Load records and configuration; missing data yields defaults.
    fn load(&self) -> Result<(RecordStore, RuleConfig), StorageError>;

    fn save(&self, records: &RecordStore) -> Result<(), StorageError>;

    fn save_config(&self, config: &RuleConfig) -> Result<(), StorageError>;
}

/// Returns the data directory.
///
/// `MORNING_DATA_DIR` wins when set; otherwise `~/.config/morning[-dev]/`
/// based on MORNING_ENV (set MORNING_ENV=dev for the development directory).
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("MORNING_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MORNING_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("morning-dev")
            } else {
                base_dir.join("morning")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
