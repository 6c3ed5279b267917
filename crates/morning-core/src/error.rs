//! Core error types for morning-core.
//!
//! Rule rejections are not errors: they travel inside a decision value
//! (see [`crate::rules::Rejection`]). The types here cover malformed input,
//! persistence failures and misuse of the record store.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for morning-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration input rejected before any state change
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Persistence collaborator failed; in-memory state is still authoritative
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// An accepted wake was applied to a user the store has never seen
    #[error("No check-in record for user '{user}' in group '{group}'")]
    MissingRecord { group: String, user: String },
}

/// Validation errors for configuration changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Hour bound or interval outside 0..=24
    #[error("{field} must be between 0 and 24 (got {value})")]
    HourOutOfRange { field: &'static str, value: i64 },

    /// A window was given for an interval feature or vice versa
    #[error("Feature '{feature}' expects {expected}")]
    SettingMismatch {
        feature: &'static str,
        expected: &'static str,
    },

    /// Feature name not recognised
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read/write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse records JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse config TOML: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to serialize config TOML: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
