//! Core error types for zerohour-core.
//!
//! One top-level [`CoreError`] wraps the per-concern error enums so that
//! callers can `?` across module boundaries without juggling types.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for zerohour-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Draft rejected at the validation boundary.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Persistent store errors
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejections produced when validating an event draft.
///
/// A rejected draft is a no-op: nothing is mutated, nothing is persisted.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Name is empty (or whitespace only) after trimming.
    #[error("event name must not be empty")]
    EmptyName,

    /// Date string did not parse.
    #[error("invalid date '{input}': expected {expected}")]
    InvalidDate {
        input: String,
        expected: &'static str,
    },
}

/// Persistent-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store database file.
    #[error("failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A slot value could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Store database is locked by another process.
    #[error("store is locked")]
    Locked,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load the configuration file.
    #[error("failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save the configuration file.
    #[error("failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not name a known configuration entry.
    #[error("unknown configuration key: {0}")]
    UnknownKey(String),

    /// Value cannot be parsed for the given key.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
