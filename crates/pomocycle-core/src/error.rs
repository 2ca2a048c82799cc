//! Core error types for pomocycle-core.
//!
//! Only `ValidationError` ever reaches callers of the session commands.
//! Snapshot and notification errors are absorbed at their adapter boundary
//! and logged; the timer keeps running on a safe default.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::Mode;

/// Core error type for pomocycle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Persisted snapshot could not be used
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Stored value could not be encoded
    #[error("Failed to encode value for '{key}': {message}")]
    Encode { key: String, message: String },

    /// Data directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors surfaced to the caller of a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Duration outside the bounds allowed for the mode.
    #[error("Invalid duration for {mode}: {minutes} minutes (allowed {min}-{max})")]
    InvalidDuration {
        mode: Mode,
        minutes: u32,
        min: u32,
        max: u32,
    },

    /// Unrecognized mode name.
    #[error("Unknown mode '{0}' (expected pomodoro, short_break or long_break)")]
    UnknownMode(String),
}

/// Reasons a persisted snapshot is rejected at load time.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Record is not valid JSON for the snapshot shape
    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Record was written by an unknown schema version
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Record decoded but breaks a state invariant
    #[error("Snapshot invariant violated: {0}")]
    InvariantViolated(String),
}

/// Failures of a notification channel. Logged, never propagated.
#[derive(Error, Debug)]
pub enum NotificationError {
    /// Platform lacks the capability or denied it
    #[error("Notification channel '{channel}' unavailable")]
    ChannelUnavailable { channel: &'static str },

    /// Backend reported a failure
    #[error("Notification channel '{channel}' failed: {message}")]
    Backend {
        channel: &'static str,
        message: String,
    },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
