//! Error types for kvlite
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for kvlite operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // Open Errors
    // -------------------------------------------------------------------------
    #[error("storage unavailable at '{path}': {reason}")]
    StorageUnavailable { path: String, reason: String },

    #[error("invalid table name '{0}': must be a bare SQL identifier")]
    InvalidTableName(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("failed to encode value: {0}")]
    Encode(String),

    #[error("failed to decode value for key '{key}': {reason}")]
    Decode { key: String, reason: String },

    // -------------------------------------------------------------------------
    // Engine Errors
    // -------------------------------------------------------------------------
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("database error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for KvError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let reason = message
                    .clone()
                    .unwrap_or_else(|| code.to_string());
                KvError::ConstraintViolation(reason)
            }
            _ => KvError::Sqlite(err),
        }
    }
}
