//! Schedule store error types.

use std::io;
use thiserror::Error;

/// Result type for schedule store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing a schedule store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error from a file-backed store.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The schedule could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The key is not usable by this store.
    #[error("Invalid store key: {key}")]
    InvalidKey { key: String },
}

impl StoreError {
    /// Creates an invalid key error.
    pub fn invalid_key(key: impl Into<String>) -> Self {
        Self::InvalidKey { key: key.into() }
    }
}
