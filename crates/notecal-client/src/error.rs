//! Client error types.

use std::io;
use std::path::PathBuf;

use notecal_core::StoreError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The ICS file given to `import` could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFeed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Schedule store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Output could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ClientError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
