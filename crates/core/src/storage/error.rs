//! Error types for the storage module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting raw artifacts.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Identifier would escape the storage root or is empty.
    #[error("Invalid artifact identifier: {0:?}")]
    InvalidIdentifier(String),

    /// Payload could not be serialized.
    #[error("Failed to serialize artifact: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Compression or decompression failed.
    #[error("Compression failed for {path}")]
    Compression {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or reading the artifact file failed.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact not found.
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// The blocking write task panicked or was cancelled.
    #[error("Storage task failed: {0}")]
    Task(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
