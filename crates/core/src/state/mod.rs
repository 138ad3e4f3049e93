//! Completion state: which jobs have already been ingested.
//!
//! State is a small JSON document per ingestion source (the namespace),
//! `{"completed": [job_id, ...]}`. It is read once at the start of a run and
//! rewritten in full after every completed job, so a crash loses at most the
//! job that was in flight.

mod json_store;
mod sqlite_store;
mod tracker;

pub use json_store::JsonStateStore;
pub use sqlite_store::SqliteStateStore;
pub use tracker::{filter_pending, CompletionState, StateTracker};

use serde_json::Value;
use thiserror::Error;

/// Errors raised by state stores and the tracker.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid state namespace: {0:?}")]
    InvalidNamespace(String),

    #[error("I/O error on state file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("state document for {namespace} is corrupt: {message}")]
    Corrupt { namespace: String, message: String },

    #[error("failed to serialize state: {0}")]
    Serialization(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Durable key/value persistence for state documents.
///
/// `save` replaces the whole document and must be atomic: after a crash the
/// store holds either the previous document or the new one.
pub trait StateStore: Send + Sync {
    /// Load the document for `namespace`, or `None` if nothing was saved yet.
    fn load(&self, namespace: &str) -> Result<Option<Value>, StateError>;

    /// Replace the document for `namespace`.
    fn save(&self, namespace: &str, document: &Value) -> Result<(), StateError>;
}

pub(crate) fn validate_namespace(namespace: &str) -> Result<(), StateError> {
    let valid = !namespace.is_empty()
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StateError::InvalidNamespace(namespace.to_string()))
    }
}
