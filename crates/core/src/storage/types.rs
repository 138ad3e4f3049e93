//! Types for stored artifacts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::planner::Job;

/// The document written for every non-empty job.
///
/// Records are passed through exactly as the remote API returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawArtifact {
    /// Dataset key.
    pub key: String,
    /// Dataset display name.
    pub name: String,
    pub description: String,
    pub year_start: i32,
    pub year_end: i32,
    /// Raw records.
    pub data: Vec<Value>,
}

impl RawArtifact {
    /// Wrap a job's fetched records.
    pub fn from_job(job: &Job, data: Vec<Value>) -> Self {
        Self {
            key: job.dataset_key.clone(),
            name: job.display_name.clone(),
            description: job.description.clone(),
            year_start: job.year_start,
            year_end: job.year_end,
            data,
        }
    }
}

/// Where and how an artifact was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArtifact {
    /// Identifier the artifact was stored under.
    pub identifier: String,
    /// Location on disk, for stores that have one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Bytes written (after compression).
    pub bytes: u64,
    /// SHA-256 of the bytes written.
    pub sha256: String,
    /// Number of records in the artifact.
    pub records: usize,
    pub compressed: bool,
}
