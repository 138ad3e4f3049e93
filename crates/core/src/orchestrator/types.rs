//! Types for the ingest orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::YearWindow;
use crate::client::FetchError;
use crate::state::StateError;
use crate::storage::{StorageError, StoredArtifact};

/// Errors that end an ingest run.
///
/// Every variant leaves the completion state as of the last job that
/// succeeded, so the next run picks up at the failed job.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Completion state could not be loaded.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// The remote fetch for a job failed.
    #[error("ingest aborted at {job_id}: {source}")]
    Aborted {
        job_id: String,
        #[source]
        source: FetchError,
    },

    /// The job's artifact could not be stored; the job was not marked.
    #[error("failed to store artifact for {job_id}: {source}")]
    Storage {
        job_id: String,
        #[source]
        source: StorageError,
    },

    /// The artifact was stored but the completion mark was not persisted.
    #[error("failed to persist completion of {job_id}: {source}")]
    Persist {
        job_id: String,
        #[source]
        source: StateError,
    },
}

impl IngestError {
    /// Job the run stopped at, if it got that far.
    pub fn job_id(&self) -> Option<&str> {
        match self {
            IngestError::State(_) => None,
            IngestError::Aborted { job_id, .. }
            | IngestError::Storage { job_id, .. }
            | IngestError::Persist { job_id, .. } => Some(job_id),
        }
    }
}

/// How a single job ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobOutcome {
    /// Records were fetched and written.
    Stored { artifact: StoredArtifact },
    /// The API had no data for the window; nothing was written.
    Empty,
}

impl JobOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            JobOutcome::Stored { .. } => "stored",
            JobOutcome::Empty => "empty",
        }
    }
}

/// Progress report for one completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    /// 1-based position among this run's pending jobs.
    pub index: usize,
    pub total: usize,
    pub job_id: String,
    pub display_name: String,
    pub window: YearWindow,
    pub records: usize,
    pub outcome: JobOutcome,
    pub duration_ms: u64,
}

/// A planned job and whether an earlier run already completed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedJob {
    pub job_id: String,
    pub display_name: String,
    pub window: YearWindow,
    pub completed: bool,
}

/// Totals for one ingest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub source_name: String,
    /// Jobs in the full plan.
    pub planned: usize,
    /// Jobs skipped because an earlier run completed them.
    pub already_complete: usize,
    /// Jobs this run set out to process.
    pub pending: usize,
    /// Jobs this run completed.
    pub completed: usize,
    pub records: usize,
    pub artifacts: usize,
    pub empty: usize,
    pub bytes_written: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub(crate) fn start(source_name: &str, planned: usize, pending: usize) -> Self {
        let now = Utc::now();
        Self {
            source_name: source_name.to_string(),
            planned,
            already_complete: planned - pending,
            pending,
            completed: 0,
            records: 0,
            artifacts: 0,
            empty: 0,
            bytes_written: 0,
            started_at: now,
            finished_at: now,
        }
    }

    pub(crate) fn record(&mut self, report: &JobReport) {
        self.completed += 1;
        self.records += report.records;
        match &report.outcome {
            JobOutcome::Stored { artifact } => {
                self.artifacts += 1;
                self.bytes_written += artifact.bytes;
            }
            JobOutcome::Empty => self.empty += 1,
        }
    }

    /// True when every planned job was already complete.
    pub fn nothing_to_do(&self) -> bool {
        self.pending == 0
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
