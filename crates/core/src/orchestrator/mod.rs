//! Ingest orchestrator.
//!
//! Turns a catalog into a resumable run:
//! - **Planning**: expand the catalog into jobs, drop the completed ones
//! - **Running**: fetch, store and mark each pending job in order
//! - **Done** or **Aborted**: the first failure ends the run, state stays as
//!   of the last completed job

mod config;
mod pacing;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use pacing::{FixedDelay, NoDelay, Pacer};
pub use runner::{IngestOrchestrator, ProgressCallback};
pub use types::{IngestError, JobOutcome, JobReport, PlannedJob, RunSummary};
