pub mod catalog;
pub mod client;
pub mod config;
pub mod metrics;
pub mod orchestrator;
pub mod planner;
pub mod state;
pub mod storage;
pub mod testing;

pub use catalog::{Catalog, CatalogError, DatasetSpec, YearWindow};
pub use client::{FetchClient, FetchError, QuickStatsClient, Record};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, LogFormat, SanitizedConfig, StateBackend,
};
pub use orchestrator::{
    FixedDelay, IngestError, IngestOrchestrator, JobOutcome, JobReport, NoDelay,
    OrchestratorConfig, Pacer, PlannedJob, RunSummary,
};
pub use planner::{plan, Job};
pub use state::{
    filter_pending, CompletionState, JsonStateStore, SqliteStateStore, StateError, StateStore,
    StateTracker,
};
pub use storage::{ArtifactStore, FsArtifactStore, RawArtifact, StorageError, StoredArtifact};
