//! Testing utilities and mock implementations.
//!
//! Mocks for every seam the orchestrator depends on, so an ingest run can be
//! exercised without the network or the filesystem.
//!
//! # Example
//!
//! ```rust,ignore
//! use cropstat_core::testing::{fixtures, MemoryStateStore, MockArtifactStore, MockFetchClient};
//!
//! let client = MockFetchClient::new();
//! let store = MockArtifactStore::new();
//! let state = MemoryStateStore::new();
//!
//! client.set_default_records(fixtures::records(3)).await;
//!
//! // Build an IngestOrchestrator with NoDelay...
//! ```

mod counting_pacer;
mod memory_state_store;
mod mock_artifact_store;
mod mock_fetch_client;

pub use counting_pacer::CountingPacer;
pub use memory_state_store::MemoryStateStore;
pub use mock_artifact_store::MockArtifactStore;
pub use mock_fetch_client::{MockFetchClient, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::catalog::{Catalog, DatasetSpec};
    use crate::planner::{plan, Job};

    /// A single-window dataset whose commodity filter is derived from `key`.
    pub fn dataset_spec(key: &str, year_start: i32, year_end: i32) -> DatasetSpec {
        let commodity = key.split('_').next().unwrap_or(key).to_uppercase();
        let display_name = key
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        DatasetSpec::new(key, display_name, format!("{} test dataset", commodity))
            .with_param("commodity_desc", commodity)
            .with_param("agg_level_desc", "STATE")
            .with_window(year_start, year_end)
    }

    /// The corn production catalog used by the end-to-end scenario.
    pub fn corn_production_catalog() -> Catalog {
        Catalog::new(vec![dataset_spec("corn_production", 1990, 2024)])
            .expect("fixture catalog is valid")
    }

    /// `n` QuickStats-shaped records.
    pub fn records(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| {
                json!({
                    "state_name": "IOWA",
                    "year": 1990 + i as i64,
                    "commodity_desc": "CORN",
                    "statisticcat_desc": "PRODUCTION",
                    "unit_desc": "BU",
                    "Value": format!("{},000", 1000 + i),
                })
            })
            .collect()
    }

    /// The planned job with id `job_id`.
    pub fn job(catalog: &Catalog, job_id: &str) -> Job {
        plan(catalog)
            .into_iter()
            .find(|job| job.job_id() == job_id)
            .unwrap_or_else(|| panic!("no job {} in fixture catalog", job_id))
    }
}
