//! Job planning: expand a catalog into individually fetchable jobs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, DatasetSpec, YearWindow};

/// One (dataset, year window) unit of work.
///
/// Jobs are recomputed from the catalog on every run; only their
/// [`job_id`](Job::job_id) is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub dataset_key: String,
    pub display_name: String,
    pub description: String,
    pub query_params: IndexMap<String, String>,
    pub year_start: i32,
    pub year_end: i32,
}

impl Job {
    fn from_spec(spec: &DatasetSpec, window: YearWindow) -> Self {
        Self {
            dataset_key: spec.key.clone(),
            display_name: spec.display_name.clone(),
            description: spec.description.clone(),
            query_params: spec.query_params.clone(),
            year_start: window.start,
            year_end: window.end,
        }
    }

    /// Deterministic identity: `{dataset_key}_{year_start}_{year_end}`.
    pub fn job_id(&self) -> String {
        job_id(&self.dataset_key, self.year_start, self.year_end)
    }

    pub fn window(&self) -> YearWindow {
        YearWindow::new(self.year_start, self.year_end)
    }
}

/// Build a job id from its parts.
pub fn job_id(dataset_key: &str, year_start: i32, year_end: i32) -> String {
    format!("{}_{}_{}", dataset_key, year_start, year_end)
}

/// Expand every dataset's windows into jobs, in catalog order then window
/// order.
pub fn plan(catalog: &Catalog) -> Vec<Job> {
    catalog
        .datasets()
        .iter()
        .flat_map(|spec| {
            spec.year_windows
                .iter()
                .map(move |window| Job::from_spec(spec, *window))
        })
        .collect()
}
