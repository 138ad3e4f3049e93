//! Mock fetch client for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::client::{FetchClient, FetchError, Record};
use crate::planner::Job;

use super::fixtures;

/// A recorded fetch for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFetch {
    pub query_params: IndexMap<String, String>,
    pub year_start: i32,
    pub year_end: i32,
}

type FetchKey = (Vec<(String, String)>, i32, i32);

fn fetch_key(query_params: &IndexMap<String, String>, year_start: i32, year_end: i32) -> FetchKey {
    let params = query_params
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    (params, year_start, year_end)
}

/// Mock implementation of the FetchClient trait.
///
/// Every fetch returns the default records (one record unless changed)
/// unless a per-job response or error was configured. Configured errors fire
/// once.
///
/// # Example
///
/// ```rust,ignore
/// use cropstat_core::testing::{fixtures, MockFetchClient};
///
/// let client = MockFetchClient::new();
/// client.set_records_for(&job, fixtures::records(3)).await;
///
/// // ...run the orchestrator...
///
/// assert_eq!(client.call_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockFetchClient {
    /// Records returned for any fetch without a specific response.
    default_records: Arc<RwLock<Vec<Record>>>,
    /// Responses keyed by (params, year_start, year_end).
    responses: Arc<RwLock<HashMap<FetchKey, Vec<Record>>>>,
    /// One-shot errors keyed by (params, year_start, year_end).
    errors: Arc<RwLock<HashMap<FetchKey, FetchError>>>,
    /// If set, the next fetch fails with this error.
    next_error: Arc<RwLock<Option<FetchError>>>,
    /// Recorded fetches.
    calls: Arc<RwLock<Vec<RecordedFetch>>>,
}

impl Default for MockFetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetchClient {
    /// Create a new mock fetch client.
    pub fn new() -> Self {
        Self {
            default_records: Arc::new(RwLock::new(fixtures::records(1))),
            responses: Arc::new(RwLock::new(HashMap::new())),
            errors: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn key(job: &Job) -> FetchKey {
        fetch_key(&job.query_params, job.year_start, job.year_end)
    }

    /// Set the records returned when no specific response is configured.
    pub async fn set_default_records(&self, records: Vec<Record>) {
        *self.default_records.write().await = records;
    }

    /// Set the records returned for a job's request.
    pub async fn set_records_for(&self, job: &Job, records: Vec<Record>) {
        self.responses.write().await.insert(Self::key(job), records);
    }

    /// Make the next request for a job fail with the given error.
    pub async fn set_error_for(&self, job: &Job, error: FetchError) {
        self.errors.write().await.insert(Self::key(job), error);
    }

    /// Configure the next fetch, whatever it is, to fail.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded fetches.
    pub async fn recorded_calls(&self) -> Vec<RecordedFetch> {
        self.calls.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Windows fetched so far, in order.
    pub async fn fetched_windows(&self) -> Vec<(i32, i32)> {
        self.calls
            .read()
            .await
            .iter()
            .map(|c| (c.year_start, c.year_end))
            .collect()
    }
}

#[async_trait]
impl FetchClient for MockFetchClient {
    async fn fetch(
        &self,
        query_params: &IndexMap<String, String>,
        year_start: i32,
        year_end: i32,
    ) -> Result<Vec<Record>, FetchError> {
        self.calls.write().await.push(RecordedFetch {
            query_params: query_params.clone(),
            year_start,
            year_end,
        });

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let key = fetch_key(query_params, year_start, year_end);
        if let Some(err) = self.errors.write().await.remove(&key) {
            return Err(err);
        }

        if let Some(records) = self.responses.read().await.get(&key) {
            return Ok(records.clone());
        }

        Ok(self.default_records.read().await.clone())
    }
}
