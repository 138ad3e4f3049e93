//! Remote query API client.
//!
//! [`FetchClient`] is the seam the orchestrator fetches through;
//! [`QuickStatsClient`] is the production implementation backed by the USDA
//! NASS QuickStats `api_GET` endpoint.

mod quickstats;
mod response;

pub use quickstats::{build_query_string, QuickStatsClient, DEFAULT_BASE_URL};
pub use response::interpret_body;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

/// A single record as returned by the remote API. Its shape is opaque here.
pub type Record = Value;

/// Errors that can occur while fetching a job's records.
///
/// None of these are retried by the client; a failed fetch aborts the run and
/// the job stays pending for the next one.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or timeout.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The response body carried an explicit error field.
    #[error("NASS API error: {0}")]
    ApiError(String),

    /// Non-success status without an error field in the body.
    #[error("unexpected HTTP status {status}: {message}")]
    StatusError { status: u16, message: String },

    /// Body was not the JSON shape the API documents.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Fetches every record matching a dataset's filters within a year window.
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Fetch records with `year_start <= year <= year_end` matching
    /// `query_params`. An empty vector means the API had no data for the
    /// window, which is not an error.
    async fn fetch(
        &self,
        query_params: &IndexMap<String, String>,
        year_start: i32,
        year_end: i32,
    ) -> Result<Vec<Record>, FetchError>;
}
