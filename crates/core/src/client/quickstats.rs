//! USDA NASS QuickStats API client.
//!
//! QuickStats requires an API key and caps each request at 50,000 records.
//! The client issues exactly one request per call: keeping a request under
//! the cap is the catalog's job, via year windows.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::response::interpret_body;
use super::{FetchClient, FetchError, Record};
use crate::config::ApiConfig;

/// Default QuickStats API base URL.
pub const DEFAULT_BASE_URL: &str = "https://quickstats.nass.usda.gov/api";

/// Longest body excerpt carried in a status error.
const MAX_ERROR_BODY: usize = 512;

/// QuickStats API client.
pub struct QuickStatsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl QuickStatsClient {
    /// Create a new QuickStats client. Fails without an API key.
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let api_key = match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                return Err(FetchError::NotConfigured(
                    "QuickStats API key is required".to_string(),
                ))
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Full request URL for a query.
    fn url(&self, query_params: &IndexMap<String, String>, year_start: i32, year_end: i32) -> String {
        format!(
            "{}/api_GET/?{}",
            self.base_url,
            build_query_string(&self.api_key, query_params, year_start, year_end)
        )
    }
}

/// Build the percent-encoded query string for one request.
///
/// Parameter order: `key`, `format`, `year__GE`, `year__LE`, then the
/// dataset's own filters. A dataset filter with a reserved name replaces the
/// reserved value rather than being sent twice.
pub fn build_query_string(
    api_key: &str,
    query_params: &IndexMap<String, String>,
    year_start: i32,
    year_end: i32,
) -> String {
    let mut pairs: Vec<(String, String)> = vec![
        ("key".to_string(), api_key.to_string()),
        ("format".to_string(), "JSON".to_string()),
        ("year__GE".to_string(), year_start.to_string()),
        ("year__LE".to_string(), year_end.to_string()),
    ];

    for (field, value) in query_params {
        match pairs.iter_mut().find(|(k, _)| k == field) {
            Some(existing) => existing.1 = value.clone(),
            None => pairs.push((field.clone(), value.clone())),
        }
    }

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[async_trait]
impl FetchClient for QuickStatsClient {
    async fn fetch(
        &self,
        query_params: &IndexMap<String, String>,
        year_start: i32,
        year_end: i32,
    ) -> Result<Vec<Record>, FetchError> {
        let url = self.url(query_params, year_start, year_end);

        debug!(
            "QuickStats request: params={:?}, years={}-{}",
            query_params, year_start, year_end
        );

        // The URL carries the API key, so it is stripped from transport errors.
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::HttpError(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::HttpError(e.without_url()))?;

        let parsed = serde_json::from_str::<Value>(&body);

        if !status.is_success() {
            // An error field carries the useful message even on a bad status.
            return match parsed {
                Ok(parsed) if parsed.get("error").is_some() => interpret_body(parsed),
                _ => Err(FetchError::StatusError {
                    status: status.as_u16(),
                    message: truncate(&body),
                }),
            };
        }

        let parsed = parsed.map_err(|e| {
            FetchError::ParseError(format!("Failed to parse QuickStats response: {}", e))
        })?;
        interpret_body(parsed)
    }
}
