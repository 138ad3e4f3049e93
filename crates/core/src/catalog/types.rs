//! Types describing what to ingest.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An inclusive `(year_start, year_end)` range queried in a single request.
///
/// Serialized as a two-element array so catalog files can write
/// `year_windows = [[1950, 1979], [1980, 2025]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

impl YearWindow {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Whether `start <= end`.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

impl From<(i32, i32)> for YearWindow {
    fn from((start, end): (i32, i32)) -> Self {
        Self { start, end }
    }
}

impl From<YearWindow> for (i32, i32) {
    fn from(window: YearWindow) -> Self {
        (window.start, window.end)
    }
}

impl fmt::Display for YearWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A dataset to ingest: fixed query filters plus the year windows to split
/// the request into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Unique, stable identifier. Becomes part of job ids and artifact names.
    pub key: String,
    /// Human-readable name.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Filter fields sent verbatim, in authored order, with every request
    /// for this dataset.
    #[serde(default, alias = "params")]
    pub query_params: IndexMap<String, String>,
    /// Year windows, each small enough to stay under the per-request
    /// record ceiling.
    pub year_windows: Vec<YearWindow>,
}

impl DatasetSpec {
    /// Create a dataset with no filters and no windows.
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            description: description.into(),
            query_params: IndexMap::new(),
            year_windows: Vec::new(),
        }
    }

    /// Add a filter field.
    pub fn with_param(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(field.into(), value.into());
        self
    }

    /// Append a year window.
    pub fn with_window(mut self, start: i32, end: i32) -> Self {
        self.year_windows.push(YearWindow::new(start, end));
        self
    }
}

/// On-disk catalog file layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CatalogFile {
    #[serde(default)]
    pub datasets: Vec<DatasetSpec>,
}
