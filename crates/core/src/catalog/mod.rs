//! Dataset catalog - the static description of what to ingest.
//!
//! A catalog is an ordered list of [`DatasetSpec`]s. Order matters: jobs are
//! planned and executed in catalog-definition order, so progress reporting
//! and resumed runs stay stable between invocations.

mod builtin;
mod types;

pub use builtin::builtin_datasets;
pub use types::{DatasetSpec, YearWindow};

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

use types::CatalogFile;

/// Dataset keys end up in file names, so keep them to a safe alphabet.
static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex is valid")
});

/// Errors raised while building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate dataset key: {0}")]
    DuplicateKey(String),

    #[error("invalid dataset key {0:?}: only letters, digits, '_' and '-' are allowed")]
    InvalidKey(String),

    #[error("dataset {0} has no year windows")]
    NoWindows(String),

    #[error("dataset {key} has an inverted year window {start}-{end}")]
    InvalidWindow { key: String, start: i32, end: i32 },

    #[error("dataset {key} lists year window {start}-{end} more than once")]
    DuplicateWindow { key: String, start: i32, end: i32 },

    #[error("catalog file not found: {0}")]
    FileNotFound(String),

    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog: {0}")]
    Parse(String),
}

/// A validated, ordered set of datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    datasets: Vec<DatasetSpec>,
}

impl Catalog {
    /// Build a catalog, checking key uniqueness and that each dataset has
    /// distinct, non-inverted windows.
    pub fn new(datasets: Vec<DatasetSpec>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for spec in &datasets {
            if !KEY_PATTERN.is_match(&spec.key) {
                return Err(CatalogError::InvalidKey(spec.key.clone()));
            }
            if !seen.insert(spec.key.as_str()) {
                return Err(CatalogError::DuplicateKey(spec.key.clone()));
            }
            if spec.year_windows.is_empty() {
                return Err(CatalogError::NoWindows(spec.key.clone()));
            }
            if let Some(bad) = spec.year_windows.iter().find(|w| !w.is_valid()) {
                return Err(CatalogError::InvalidWindow {
                    key: spec.key.clone(),
                    start: bad.start,
                    end: bad.end,
                });
            }
            // Repeated windows would plan two jobs with the same id.
            let mut windows = HashSet::new();
            if let Some(dup) = spec.year_windows.iter().find(|w| !windows.insert(**w)) {
                return Err(CatalogError::DuplicateWindow {
                    key: spec.key.clone(),
                    start: dup.start,
                    end: dup.end,
                });
            }
        }
        Ok(Self { datasets })
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(builtin_datasets())
    }

    /// Parse a catalog from TOML (`[[datasets]]` tables).
    pub fn from_toml_str(toml_str: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            toml::from_str(toml_str).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(file.datasets)
    }

    /// Load a catalog from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Datasets in definition order.
    pub fn datasets(&self) -> &[DatasetSpec] {
        &self.datasets
    }

    /// Look up a dataset by key.
    pub fn get(&self, key: &str) -> Option<&DatasetSpec> {
        self.datasets.iter().find(|d| d.key == key)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
