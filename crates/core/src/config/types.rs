use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Environment variable the API credential is read from.
pub const API_KEY_ENV: &str = "NASS_API_KEY";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Remote API configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL; requests go to `{base_url}/api_GET/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key. Usually supplied through `NASS_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 300)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Per-request record ceiling of the API (default: 50000).
    /// Responses that reach it are probably truncated.
    #[serde(default = "default_record_ceiling")]
    pub record_ceiling: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
            record_ceiling: default_record_ceiling(),
        }
    }
}

// Keep the key out of logs.
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("record_ceiling", &self.record_ceiling)
            .finish()
    }
}

fn default_base_url() -> String {
    crate::client::DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_record_ceiling() -> usize {
    50_000
}

/// Ingestion run configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Namespace completion state is stored under.
    #[serde(default = "default_source_name")]
    pub source_name: String,
    /// Courtesy delay between jobs in milliseconds (default: 1000)
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Prefix for artifact identifiers.
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,
    /// Optional TOML catalog; the built-in catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source_name: default_source_name(),
            delay_ms: default_delay_ms(),
            artifact_prefix: default_artifact_prefix(),
            catalog_path: None,
        }
    }
}

fn default_source_name() -> String {
    "nass_quickstats".to_string()
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_artifact_prefix() -> String {
    "nass".to_string()
}

/// Raw artifact storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_raw_dir")]
    pub raw_dir: PathBuf,
    /// zstd-compress artifacts at rest (default: true)
    #[serde(default = "default_compress")]
    pub compress: bool,
    #[serde(default = "default_compression_level")]
    pub compression_level: i32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            raw_dir: default_raw_dir(),
            compress: default_compress(),
            compression_level: default_compression_level(),
        }
    }
}

fn default_raw_dir() -> PathBuf {
    PathBuf::from("data/raw")
}

fn default_compress() -> bool {
    true
}

fn default_compression_level() -> i32 {
    3
}

/// Completion state configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StateConfig {
    #[serde(default)]
    pub backend: StateBackend,
    /// Directory for the JSON backend.
    #[serde(default = "default_state_dir")]
    pub dir: PathBuf,
    /// Database file for the SQLite backend.
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: StateBackend::default(),
            dir: default_state_dir(),
            sqlite_path: default_sqlite_path(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("data/state")
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("data/state/state.db")
}

/// Available state backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StateBackend {
    #[default]
    Json,
    Sqlite,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Metrics configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Write Prometheus text exposition here at the end of a run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub textfile_path: Option<PathBuf>,
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub api: SanitizedApiConfig,
    pub ingest: IngestConfig,
    pub storage: StorageConfig,
    pub state: StateConfig,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
}

/// Sanitized API config (key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedApiConfig {
    pub base_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
    pub record_ceiling: usize,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            api: SanitizedApiConfig {
                base_url: config.api.base_url.clone(),
                api_key_configured: config
                    .api
                    .api_key
                    .as_deref()
                    .is_some_and(|k| !k.trim().is_empty()),
                timeout_secs: config.api.timeout_secs,
                record_ceiling: config.api.record_ceiling,
            },
            ingest: config.ingest.clone(),
            storage: config.storage.clone(),
            state: config.state.clone(),
            logging: config.logging.clone(),
            metrics: config.metrics.clone(),
        }
    }
}
