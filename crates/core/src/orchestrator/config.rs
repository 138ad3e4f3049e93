//! Orchestrator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Configuration for the ingest orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// State namespace. Every run against the same source shares one
    /// completion set.
    #[serde(default = "default_source_name")]
    pub source_name: String,

    /// Prepended to each job id to form the artifact identifier.
    /// Empty means the job id alone.
    #[serde(default = "default_artifact_prefix")]
    pub artifact_prefix: String,

    /// Ask the artifact store to compress.
    #[serde(default = "default_compress")]
    pub compress: bool,

    /// Pause between consecutive requests (milliseconds).
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// A response with at least this many records may have been cut short
    /// by the remote API. Logged, never retried.
    #[serde(default = "default_record_ceiling")]
    pub record_ceiling: usize,
}

fn default_source_name() -> String {
    "nass_quickstats".to_string()
}

fn default_artifact_prefix() -> String {
    "nass".to_string()
}

fn default_compress() -> bool {
    true
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_record_ceiling() -> usize {
    50_000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            source_name: default_source_name(),
            artifact_prefix: default_artifact_prefix(),
            compress: default_compress(),
            delay_ms: default_delay_ms(),
            record_ceiling: default_record_ceiling(),
        }
    }
}

impl OrchestratorConfig {
    /// Identifier an artifact for `job_id` is stored under.
    pub fn artifact_identifier(&self, job_id: &str) -> String {
        if self.artifact_prefix.is_empty() {
            job_id.to_string()
        } else {
            format!("{}_{}", self.artifact_prefix, job_id)
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl From<&Config> for OrchestratorConfig {
    fn from(config: &Config) -> Self {
        Self {
            source_name: config.ingest.source_name.clone(),
            artifact_prefix: config.ingest.artifact_prefix.clone(),
            compress: config.storage.compress,
            delay_ms: config.ingest.delay_ms,
            record_ceiling: config.api.record_ceiling,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.source_name, "nass_quickstats");
        assert_eq!(config.artifact_prefix, "nass");
        assert!(config.compress);
        assert_eq!(config.delay(), Duration::from_secs(1));
        assert_eq!(config.record_ceiling, 50_000);
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            delay_ms = 0
        "#;
        let config: OrchestratorConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.source_name, "nass_quickstats");
    }

    #[test]
    fn test_artifact_identifier() {
        let config = OrchestratorConfig::default();
        assert_eq!(
            config.artifact_identifier("corn_production_1990_2024"),
            "nass_corn_production_1990_2024"
        );

        let bare = OrchestratorConfig {
            artifact_prefix: String::new(),
            ..Default::default()
        };
        assert_eq!(
            bare.artifact_identifier("corn_production_1990_2024"),
            "corn_production_1990_2024"
        );
    }

    #[test]
    fn test_from_app_config() {
        let mut app = Config::default();
        app.ingest.source_name = "nass_test".to_string();
        app.ingest.delay_ms = 10;
        app.storage.compress = false;
        app.api.record_ceiling = 100;

        let config = OrchestratorConfig::from(&app);
        assert_eq!(config.source_name, "nass_test");
        assert_eq!(config.delay_ms, 10);
        assert!(!config.compress);
        assert_eq!(config.record_ceiling, 100);
    }
}
