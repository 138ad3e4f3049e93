use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{
    types::{Config, API_KEY_ENV},
    ConfigError,
};

/// File (if any), then `CROPSTAT_*` overrides, then the API key variable.
fn figment(path: Option<&Path>) -> Figment {
    let mut figment = Figment::new();
    if let Some(path) = path {
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(Env::prefixed("CROPSTAT_").split("__"))
        .merge(Env::raw().only(&[API_KEY_ENV]).map(|_| "api.api_key".into()))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    figment(Some(path))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from defaults and environment variables only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    figment(None)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[ingest]
delay_ms = 250
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.ingest.delay_ms, 250);
    }

    #[test]
    fn test_load_config_from_str_invalid_type() {
        let toml = r#"
[api]
timeout_secs = "soon"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[storage]
raw_dir = "/var/lib/cropstat/raw"
compress = false
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert!(!config.storage.compress);
        assert_eq!(
            config.storage.raw_dir.to_string_lossy(),
            "/var/lib/cropstat/raw"
        );
    }

    #[test]
    fn test_env_overrides_file_and_supplies_key() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
[ingest]
delay_ms = 1000
source_name = "from_file"
"#,
            )?;
            jail.set_env("CROPSTAT_INGEST__DELAY_MS", "5");
            jail.set_env("NASS_API_KEY", "env-key");

            let config = load_config(Path::new("config.toml")).expect("config loads");
            assert_eq!(config.ingest.delay_ms, 5);
            assert_eq!(config.ingest.source_name, "from_file");
            assert_eq!(config.api.api_key.as_deref(), Some("env-key"));
            Ok(())
        });
    }

    #[test]
    fn test_load_config_from_env_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("CROPSTAT_STATE__BACKEND", "sqlite");

            let config = load_config_from_env().expect("config loads");
            assert_eq!(config.state.backend, crate::config::StateBackend::Sqlite);
            Ok(())
        });
    }
}
