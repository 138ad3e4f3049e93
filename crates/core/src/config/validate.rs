use super::{
    types::{Config, API_KEY_ENV},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - API key is present and non-blank (checked first, before anything touches the network)
/// - API base URL is http(s)
/// - Timeout and record ceiling are not 0
/// - Source name is non-empty and usable in a file name
/// - Artifact prefix (may be empty) is usable in a file name
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    match config.api.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {}
        _ => return Err(ConfigError::MissingCredential(API_KEY_ENV.to_string())),
    }

    let base_url = &config.api.base_url;
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must be an http(s) URL, got {:?}",
            base_url
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.api.record_ceiling == 0 {
        return Err(ConfigError::ValidationError(
            "api.record_ceiling cannot be 0".to_string(),
        ));
    }

    // The source name becomes the JSON state file name.
    if config.ingest.source_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "ingest.source_name cannot be empty".to_string(),
        ));
    }
    if !is_file_name_safe(&config.ingest.source_name) {
        return Err(ConfigError::ValidationError(format!(
            "ingest.source_name may only contain letters, digits, '_' and '-', got {:?}",
            config.ingest.source_name
        )));
    }

    if !is_file_name_safe(&config.ingest.artifact_prefix) {
        return Err(ConfigError::ValidationError(format!(
            "ingest.artifact_prefix may only contain letters, digits, '_' and '-', got {:?}",
            config.ingest.artifact_prefix
        )));
    }

    Ok(())
}

fn is_file_name_safe(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
