//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse environment variables for sidecar configuration.
//! - Apply environment variable values to a ConfigLoader instance.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Building the final Config (see builder.rs).
//! - .env file loading (handled by ConfigLoader::load_dotenv).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric or boolean values return ConfigError::InvalidValue.

use secrecy::SecretString;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::types::LogFormat;
use crate::types::logging::level_directive;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parse an environment variable with `FromStr`, mapping failures to `InvalidValue`.
fn parse_env<T: FromStr>(key: &str, expectation: &str) -> Result<Option<T>, ConfigError> {
    env_var_or_none(key)
        .map(|raw| {
            raw.parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: key.to_string(),
                message: expectation.to_string(),
            })
        })
        .transpose()
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(label) = env_var_or_none("LABEL") {
        loader.set_label(Some(label));
    }
    if let Some(label) = env_var_or_none("GENERATE_ID_LABEL") {
        loader.set_generate_id_label(Some(label));
    }
    if let Some(url) = env_var_or_none("KIBANA_BASE_URL") {
        loader.set_kibana_base_url(Some(url));
    }
    if let Some(url) = env_var_or_none("ELASTICSEARCH_BASE_URL") {
        loader.set_elasticsearch_base_url(Some(url));
    }
    if let Some(username) = env_var_or_none("KIBANA_USERNAME") {
        loader.set_username(Some(username));
    }
    if let Some(password) = env_var_or_none("KIBANA_PASSWORD") {
        loader.set_password(Some(SecretString::new(password.into())));
    }
    if let Some(namespace) = env_var_or_none("NAMESPACE") {
        loader.set_namespace(Some(namespace));
    }
    if let Some(path) = env_var_or_none("DEFAULT_WATCHER_ACTIONS_FILEPATH") {
        loader.set_default_actions_path(Some(PathBuf::from(path)));
    }
    if let Some(skip) = parse_env::<bool>("SIDECAR_SKIP_VERIFY", "must be true or false")? {
        loader.set_skip_verify(Some(skip));
    }
    if let Some(secs) = parse_env::<u64>("SIDECAR_TIMEOUT", "must be a number")? {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) =
        parse_env::<usize>("SIDECAR_MAX_RETRIES", "must be a non-negative integer")?
    {
        loader.set_max_retries(Some(retries));
    }
    if let Some(ms) = parse_env::<u64>("SIDECAR_RETRY_BACKOFF_MS", "must be a number")? {
        loader.set_retry_backoff(Some(Duration::from_millis(ms)));
    }
    if let Some(secs) = parse_env::<u64>("SIDECAR_WATCH_RETRY_INTERVAL", "must be a number")? {
        loader.set_watch_retry_interval(Some(Duration::from_secs(secs)));
    }
    if let Some(level) = env_var_or_none("LOGLEVEL") {
        let directive = level_directive(&level).ok_or_else(|| ConfigError::InvalidValue {
            var: "LOGLEVEL".to_string(),
            message: "must be one of DEBUG, INFO, WARNING, ERROR".to_string(),
        })?;
        loader.set_log_level(Some(directive.to_string()));
    }
    if let Some(format) =
        parse_env::<LogFormat>("LOG_FORMAT", "must be json or text")?
    {
        loader.set_log_format(Some(format));
    }
    if let Some(bind) = env_var_or_none("SIDECAR_METRICS_BIND") {
        loader.set_metrics_bind(Some(bind));
    }
    if let Some(endpoint) = env_var_or_none("SIDECAR_OTLP_ENDPOINT") {
        loader.set_otlp_endpoint(Some(endpoint));
    }

    Ok(())
}
