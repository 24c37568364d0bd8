//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for layered configuration merging.
//! - Support loading from environment variables and direct builder methods.
//! - Validate and build the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//! - Reading the default actions file (see actions.rs).
//!
//! Invariants / Assumptions:
//! - Builder methods applied after `from_env()` take precedence over environment variables.
//! - Base URLs are validated as absolute http(s) URLs and stored without trailing slashes.
//! - Credentials are only used when both username and password are present.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{
    DEFAULT_GENERATE_ID_LABEL, DEFAULT_LOG_LEVEL, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF_MS,
    DEFAULT_TIMEOUT_SECS, DEFAULT_WATCH_RETRY_INTERVAL_SECS, MAX_MAX_RETRIES, MAX_TIMEOUT_SECS,
    MAX_WATCH_RETRY_INTERVAL_SECS,
};
use crate::types::{
    Config, ConnectionConfig, Credentials, LogFormat, LoggingConfig, NamespaceScope, WatchConfig,
};

/// Configuration loader that builds config from environment variables and overrides.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    label: Option<String>,
    generate_id_label: Option<String>,
    kibana_base_url: Option<String>,
    elasticsearch_base_url: Option<String>,
    username: Option<String>,
    password: Option<SecretString>,
    namespace: Option<String>,
    default_actions_path: Option<PathBuf>,
    skip_verify: Option<bool>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
    retry_backoff: Option<Duration>,
    watch_retry_interval: Option<Duration>,
    log_level: Option<String>,
    log_format: Option<LogFormat>,
    metrics_bind: Option<String>,
    otlp_endpoint: Option<String>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` environment variable is set to "true" or "1",
    /// the .env file will not be loaded (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The `.env` file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The `.env` file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// Missing `.env` files are silently ignored (returns `Ok(self)`).
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    /// Check if a dotenv error indicates the file was not found.
    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from environment variables.
    ///
    /// Apply builder overrides after this call so that they win over the environment.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the activation label.
    pub fn with_label(mut self, label: String) -> Self {
        self.label = Some(label);
        self
    }

    /// Set the name of the ID-generation label.
    pub fn with_generate_id_label(mut self, label: String) -> Self {
        self.generate_id_label = Some(label);
        self
    }

    /// Set the Kibana base URL.
    pub fn with_kibana_base_url(mut self, url: String) -> Self {
        self.kibana_base_url = Some(url);
        self
    }

    /// Set the Elasticsearch base URL.
    pub fn with_elasticsearch_base_url(mut self, url: String) -> Self {
        self.elasticsearch_base_url = Some(url);
        self
    }

    /// Set the basic-auth username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = Some(username);
        self
    }

    /// Set the basic-auth password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the namespace selector (`ALL` or a namespace name).
    pub fn with_namespace(mut self, namespace: String) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Set the default watcher actions file path.
    pub fn with_default_actions_path(mut self, path: PathBuf) -> Self {
        self.default_actions_path = Some(path);
        self
    }

    /// Set whether to skip TLS verification.
    pub fn with_skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = Some(skip);
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of transport retries.
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the base backoff between transport retries.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = Some(backoff);
        self
    }

    /// Set the minimum delay between watch re-subscriptions.
    pub fn with_watch_retry_interval(mut self, interval: Duration) -> Self {
        self.watch_retry_interval = Some(interval);
        self
    }

    /// Set the log level directive.
    pub fn with_log_level(mut self, level: String) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Set the log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    /// Set the Prometheus exporter bind address.
    pub fn with_metrics_bind(mut self, bind: String) -> Self {
        self.metrics_bind = Some(bind);
        self
    }

    /// Set the OTLP trace endpoint.
    pub fn with_otlp_endpoint(mut self, endpoint: String) -> Self {
        self.otlp_endpoint = Some(endpoint);
        self
    }

    /// Build the final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `LABEL`, `KIBANA_BASE_URL`
    /// or `ELASTICSEARCH_BASE_URL` were not provided, and a validation error
    /// when a numeric setting is out of range or a URL is malformed.
    pub fn build(self) -> Result<Config, ConfigError> {
        let label = self
            .label
            .ok_or_else(|| ConfigError::MissingEnvVar("LABEL".to_string()))?;

        let kibana_base_url = self
            .kibana_base_url
            .as_deref()
            .map(|raw| validate_and_normalize_base_url("KIBANA_BASE_URL", raw))
            .transpose()?
            .ok_or_else(|| ConfigError::MissingEnvVar("KIBANA_BASE_URL".to_string()))?;

        let elasticsearch_base_url = self
            .elasticsearch_base_url
            .as_deref()
            .map(|raw| validate_and_normalize_base_url("ELASTICSEARCH_BASE_URL", raw))
            .transpose()?
            .ok_or_else(|| ConfigError::MissingEnvVar("ELASTICSEARCH_BASE_URL".to_string()))?;

        let connection = ConnectionConfig {
            kibana_base_url,
            elasticsearch_base_url,
            credentials: Credentials::from_parts(self.username, self.password),
            skip_verify: self.skip_verify.unwrap_or(false),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_backoff: self
                .retry_backoff
                .unwrap_or(Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS)),
        };
        Self::validate_connection(&connection)?;

        let watch = WatchConfig {
            label,
            generate_id_label: self
                .generate_id_label
                .unwrap_or_else(|| DEFAULT_GENERATE_ID_LABEL.to_string()),
            namespace: NamespaceScope::from_setting(self.namespace.as_deref()),
            retry_interval: self
                .watch_retry_interval
                .unwrap_or(Duration::from_secs(DEFAULT_WATCH_RETRY_INTERVAL_SECS)),
        };
        Self::validate_watch(&watch)?;

        let logging = LoggingConfig {
            level: self
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            format: self.log_format.unwrap_or_default(),
            metrics_bind: self.metrics_bind,
            otlp_endpoint: self.otlp_endpoint,
        };

        Ok(Config {
            connection,
            watch,
            logging,
            default_actions_path: self.default_actions_path,
        })
    }

    /// Validates timeout and retry settings.
    fn validate_connection(connection: &ConnectionConfig) -> Result<(), ConfigError> {
        let timeout_secs = connection.timeout.as_secs();

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout {
                message: "timeout must be greater than 0 seconds".to_string(),
            });
        }

        if timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidTimeout {
                message: format!(
                    "timeout exceeds maximum allowed value of {} seconds",
                    MAX_TIMEOUT_SECS
                ),
            });
        }

        if connection.max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!(
                    "must be between 0 and {} (got {})",
                    MAX_MAX_RETRIES, connection.max_retries
                ),
            });
        }

        Ok(())
    }

    /// Validates the watch retry interval.
    ///
    /// A zero interval would allow a tight reconnect loop under sustained failure.
    fn validate_watch(watch: &WatchConfig) -> Result<(), ConfigError> {
        let secs = watch.retry_interval.as_secs();
        if secs == 0 || secs > MAX_WATCH_RETRY_INTERVAL_SECS {
            return Err(ConfigError::InvalidWatchRetryInterval {
                message: format!(
                    "must be between 1 and {} seconds (got {})",
                    MAX_WATCH_RETRY_INTERVAL_SECS, secs
                ),
            });
        }
        Ok(())
    }

    // Internal accessor methods for use by other loader modules

    pub(crate) fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub(crate) fn set_generate_id_label(&mut self, label: Option<String>) {
        self.generate_id_label = label;
    }

    pub(crate) fn set_kibana_base_url(&mut self, url: Option<String>) {
        self.kibana_base_url = url;
    }

    pub(crate) fn set_elasticsearch_base_url(&mut self, url: Option<String>) {
        self.elasticsearch_base_url = url;
    }

    pub(crate) fn set_username(&mut self, username: Option<String>) {
        self.username = username;
    }

    pub(crate) fn set_password(&mut self, password: Option<SecretString>) {
        self.password = password;
    }

    pub(crate) fn set_namespace(&mut self, namespace: Option<String>) {
        self.namespace = namespace;
    }

    pub(crate) fn set_default_actions_path(&mut self, path: Option<PathBuf>) {
        self.default_actions_path = path;
    }

    pub(crate) fn set_skip_verify(&mut self, skip: Option<bool>) {
        self.skip_verify = skip;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    pub(crate) fn set_retry_backoff(&mut self, backoff: Option<Duration>) {
        self.retry_backoff = backoff;
    }

    pub(crate) fn set_watch_retry_interval(&mut self, interval: Option<Duration>) {
        self.watch_retry_interval = interval;
    }

    pub(crate) fn set_log_level(&mut self, level: Option<String>) {
        self.log_level = level;
    }

    pub(crate) fn set_log_format(&mut self, format: Option<LogFormat>) {
        self.log_format = format;
    }

    pub(crate) fn set_metrics_bind(&mut self, bind: Option<String>) {
        self.metrics_bind = bind;
    }

    pub(crate) fn set_otlp_endpoint(&mut self, endpoint: Option<String>) {
        self.otlp_endpoint = endpoint;
    }
}

/// Validate a base URL and strip trailing slashes.
fn validate_and_normalize_base_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingEnvVar(var.to_string()));
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: var.to_string(),
        message: format!(
            "must be an absolute http(s) URL with a host (e.g. http://kibana:5601): {e}"
        ),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: "host is required (e.g. http://kibana:5601)".into(),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
