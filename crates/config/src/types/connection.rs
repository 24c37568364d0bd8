//! Connection configuration types for the Kibana sidecar.
//!
//! Responsibilities:
//! - Define connection settings (URLs, credentials, TLS verification, timeouts, retries).
//! - Define the main `Config` structure combining connection, watch and logging settings.
//!
//! Does NOT handle:
//! - Configuration loading from env (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - Default values come from `crate::constants`, not magic numbers.

use std::path::PathBuf;
use std::time::Duration;

use crate::types::auth::Credentials;
use crate::types::logging::LoggingConfig;
use crate::types::watch::WatchConfig;

/// Connection settings for the two upstream APIs.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Base URL of Kibana (saved-object API), e.g. `http://kibana:5601`
    pub kibana_base_url: String,
    /// Base URL of Elasticsearch (watcher API and version probe)
    pub elasticsearch_base_url: String,
    /// Optional basic-auth credentials used for both APIs
    pub credentials: Option<Credentials>,
    /// Whether to skip TLS verification (for self-signed certificates)
    pub skip_verify: bool,
    /// Per-request timeout
    pub timeout: Duration,
    /// Maximum number of transport retries for failed requests
    pub max_retries: usize,
    /// Base backoff between transport retries
    pub retry_backoff: Duration,
}

/// Main configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream connection settings
    pub connection: ConnectionConfig,
    /// Watch and reconciliation settings
    pub watch: WatchConfig,
    /// Logging and telemetry settings
    pub logging: LoggingConfig,
    /// Optional JSON file holding default watcher actions
    pub default_actions_path: Option<PathBuf>,
}
