//! Centralized constants for the Kibana sidecar workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed connection timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default number of transport-level retries for failed requests.
pub const DEFAULT_MAX_RETRIES: usize = 5;

/// Maximum allowed value for max_retries.
pub const MAX_MAX_RETRIES: usize = 10;

/// Default backoff factor between transport retries, in milliseconds.
///
/// The delay before retry `n` (zero-based) is `factor * 2^n`.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;

// =============================================================================
// Upstream API Constants
// =============================================================================

/// Header required by Kibana (and tolerated by Elasticsearch) on mutating requests.
pub const XSRF_HEADER: &str = "kbn-xsrf";

/// Value sent in the [`XSRF_HEADER`].
pub const XSRF_HEADER_VALUE: &str = "kibana-sidecar";

// =============================================================================
// Watch Defaults
// =============================================================================

/// Label whose value `"true"` turns on ID generation from titles.
pub const DEFAULT_GENERATE_ID_LABEL: &str = "generate_id_from_title";

/// Value of the `NAMESPACE` variable that selects all namespaces.
pub const ALL_NAMESPACES: &str = "ALL";

/// Minimum delay between re-subscriptions of a failed watch stream, in seconds.
pub const DEFAULT_WATCH_RETRY_INTERVAL_SECS: u64 = 5;

/// Maximum allowed watch retry interval in seconds.
pub const MAX_WATCH_RETRY_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Logging Defaults
// =============================================================================

/// Log level used when neither `LOGLEVEL` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Service name reported in structured logs and traces.
pub const SERVICE_NAME: &str = "kibana-sidecar";
