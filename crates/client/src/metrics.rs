//! Metrics collection for upstream calls and reconciliation.
//!
//! This module provides metrics collection for the sidecar, including:
//! - Request latency histograms
//! - Request counters (total, retries, errors)
//! - Error categorization
//! - Sync counters (objects saved/failed per family, reconciliations, watch restarts)
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (see [`crate::metrics_exporter`])
//! - Alerting or threshold monitoring
//!
//! # Invariants
//! - All metrics use consistent label names: `endpoint`, `method`, `status`, `error_category`, `family`
//! - Metric recording is infallible
//! - Zero-cost when no metrics recorder is installed

use crate::error::ClientError;
use std::time::Duration;

/// Metric name for request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "kibana_sidecar_request_duration_seconds";

/// Metric name for total request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "kibana_sidecar_requests_total";

/// Metric name for retry counter.
pub const METRIC_RETRIES_TOTAL: &str = "kibana_sidecar_retries_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "kibana_sidecar_errors_total";

/// Metric name for objects accepted upstream.
pub const METRIC_OBJECTS_SYNCED: &str = "kibana_sidecar_objects_synced_total";

/// Metric name for objects rejected upstream.
pub const METRIC_OBJECTS_FAILED: &str = "kibana_sidecar_objects_failed_total";

/// Metric name for processed ConfigMap events.
pub const METRIC_RECONCILIATIONS: &str = "kibana_sidecar_reconciliations_total";

/// Metric name for watch stream re-subscriptions.
pub const METRIC_WATCH_RESTARTS: &str = "kibana_sidecar_watch_restarts_total";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport-level errors (connection refused, DNS, etc.)
    Transport,
    /// HTTP 4xx client errors
    Http4xx,
    /// HTTP 5xx server errors
    Http5xx,
    /// Malformed or unexpected response bodies
    Api,
    /// Request timeout
    Timeout,
    /// Unknown/unclassified errors
    Unknown,
}

impl ErrorCategory {
    /// Returns the string label for this error category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Http4xx => "http_4xx",
            ErrorCategory::Http5xx => "http_5xx",
            ErrorCategory::Api => "api",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::ApiError { status, .. } => {
                if (400..500).contains(status) {
                    ErrorCategory::Http4xx
                } else if (500..600).contains(status) {
                    ErrorCategory::Http5xx
                } else {
                    ErrorCategory::Api
                }
            }
            ClientError::HttpError(e) if e.is_timeout() => ErrorCategory::Timeout,
            ClientError::HttpError(e) if e.is_connect() => ErrorCategory::Transport,
            ClientError::HttpError(e) if e.is_decode() => ErrorCategory::Api,
            ClientError::InvalidResponse(_) => ErrorCategory::Api,
            ClientError::MaxRetriesExceeded(_, inner) => ErrorCategory::from(inner.as_ref()),
            _ => ErrorCategory::Unknown,
        }
    }
}

/// Downstream object family, used as the `family` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFamily {
    /// Kibana saved objects
    SavedObject,
    /// Elasticsearch watches
    Watch,
}

impl ObjectFamily {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ObjectFamily::SavedObject => "saved_object",
            ObjectFamily::Watch => "watch",
        }
    }
}

/// Metrics collector for the sidecar.
///
/// A lightweight wrapper around the `metrics` crate macros providing
/// type-safe methods for recording metrics with consistent labels.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create a new, enabled metrics collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a disabled metrics collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Check if metrics collection is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the duration of an HTTP request.
    ///
    /// `status` is `None` if the request failed before receiving a response.
    pub fn record_request_duration(
        &self,
        endpoint: &str,
        method: &str,
        duration: Duration,
        status: Option<u16>,
    ) {
        if !self.enabled {
            return;
        }

        let status_label = status.map_or("error".to_string(), |s| s.to_string());

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "status" => status_label,
        )
        .record(duration.as_secs_f64());
    }

    /// Record a request attempt, including retries.
    pub fn record_request(&self, endpoint: &str, method: &str) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_REQUESTS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
        )
        .increment(1);
    }

    /// Record a retry attempt (1-based, not counting the initial request).
    pub fn record_retry(&self, endpoint: &str, method: &str, attempt: usize) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_RETRIES_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "attempt" => attempt.to_string(),
        )
        .increment(1);
    }

    /// Record a failed call, categorizing the error.
    pub fn record_client_error(&self, endpoint: &str, method: &str, error: &ClientError) {
        if !self.enabled {
            return;
        }

        let category = ErrorCategory::from(error);
        metrics::counter!(METRIC_ERRORS_TOTAL,
            "endpoint" => endpoint.to_string(),
            "method" => method.to_string(),
            "error_category" => category.as_str(),
        )
        .increment(1);
    }

    /// Record objects accepted by the upstream API.
    pub fn record_objects_synced(&self, family: ObjectFamily, count: usize) {
        if !self.enabled || count == 0 {
            return;
        }
        metrics::counter!(METRIC_OBJECTS_SYNCED, "family" => family.as_str())
            .increment(count as u64);
    }

    /// Record objects rejected by the upstream API (or never sent because the call failed).
    pub fn record_objects_failed(&self, family: ObjectFamily, count: usize) {
        if !self.enabled || count == 0 {
            return;
        }
        metrics::counter!(METRIC_OBJECTS_FAILED, "family" => family.as_str())
            .increment(count as u64);
    }

    /// Record the outcome of one ConfigMap event (`synced`, `partial`, `failed`, `skipped`).
    pub fn record_reconciliation(&self, outcome: &'static str) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_RECONCILIATIONS, "outcome" => outcome).increment(1);
    }

    /// Record a re-subscription of the watch stream.
    pub fn record_watch_restart(&self) {
        if !self.enabled {
            return;
        }
        metrics::counter!(METRIC_WATCH_RESTARTS).increment(1);
    }
}
