//! Logging and telemetry settings.

use std::str::FromStr;

use crate::constants::DEFAULT_LOG_LEVEL;

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line, event fields flattened.
    #[default]
    Json,
    /// Human readable text.
    Text,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "plain" => Ok(Self::Text),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Logging, metrics and tracing settings.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `tracing` level directive (e.g. `warn`, `info`)
    pub level: String,
    pub format: LogFormat,
    /// Bind address of the Prometheus exporter, if enabled
    pub metrics_bind: Option<String>,
    /// OTLP endpoint for trace export, if enabled
    pub otlp_endpoint: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
            metrics_bind: None,
            otlp_endpoint: None,
        }
    }
}

/// Map a `LOGLEVEL` value to a `tracing` level directive.
///
/// Accepts the conventional names `DEBUG`, `INFO`, `WARNING`, `ERROR` and
/// `CRITICAL` (case-insensitive) as well as `trace` and `warn`.
pub(crate) fn level_directive(value: &str) -> Option<&'static str> {
    match value.to_ascii_uppercase().as_str() {
        "TRACE" => Some("trace"),
        "DEBUG" => Some("debug"),
        "INFO" => Some("info"),
        "WARN" | "WARNING" => Some("warn"),
        "ERROR" | "CRITICAL" | "FATAL" => Some("error"),
        _ => None,
    }
}
