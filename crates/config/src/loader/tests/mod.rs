//! Tests for the configuration loader builder.
//!
//! Invariants:
//! - Tests use `serial_test` to prevent environment variable pollution.
//! - Tests use `global_test_lock()` for additional synchronization.

use std::sync::Mutex;

pub mod dotenv_tests;
pub mod env_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Every variable read by `apply_env`, unset so tests start from a clean slate.
pub fn cleared_env() -> Vec<(&'static str, Option<&'static str>)> {
    [
        "LABEL",
        "GENERATE_ID_LABEL",
        "KIBANA_BASE_URL",
        "ELASTICSEARCH_BASE_URL",
        "KIBANA_USERNAME",
        "KIBANA_PASSWORD",
        "NAMESPACE",
        "DEFAULT_WATCHER_ACTIONS_FILEPATH",
        "SIDECAR_SKIP_VERIFY",
        "SIDECAR_TIMEOUT",
        "SIDECAR_MAX_RETRIES",
        "SIDECAR_RETRY_BACKOFF_MS",
        "SIDECAR_WATCH_RETRY_INTERVAL",
        "LOGLEVEL",
        "LOG_FORMAT",
        "SIDECAR_METRICS_BIND",
        "SIDECAR_OTLP_ENDPOINT",
    ]
    .into_iter()
    .map(|key| (key, None))
    .collect()
}

/// Merge `overrides` on top of [`cleared_env`].
pub fn env_with(
    overrides: &[(&'static str, &'static str)],
) -> Vec<(&'static str, Option<&'static str>)> {
    let mut vars = cleared_env();
    for (key, value) in overrides {
        if let Some(slot) = vars.iter_mut().find(|(k, _)| k == key) {
            slot.1 = Some(value);
        } else {
            vars.push((key, Some(value)));
        }
    }
    vars
}
