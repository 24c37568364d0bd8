//! Shared request plumbing: common headers and transport retries.
//!
//! Responsibilities:
//! - Attach the `kbn-xsrf` header and optional basic auth to every request.
//! - Retry failed requests with exponential backoff.
//! - Turn non-success responses into [`ClientError::ApiError`].
//! - Record per-attempt request metrics.
//!
//! Does NOT handle:
//! - Interpreting success bodies (each endpoint parses its own response).
//! - Endpoint-specific status rules, e.g. bulk create accepting only 200.
//!
//! Invariants:
//! - Connection failures are retried for every method; nothing reached the server.
//! - Retryable statuses (500/502/503/504) and timeouts are retried only for
//!   idempotent requests. A POST is never replayed once the server may have
//!   seen it.
//! - The delay before retry `n` (zero-based) is `backoff * 2^n`.

use std::time::{Duration, Instant};

use reqwest::{RequestBuilder, Response};
use secrecy::ExposeSecret;
use sidecar_config::Credentials;
use sidecar_config::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BACKOFF_MS, XSRF_HEADER, XSRF_HEADER_VALUE,
};
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::telemetry::inject_trace_context;

/// Transport retry settings shared by all endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt; `0` disables retrying.
    pub max_retries: usize,
    /// Base backoff, doubled on every retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: usize, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Delay to wait before retry number `attempt` (zero-based).
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16) as u32);
        self.backoff.saturating_mul(factor)
    }
}

/// Add the headers every upstream call carries.
///
/// Besides `kbn-xsrf` and basic auth this propagates the current trace
/// context when OTLP export is active.
pub fn with_common_headers(
    builder: RequestBuilder,
    credentials: Option<&Credentials>,
) -> RequestBuilder {
    let builder = inject_trace_context(builder).header(XSRF_HEADER, XSRF_HEADER_VALUE);
    match credentials {
        Some(creds) => builder.basic_auth(&creds.username, Some(creds.password.expose_secret())),
        None => builder,
    }
}

/// Pull a readable message out of a Kibana or Elasticsearch error body.
///
/// Kibana answers `{"message": ...}`, Elasticsearch answers
/// `{"error": {"reason": ...}}`; anything else is returned verbatim.
pub(crate) fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.to_string();
    };

    if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }
    if let Some(reason) = value
        .get("error")
        .and_then(|e| e.get("reason"))
        .and_then(|r| r.as_str())
    {
        return reason.to_string();
    }
    if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
        return error.to_string();
    }
    body.to_string()
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Could not read error response body".to_string());

    ClientError::ApiError {
        status,
        url,
        message: extract_error_message(&body),
    }
}

fn is_retryable_transport_error(err: &reqwest::Error, idempotent: bool) -> bool {
    err.is_connect() || (idempotent && err.is_timeout())
}

/// Sends an HTTP request, retrying transient failures per `policy`.
///
/// `endpoint` and `method` label the request in metrics and logs.
/// `idempotent` must be `true` only for requests that are safe to replay
/// after the server may have processed them (GET, PUT).
///
/// # Errors
///
/// - [`ClientError::ApiError`] for a non-retryable non-success status.
/// - [`ClientError::HttpError`] for a non-retryable transport failure.
/// - [`ClientError::MaxRetriesExceeded`] when every attempt failed with a
///   retryable error; the last failure is carried inside.
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    policy: &RetryPolicy,
    endpoint: &str,
    method: &str,
    idempotent: bool,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let attempts = policy.max_retries + 1;
    let mut last_error: Option<ClientError> = None;

    for attempt in 0..attempts {
        let Some(attempt_builder) = builder.try_clone() else {
            debug!(endpoint, "Request builder cannot be cloned, single attempt only");
            return finish(builder.send().await, endpoint, method, metrics).await;
        };

        if attempt > 0 {
            let delay = policy.delay_for(attempt - 1);
            if let Some(m) = metrics {
                m.record_retry(endpoint, method, attempt);
            }
            debug!(
                endpoint,
                method,
                attempt = attempt + 1,
                max_attempts = attempts,
                delay_ms = delay.as_millis() as u64,
                "Retrying request"
            );
            tokio::time::sleep(delay).await;
        }

        if let Some(m) = metrics {
            m.record_request(endpoint, method);
        }
        let start = Instant::now();
        let result = attempt_builder.send().await;
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                if let Some(m) = metrics {
                    m.record_request_duration(endpoint, method, elapsed, Some(status));
                }

                if response.status().is_success() {
                    if attempt > 0 {
                        debug!(endpoint, attempt = attempt + 1, "Request succeeded after retry");
                    }
                    return Ok(response);
                }

                let err = api_error(response).await;
                if idempotent && ClientError::is_retryable_status(status) {
                    warn!(endpoint, method, status, "Retryable status from upstream");
                    last_error = Some(err);
                    continue;
                }
                return Err(record_error(err, endpoint, method, metrics));
            }
            Err(e) => {
                if let Some(m) = metrics {
                    m.record_request_duration(endpoint, method, elapsed, None);
                }
                if is_retryable_transport_error(&e, idempotent) {
                    warn!(endpoint, method, error = %e, "Transport error talking to upstream");
                    last_error = Some(ClientError::from(e));
                    continue;
                }
                return Err(record_error(ClientError::from(e), endpoint, method, metrics));
            }
        }
    }

    let last = last_error.unwrap_or_else(|| {
        ClientError::InvalidResponse("request was never attempted".to_string())
    });
    let err = if policy.max_retries == 0 {
        last
    } else {
        debug!(endpoint, attempts, "Retries exhausted");
        ClientError::MaxRetriesExceeded(attempts, Box::new(last))
    };
    Err(record_error(err, endpoint, method, metrics))
}

async fn finish(
    result: std::result::Result<Response, reqwest::Error>,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    match result {
        Ok(response) if response.status().is_success() => Ok(response),
        Ok(response) => Err(record_error(
            api_error(response).await,
            endpoint,
            method,
            metrics,
        )),
        Err(e) => Err(record_error(ClientError::from(e), endpoint, method, metrics)),
    }
}

fn record_error(
    err: ClientError,
    endpoint: &str,
    method: &str,
    metrics: Option<&MetricsCollector>,
) -> ClientError {
    if let Some(m) = metrics {
        m.record_client_error(endpoint, method, &err);
    }
    err
}
