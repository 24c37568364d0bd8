//! Error types for the sidecar client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to Kibana or Elasticsearch.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success response from the upstream API.
    #[error("API error ({status}) at {url}: {message}")]
    ApiError {
        status: u16,
        url: String,
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport retries were exhausted; carries the last failure.
    #[error("Maximum retries exceeded ({0} attempts): {1}")]
    MaxRetriesExceeded(usize, Box<ClientError>),

    /// The Elasticsearch major version has no known watcher API.
    #[error("Unsupported Elasticsearch major version: {0}")]
    UnsupportedVersion(String),
}

impl ClientError {
    /// Check if an HTTP status code is retryable at the transport layer.
    ///
    /// Retryable status codes: 500, 502, 503, 504. Only idempotent requests
    /// are retried on these.
    pub fn is_retryable_status(status: u16) -> bool {
        matches!(status, 500 | 502 | 503 | 504)
    }

    /// HTTP status carried by this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::MaxRetriesExceeded(_, inner) => inner.status(),
            _ => None,
        }
    }
}
