//! Error type for the sync pipeline.
//!
//! None of these errors stop the watch loop. They are collected per event
//! in a [`crate::ReconcileReport`] and logged with the resource identity.

use sidecar_client::ClientError;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors raised while turning one ConfigMap event into upstream writes.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A data entry of the ConfigMap is not valid JSON.
    #[error("Invalid JSON in file '{file}': {source}")]
    InvalidPayload {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// The batch no longer parsed after id substitution.
    #[error("Reference rewrite produced invalid JSON: {0}")]
    RewriteFailed(#[source] serde_json::Error),

    /// A watch had neither an `id` nor a `metadata.name` to derive one from.
    #[error("Watch has no 'id' property: {0}")]
    MissingRuleId(String),

    /// Deletion is not propagated upstream.
    #[error("Deleting objects from '{file}' is not implemented; upstream objects were left in place")]
    DeleteNotImplemented { file: String },

    /// An upstream call failed after transport retries.
    #[error("Upstream call failed: {0}")]
    Upstream(#[from] ClientError),

    /// The ConfigMap watch stream failed.
    #[error("Watch stream error: {0}")]
    Watch(String),
}
