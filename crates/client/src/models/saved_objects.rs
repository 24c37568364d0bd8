//! Saved-object bulk-create response models.

use serde::Deserialize;
use serde_json::Value;

/// Body returned by `POST /api/saved_objects/_bulk_create`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkCreateResponse {
    #[serde(default)]
    pub saved_objects: Vec<SavedObjectResult>,
}

/// Per-object entry of a bulk-create response.
#[derive(Debug, Clone, Deserialize)]
pub struct SavedObjectResult {
    pub id: String,
    #[serde(rename = "type", default)]
    pub object_type: Option<String>,
    /// Present when Kibana rejected this object.
    #[serde(default)]
    pub error: Option<Value>,
}

/// An object Kibana refused to save.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedObjectFailure {
    pub id: String,
    pub error: Value,
}

/// Aggregated result of one bulk-create call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkCreateOutcome {
    /// Ids Kibana reported as saved.
    pub saved: Vec<String>,
    /// Objects Kibana reported an error for.
    pub failed: Vec<SavedObjectFailure>,
}

impl BulkCreateOutcome {
    /// True only when no object in the response carried an error.
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

impl From<BulkCreateResponse> for BulkCreateOutcome {
    fn from(response: BulkCreateResponse) -> Self {
        let mut outcome = Self::default();
        for entry in response.saved_objects {
            match entry.error {
                Some(error) => outcome.failed.push(SavedObjectFailure {
                    id: entry.id,
                    error,
                }),
                None => outcome.saved.push(entry.id),
            }
        }
        outcome
    }
}
