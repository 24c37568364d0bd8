//! Watcher API path selection and response model.

use serde::Deserialize;

use crate::error::ClientError;

/// Flavour of the Elasticsearch watcher API, chosen by major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherApi {
    /// Elasticsearch 6.x: `_xpack/watcher/watch`
    V6,
    /// Elasticsearch 7.x: `_watcher/watch`
    V7,
}

impl WatcherApi {
    /// Select the API for a major version string such as `"7"`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnsupportedVersion`] for any major version
    /// other than 6 or 7.
    pub fn from_major(major: &str) -> Result<Self, ClientError> {
        match major {
            "6" => Ok(Self::V6),
            "7" => Ok(Self::V7),
            other => Err(ClientError::UnsupportedVersion(other.to_string())),
        }
    }

    /// Path of the watch collection, relative to the Elasticsearch base URL.
    pub const fn path_prefix(&self) -> &'static str {
        match self {
            Self::V6 => "_xpack/watcher/watch",
            Self::V7 => "_watcher/watch",
        }
    }
}

/// Body returned by `PUT {prefix}/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PutWatchResponse {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_version", default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub created: Option<bool>,
}
