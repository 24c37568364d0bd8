//! Elasticsearch root endpoint (`GET /`) model and version parsing.

use serde::Deserialize;

/// Body returned by `GET /` on Elasticsearch.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cluster_name: Option<String>,
    pub version: VersionInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    pub number: String,
}

/// A probed Elasticsearch version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticVersion {
    number: String,
}

impl ElasticVersion {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }

    /// Full version string, e.g. `7.17.3`.
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Major component, everything before the first `.`.
    pub fn major(&self) -> &str {
        self.number.split('.').next().unwrap_or_default()
    }
}
