//! Combined Kibana and Elasticsearch client.
//!
//! This module provides [`ElasticClient`], the single handle the sidecar
//! uses for every upstream call.
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Deciding what to upload (the sidecar crate classifies and prepares objects)
//!
//! # Invariants
//! - Both base URLs are stored without trailing slashes
//! - The same credentials, retry policy and metrics apply to both APIs

pub mod builder;

use serde::Serialize;
use sidecar_config::Credentials;

use crate::endpoints::{self, RetryPolicy};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::{BulkCreateOutcome, ElasticVersion, PutWatchResponse, WatcherApi};

/// Client for the Kibana saved-object API and the Elasticsearch watcher API.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use sidecar_client::ElasticClient;
///
/// let client = ElasticClient::builder()
///     .kibana_base_url("http://kibana:5601".to_string())
///     .elasticsearch_base_url("http://elasticsearch:9200".to_string())
///     .build()?;
/// let version = client.probe_version().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ElasticClient {
    pub(crate) http: reqwest::Client,
    pub(crate) kibana_base_url: String,
    pub(crate) elasticsearch_base_url: String,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) retry: RetryPolicy,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl ElasticClient {
    /// Create a new client builder.
    pub fn builder() -> builder::ElasticClientBuilder {
        builder::ElasticClientBuilder::new()
    }

    /// Get the Kibana base URL.
    pub fn kibana_base_url(&self) -> &str {
        &self.kibana_base_url
    }

    /// Get the Elasticsearch base URL.
    pub fn elasticsearch_base_url(&self) -> &str {
        &self.elasticsearch_base_url
    }

    /// Get the transport retry policy.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Get the metrics collector, if one was configured.
    pub fn metrics(&self) -> Option<&MetricsCollector> {
        self.metrics.as_ref()
    }

    /// Upload saved objects to Kibana with `overwrite=true`.
    pub async fn bulk_create_saved_objects<T: Serialize>(
        &self,
        objects: &[T],
    ) -> Result<BulkCreateOutcome> {
        endpoints::bulk_create_saved_objects(
            &self.http,
            &self.kibana_base_url,
            self.credentials.as_ref(),
            objects,
            &self.retry,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Create or replace one watch on Elasticsearch.
    pub async fn put_watch<T: Serialize>(
        &self,
        api: WatcherApi,
        id: &str,
        active: &str,
        body: &T,
    ) -> Result<PutWatchResponse> {
        endpoints::put_watch(
            &self.http,
            &self.elasticsearch_base_url,
            self.credentials.as_ref(),
            api,
            id,
            active,
            body,
            &self.retry,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Read the Elasticsearch version from `GET /`.
    pub async fn probe_version(&self) -> Result<ElasticVersion> {
        let info = endpoints::get_cluster_info(
            &self.http,
            &self.elasticsearch_base_url,
            self.credentials.as_ref(),
            &self.retry,
            self.metrics.as_ref(),
        )
        .await?;

        tracing::info!(
            version = %info.version.number,
            cluster = info.cluster_name.as_deref().unwrap_or("unknown"),
            "Probed Elasticsearch"
        );
        Ok(ElasticVersion::new(info.version.number))
    }

    /// Probe the version and select the matching watcher API.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClientError::UnsupportedVersion`] for major versions
    /// other than 6 and 7.
    pub async fn detect_watcher_api(&self) -> Result<(ElasticVersion, WatcherApi)> {
        let version = self.probe_version().await?;
        let api = WatcherApi::from_major(version.major())?;
        Ok((version, api))
    }
}
