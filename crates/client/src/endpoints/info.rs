//! Elasticsearch root endpoint.

use reqwest::Client;
use sidecar_config::Credentials;

use crate::endpoints::{RetryPolicy, send_request_with_retry, with_common_headers};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::ClusterInfo;

/// Fetch `GET {base}/`, which carries the cluster name and version.
pub async fn get_cluster_info(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    retry: &RetryPolicy,
    metrics: Option<&MetricsCollector>,
) -> Result<ClusterInfo> {
    let url = format!("{}/", base_url);

    let builder = with_common_headers(client.get(&url), credentials);
    let response = send_request_with_retry(builder, retry, "/", "GET", true, metrics).await?;

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        ClientError::InvalidResponse(format!("Failed to parse cluster info: {}", e))
    })
}
