//! Kibana saved-object bulk create.

use reqwest::Client;
use serde::Serialize;
use sidecar_config::Credentials;
use tracing::debug;

use crate::endpoints::{RetryPolicy, send_request_with_retry, with_common_headers};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{BulkCreateOutcome, BulkCreateResponse};

const BULK_CREATE_PATH: &str = "/api/saved_objects/_bulk_create";

/// Create or overwrite a batch of saved objects in one call.
///
/// Objects are sent as-is with `overwrite=true`. Only HTTP 200 counts as
/// success; per-object failures inside a 200 response are reported in the
/// returned [`BulkCreateOutcome`], not as an error.
pub async fn bulk_create_saved_objects<T: Serialize + ?Sized>(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    objects: &T,
    retry: &RetryPolicy,
    metrics: Option<&MetricsCollector>,
) -> Result<BulkCreateOutcome> {
    let url = format!("{}{}", base_url, BULK_CREATE_PATH);

    let builder = with_common_headers(client.post(&url), credentials)
        .query(&[("overwrite", "true")])
        .json(objects);
    let response =
        send_request_with_retry(builder, retry, BULK_CREATE_PATH, "POST", false, metrics).await?;

    let status = response.status().as_u16();
    if status != 200 {
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::ApiError {
            status,
            url,
            message: format!("expected HTTP 200 from bulk create: {}", body),
        });
    }

    let body = response.text().await?;
    let parsed: BulkCreateResponse = serde_json::from_str(&body).map_err(|e| {
        ClientError::InvalidResponse(format!("Failed to parse bulk create response: {}", e))
    })?;

    let outcome = BulkCreateOutcome::from(parsed);
    debug!(
        saved = outcome.saved.len(),
        failed = outcome.failed.len(),
        "Bulk create finished"
    );
    Ok(outcome)
}
