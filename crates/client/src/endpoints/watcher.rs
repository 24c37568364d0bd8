//! Elasticsearch watcher endpoints.

use reqwest::Client;
use serde::Serialize;
use sidecar_config::Credentials;
use tracing::debug;

use crate::endpoints::url_encoding::encode_path_segment;
use crate::endpoints::{RetryPolicy, send_request_with_retry, with_common_headers};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{PutWatchResponse, WatcherApi};

/// Create or replace a watch.
///
/// `PUT {base}/{api prefix}/{id}?active={active}`, with `active` sent as
/// given. HTTP 200 and 201 are both success. A success body that does not parse is tolerated and yields
/// an empty [`PutWatchResponse`].
#[allow(clippy::too_many_arguments)]
pub async fn put_watch<T: Serialize + ?Sized>(
    client: &Client,
    base_url: &str,
    credentials: Option<&Credentials>,
    api: WatcherApi,
    id: &str,
    active: &str,
    body: &T,
    retry: &RetryPolicy,
    metrics: Option<&MetricsCollector>,
) -> Result<PutWatchResponse> {
    let prefix = api.path_prefix();
    let url = format!("{}/{}/{}", base_url, prefix, encode_path_segment(id));

    let builder = with_common_headers(client.put(&url), credentials)
        .query(&[("active", active)])
        .json(body);
    let endpoint = format!("/{}/{{id}}", prefix);
    let response = send_request_with_retry(builder, retry, &endpoint, "PUT", true, metrics).await?;

    let status = response.status().as_u16();
    if status != 200 && status != 201 {
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::ApiError {
            status,
            url,
            message: body,
        });
    }

    let text = response.text().await?;
    match serde_json::from_str::<PutWatchResponse>(&text) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            debug!(id, error = %e, "Unparseable put-watch response body");
            Ok(PutWatchResponse::default())
        }
    }
}
