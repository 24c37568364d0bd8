//! Client builder for constructing [`ElasticClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating required configuration (both base URLs)
//! - Normalizing base URLs (removing trailing slashes)
//! - Configuring the underlying HTTP client (timeouts, TLS verification)
//!
//! # What this module does NOT handle:
//! - Actual API calls (handled by [`ElasticClient`] methods in `mod.rs`)
//! - Retry execution (handled by [`crate::endpoints::send_request_with_retry`])
//!
//! # Invariants
//! - Both base URLs must be provided before calling `build()`
//! - `skip_verify` only affects HTTPS connections; HTTP connections log a warning

use std::time::Duration;

use sidecar_config::{
    Config, Credentials,
    constants::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT_SECS},
};

use crate::client::ElasticClient;
use crate::endpoints::RetryPolicy;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Builder for creating a new [`ElasticClient`].
pub struct ElasticClientBuilder {
    kibana_base_url: Option<String>,
    elasticsearch_base_url: Option<String>,
    credentials: Option<Credentials>,
    skip_verify: bool,
    timeout: Duration,
    retry: RetryPolicy,
    metrics: Option<MetricsCollector>,
}

impl Default for ElasticClientBuilder {
    fn default() -> Self {
        Self {
            kibana_base_url: None,
            elasticsearch_base_url: None,
            credentials: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            metrics: None,
        }
    }
}

impl ElasticClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Kibana base URL, e.g. `http://kibana:5601`.
    pub fn kibana_base_url(mut self, url: String) -> Self {
        self.kibana_base_url = Some(url);
        self
    }

    /// Set the Elasticsearch base URL, e.g. `http://elasticsearch:9200`.
    pub fn elasticsearch_base_url(mut self, url: String) -> Self {
        self.elasticsearch_base_url = Some(url);
        self
    }

    /// Set basic-auth credentials for both APIs.
    pub fn credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set whether to skip TLS certificate verification.
    ///
    /// # Security Warning
    /// Only use this against clusters with self-signed certificates you
    /// control. It disables protection against man-in-the-middle attacks.
    pub fn skip_verify(mut self, skip: bool) -> Self {
        self.skip_verify = skip;
        self
    }

    /// Set the request timeout. Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the transport retry policy.
    pub fn retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the metrics collector for request and sync metrics.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create a client builder from configuration.
    pub fn from_config(mut self, config: &Config) -> Self {
        let connection = &config.connection;
        self.kibana_base_url = Some(connection.kibana_base_url.clone());
        self.elasticsearch_base_url = Some(connection.elasticsearch_base_url.clone());
        self.credentials = connection.credentials.clone();
        self.skip_verify = connection.skip_verify;
        self.timeout = connection.timeout;
        self.retry = RetryPolicy::new(connection.max_retries, connection.retry_backoff);
        self
    }

    /// Normalize a base URL by removing trailing slashes.
    fn normalize_base_url(url: String) -> String {
        url.trim_end_matches('/').to_string()
    }

    /// Build the [`ElasticClient`] with the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if either base URL was not provided.
    /// Returns `ClientError::HttpError` if the HTTP client fails to build.
    pub fn build(self) -> Result<ElasticClient> {
        let kibana_base_url = self
            .kibana_base_url
            .map(Self::normalize_base_url)
            .ok_or_else(|| ClientError::InvalidUrl("kibana_base_url is required".to_string()))?;
        let elasticsearch_base_url = self
            .elasticsearch_base_url
            .map(Self::normalize_base_url)
            .ok_or_else(|| {
                ClientError::InvalidUrl("elasticsearch_base_url is required".to_string())
            })?;

        let mut http_builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(DEFAULT_MAX_REDIRECTS));

        if self.skip_verify {
            let any_https = kibana_base_url.starts_with("https://")
                || elasticsearch_base_url.starts_with("https://");
            if any_https {
                http_builder = http_builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "skip_verify=true has no effect on HTTP URLs. TLS verification only applies to HTTPS connections."
                );
            }
        }

        let http = http_builder.build()?;

        Ok(ElasticClient {
            http,
            kibana_base_url,
            elasticsearch_base_url,
            credentials: self.credentials,
            retry: self.retry,
            metrics: self.metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use sidecar_config::{ConnectionConfig, LoggingConfig, NamespaceScope, WatchConfig};

    fn sample_config() -> Config {
        Config {
            connection: ConnectionConfig {
                kibana_base_url: "https://kibana.example.com:5601".to_string(),
                elasticsearch_base_url: "https://es.example.com:9200".to_string(),
                credentials: Some(Credentials::new(
                    "elastic",
                    SecretString::new("changeme".to_string().into()),
                )),
                skip_verify: true,
                timeout: Duration::from_secs(10),
                max_retries: 2,
                retry_backoff: Duration::from_millis(50),
            },
            watch: WatchConfig {
                label: "kibana_object".to_string(),
                generate_id_label: "generate_id_from_title".to_string(),
                namespace: NamespaceScope::Current,
                retry_interval: Duration::from_secs(5),
            },
            logging: LoggingConfig::default(),
            default_actions_path: None,
        }
    }

    #[test]
    fn test_from_config() {
        let client = ElasticClient::builder()
            .from_config(&sample_config())
            .build()
            .unwrap();

        assert_eq!(client.kibana_base_url(), "https://kibana.example.com:5601");
        assert_eq!(client.elasticsearch_base_url(), "https://es.example.com:9200");
        assert_eq!(
            *client.retry_policy(),
            RetryPolicy::new(2, Duration::from_millis(50))
        );
        assert!(client.credentials.is_some());
    }

    #[test]
    fn test_missing_kibana_url() {
        let result = ElasticClient::builder()
            .elasticsearch_base_url("http://es:9200".to_string())
            .build();
        assert!(matches!(result.unwrap_err(), ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_missing_elasticsearch_url() {
        let result = ElasticClient::builder()
            .kibana_base_url("http://kibana:5601".to_string())
            .build();
        assert!(matches!(result.unwrap_err(), ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_normalizes_trailing_slashes() {
        let client = ElasticClient::builder()
            .kibana_base_url("http://kibana:5601//".to_string())
            .elasticsearch_base_url("http://es:9200/".to_string())
            .build()
            .unwrap();
        assert_eq!(client.kibana_base_url(), "http://kibana:5601");
        assert_eq!(client.elasticsearch_base_url(), "http://es:9200");
    }

    #[test]
    fn test_skip_verify_with_http_urls_still_builds() {
        let client = ElasticClient::builder()
            .kibana_base_url("http://kibana:5601".to_string())
            .elasticsearch_base_url("http://es:9200".to_string())
            .skip_verify(true)
            .build();
        assert!(client.is_ok());
    }
}
