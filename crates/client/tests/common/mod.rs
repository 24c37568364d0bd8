//! Common test utilities for integration tests.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Retry policies used here keep backoff in the millisecond range so tests stay fast
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)

use std::time::Duration;

#[allow(unused_imports)]
pub use sidecar_client::testing::load_fixture;

#[allow(unused_imports)]
pub use reqwest::Client;
#[allow(unused_imports)]
pub use sidecar_client::{ElasticClient, RetryPolicy, endpoints};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Retry policy with a tiny backoff for tests.
#[allow(dead_code)]
pub fn fast_retry(max_retries: usize) -> RetryPolicy {
    RetryPolicy::new(max_retries, Duration::from_millis(5))
}

/// Client pointing both APIs at the same mock server.
#[allow(dead_code)]
pub fn client_for(server: &MockServer, max_retries: usize) -> ElasticClient {
    ElasticClient::builder()
        .kibana_base_url(server.uri())
        .elasticsearch_base_url(server.uri())
        .retry_policy(fast_retry(max_retries))
        .build()
        .expect("client should build")
}
