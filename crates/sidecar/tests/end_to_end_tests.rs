//! End-to-end reconciliation through the real HTTP client against mock
//! Kibana and Elasticsearch endpoints.
//!
//! # Invariants
//! - Saved objects reach Kibana in one bulk request, dependencies first
//! - Watches are PUT one by one with `active` in the query string

mod common;

use std::time::Duration;

use common::{GENERATE_ID_LABEL, added, labelled, test_config};
use kibana_sidecar::{Reconciler, SyncContext};
use serde_json::json;
use sidecar_client::testing::load_fixture;
use sidecar_client::{ElasticClient, RetryPolicy, WatcherApi};
use sidecar_config::DefaultActions;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ElasticClient {
    ElasticClient::builder()
        .kibana_base_url(server.uri())
        .elasticsearch_base_url(server.uri())
        .retry_policy(RetryPolicy::new(0, Duration::from_millis(5)))
        .build()
        .expect("client should build")
}

fn reconciler_for(server: &MockServer, api: WatcherApi) -> Reconciler<ElasticClient> {
    let config = test_config(Duration::from_secs(5));
    Reconciler::new(SyncContext::new(
        &config,
        api,
        DefaultActions::new(),
        client_for(server),
    ))
}

#[tokio::test]
async fn test_configmap_synced_to_kibana_and_elasticsearch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/saved_objects/_bulk_create"))
        .and(query_param("overwrite", "true"))
        .and(header("kbn-xsrf", "kibana-sidecar"))
        .and(body_json(json!([
            {"id": "logs-pattern", "type": "index-pattern", "attributes": {"title": "logs-*"}},
            {"id": "errors_by_host", "type": "visualization",
             "attributes": {"title": "Errors by host"},
             "references": [{"name": "idx", "type": "index-pattern", "id": "logs-pattern"}]}
        ])))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(load_fixture("saved_objects/bulk_create_success.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/_watcher/watch/cpu_high"))
        .and(query_param("active", "true"))
        .and(body_json(json!({"trigger": {"schedule": {"interval": "1m"}}})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(load_fixture("watcher/put_watch_created.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = reconciler_for(&server, WatcherApi::V7);
    let resource = labelled(&[
        (
            "objects.json",
            r#"[
                {"_id":"errors_by_host","_type":"visualization","_source":{"title":"Errors by host"},
                 "references":[{"name":"idx","type":"index-pattern","id":"logs-pattern"}]},
                {"_id":"logs-pattern","_type":"index-pattern","_source":{"title":"logs-*"}}
            ]"#,
        ),
        (
            "watch.json",
            r#"{"id":"cpu_high","trigger":{"schedule":{"interval":"1m"}}}"#,
        ),
    ]);

    let report = reconciler.handle_event(&added(resource)).await;

    assert!(report.all_succeeded(), "unexpected errors: {:?}", report.errors);
    assert_eq!(report.saved, vec!["logs-pattern", "errors_by_host"]);
    assert_eq!(report.rules, vec!["cpu_high"]);
}

#[tokio::test]
async fn test_kibana_partial_failure_reported_per_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/saved_objects/_bulk_create"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(load_fixture("saved_objects/bulk_create_partial.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = reconciler_for(&server, WatcherApi::V7);
    let resource = labelled(&[(
        "dash.json",
        r#"{"id":"broken_dashboard","type":"dashboard","attributes":{"title":"Broken"}}"#,
    )]);

    let report = reconciler.handle_event(&added(resource)).await;

    assert!(report.saved_failed.contains(&"broken_dashboard".to_string()));
    assert!(!report.all_succeeded());
}

#[tokio::test]
async fn test_rejected_watch_does_not_block_next_watch_on_v6() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/_xpack/watcher/watch/cpu_high"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(load_fixture("watcher/put_watch_parse_error.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/_xpack/watcher/watch/disk_full"))
        .and(query_param("active", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "disk_full"})))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = reconciler_for(&server, WatcherApi::V6);
    let resource = labelled(&[(
        "watches.json",
        r#"[
            {"id":"old","metadata":{"name":"CPU High"},"trigger":{}},
            {"id":"old2","active":false,"metadata":{"name":"Disk Full"},"trigger":{}}
        ]"#,
    )])
    .with_label(GENERATE_ID_LABEL, "true");

    let report = reconciler.handle_event(&added(resource)).await;

    assert_eq!(report.rules, vec!["disk_full"]);
    assert_eq!(report.rules_failed, vec!["cpu_high"]);
    assert_eq!(report.outcome(), "partial");
}

#[tokio::test]
async fn test_unsupported_elasticsearch_version_rejected_at_startup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("info/es8.json")))
        .mount(&server)
        .await;

    let result = client_for(&server).detect_watcher_api().await;
    assert!(matches!(
        result,
        Err(sidecar_client::ClientError::UnsupportedVersion(ref major)) if major == "8"
    ));
}
