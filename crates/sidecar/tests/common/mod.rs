//! Common test utilities for sidecar integration tests.
//!
//! # Invariants
//! - [`FakeUpstream`] records every call in order and never touches the network.
//! - [`ScriptedSource`] hands out one scripted stream per subscription, then
//!   streams that never yield.

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use serde_json::{Value, json};
use sidecar_client::{BulkCreateOutcome, ClientError, SavedObjectFailure, WatcherApi};
use sidecar_config::{Config, ConfigLoader, DefaultActions};

#[allow(unused_imports)]
pub use kibana_sidecar::{
    ConfigResource, EventKind, EventSource, ReconcileReport, Reconciler, RuleUpload, SavedObject,
    SkipReason, SyncContext, SyncError, Upstream, WatchEvent,
};

pub const LABEL: &str = "kibana_object";
pub const GENERATE_ID_LABEL: &str = "generate_id_from_title";

/// One upstream write as observed by [`FakeUpstream`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SavedObjects(Vec<Value>),
    Rule {
        api: WatcherApi,
        id: String,
        active: String,
        body: Value,
    },
}

#[derive(Debug, Default)]
struct Behaviour {
    reject_saved: HashSet<String>,
    fail_bulk: bool,
    fail_rules: HashSet<String>,
}

/// In-memory [`Upstream`] that records calls.
#[derive(Debug, Clone, Default)]
pub struct FakeUpstream {
    calls: Arc<Mutex<Vec<Call>>>,
    behaviour: Arc<Mutex<Behaviour>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kibana reports a per-object error for `id`.
    pub fn reject_saved_object(self, id: &str) -> Self {
        self.behaviour
            .lock()
            .unwrap()
            .reject_saved
            .insert(id.to_string());
        self
    }

    /// The whole bulk-create request fails.
    pub fn fail_bulk_create(self) -> Self {
        self.behaviour.lock().unwrap().fail_bulk = true;
        self
    }

    /// Storing the watch `id` fails.
    pub fn fail_rule(self, id: &str) -> Self {
        self.behaviour
            .lock()
            .unwrap()
            .fail_rules
            .insert(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn saved_object_calls(&self) -> Vec<Vec<Value>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SavedObjects(objects) => Some(objects),
                Call::Rule { .. } => None,
            })
            .collect()
    }

    pub fn rule_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Rule { .. }))
            .collect()
    }
}

fn api_error(status: u16, message: &str) -> ClientError {
    ClientError::ApiError {
        status,
        url: "http://fake".to_string(),
        message: message.to_string(),
    }
}

impl Upstream for FakeUpstream {
    async fn upsert_saved_objects(
        &self,
        objects: &[SavedObject],
    ) -> Result<BulkCreateOutcome, ClientError> {
        let values: Vec<Value> = objects
            .iter()
            .map(|o| serde_json::to_value(o).unwrap())
            .collect();
        self.calls.lock().unwrap().push(Call::SavedObjects(values));

        let behaviour = self.behaviour.lock().unwrap();
        if behaviour.fail_bulk {
            return Err(api_error(500, "bulk create failed"));
        }

        let mut outcome = BulkCreateOutcome::default();
        for object in objects {
            let id = object.id.clone().unwrap_or_default();
            if behaviour.reject_saved.contains(&id) {
                outcome.failed.push(SavedObjectFailure {
                    id,
                    error: json!({"statusCode": 400, "message": "rejected"}),
                });
            } else {
                outcome.saved.push(id);
            }
        }
        Ok(outcome)
    }

    async fn upsert_rule(&self, api: WatcherApi, rule: &RuleUpload) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(Call::Rule {
            api,
            id: rule.id.clone(),
            active: rule.active.clone(),
            body: serde_json::to_value(&rule.body).unwrap(),
        });

        if self.behaviour.lock().unwrap().fail_rules.contains(&rule.id) {
            return Err(api_error(400, "could not parse watch"));
        }
        Ok(())
    }
}

/// [`EventSource`] that replays scripted subscriptions.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<VecDeque<Vec<Result<WatchEvent, SyncError>>>>,
    subscribed_at: Mutex<Vec<tokio::time::Instant>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the items the next subscription yields before ending.
    pub fn then(self, items: Vec<Result<WatchEvent, SyncError>>) -> Self {
        self.scripts.lock().unwrap().push_back(items);
        self
    }

    pub fn subscriptions(&self) -> Vec<tokio::time::Instant> {
        self.subscribed_at.lock().unwrap().clone()
    }
}

impl EventSource for ScriptedSource {
    fn subscribe(&self) -> BoxStream<'static, Result<WatchEvent, SyncError>> {
        self.subscribed_at
            .lock()
            .unwrap()
            .push(tokio::time::Instant::now());
        match self.scripts.lock().unwrap().pop_front() {
            Some(items) => stream::iter(items).boxed(),
            None => stream::pending().boxed(),
        }
    }
}

/// Configuration as the loader would produce it for tests.
pub fn test_config(retry_interval: Duration) -> Config {
    ConfigLoader::new()
        .with_label(LABEL.to_string())
        .with_kibana_base_url("http://kibana:5601".to_string())
        .with_elasticsearch_base_url("http://elasticsearch:9200".to_string())
        .with_watch_retry_interval(retry_interval)
        .build()
        .expect("test config should build")
}

pub fn reconciler(upstream: FakeUpstream) -> Reconciler<FakeUpstream> {
    reconciler_with_defaults(upstream, DefaultActions::new())
}

pub fn reconciler_with_defaults(
    upstream: FakeUpstream,
    defaults: DefaultActions,
) -> Reconciler<FakeUpstream> {
    let config = test_config(Duration::from_secs(5));
    Reconciler::new(SyncContext::new(&config, WatcherApi::V7, defaults, upstream))
}

/// A labelled ConfigMap holding `files`.
pub fn labelled(files: &[(&str, &str)]) -> ConfigResource {
    let mut resource = ConfigResource::new("monitoring", "kibana-objects").with_label(LABEL, "1");
    for (name, content) in files {
        resource = resource.with_file(*name, *content);
    }
    resource
}

pub fn added(resource: ConfigResource) -> WatchEvent {
    WatchEvent::new(EventKind::Added, resource)
}
