//! [`EventSource`] backed by a Kubernetes ConfigMap watch.

use futures::StreamExt;
use futures::stream::BoxStream;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::runtime::watcher::{self, Event};
use kube::{Api, Client};
use sidecar_config::NamespaceScope;
use tracing::{debug, info};

use crate::error::SyncError;
use crate::source::{ConfigResource, EventKind, EventSource, WatchEvent};

impl From<ConfigMap> for ConfigResource {
    fn from(cm: ConfigMap) -> Self {
        Self {
            namespace: cm.metadata.namespace.unwrap_or_default(),
            name: cm.metadata.name.unwrap_or_default(),
            labels: cm.metadata.labels,
            data: cm.data,
        }
    }
}

/// Map a watcher event to a reconciler event.
///
/// Objects listed during the initial sync count as added; later applies
/// count as modified (the watcher does not distinguish creation from
/// update). Init markers carry no object and are skipped.
fn map_event(event: Event<ConfigMap>) -> Option<WatchEvent> {
    match event {
        Event::InitApply(cm) => Some(WatchEvent::new(EventKind::Added, cm.into())),
        Event::Apply(cm) => Some(WatchEvent::new(EventKind::Modified, cm.into())),
        Event::Delete(cm) => Some(WatchEvent::new(EventKind::Deleted, cm.into())),
        Event::Init | Event::InitDone => {
            debug!("ConfigMap watcher (re)initialized");
            None
        }
    }
}

/// Watches ConfigMaps in the configured namespace scope.
#[derive(Clone)]
pub struct KubeEventSource {
    api: Api<ConfigMap>,
}

impl KubeEventSource {
    pub fn new(client: Client, scope: &NamespaceScope) -> Self {
        let api = match scope {
            NamespaceScope::Current => {
                info!(namespace = %client.default_namespace(), "Watching ConfigMaps in current namespace");
                Api::default_namespaced(client)
            }
            NamespaceScope::All => {
                info!("Watching ConfigMaps in ALL namespaces");
                Api::all(client)
            }
            NamespaceScope::Named(ns) => {
                info!(namespace = %ns, "Watching ConfigMaps in namespace");
                Api::namespaced(client, ns)
            }
        };
        Self { api }
    }
}

impl EventSource for KubeEventSource {
    fn subscribe(&self) -> BoxStream<'static, Result<WatchEvent, SyncError>> {
        watcher::watcher(self.api.clone(), watcher::Config::default())
            .filter_map(|event| async move {
                match event {
                    Ok(event) => map_event(event).map(Ok),
                    Err(e) => Some(Err(SyncError::Watch(e.to_string()))),
                }
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn config_map() -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some("dashboards".to_string()),
                namespace: Some("monitoring".to_string()),
                labels: Some(BTreeMap::from([(
                    "kibana_object".to_string(),
                    "true".to_string(),
                )])),
                ..ObjectMeta::default()
            },
            data: Some(BTreeMap::from([(
                "dash.json".to_string(),
                "{}".to_string(),
            )])),
            ..ConfigMap::default()
        }
    }

    #[test]
    fn test_config_map_conversion() {
        let resource = ConfigResource::from(config_map());
        assert_eq!(resource.to_string(), "monitoring/dashboards");
        assert!(resource.has_label("kibana_object"));
        assert_eq!(
            resource.data.unwrap().get("dash.json").map(String::as_str),
            Some("{}")
        );
    }

    #[test]
    fn test_event_mapping() {
        let kind = |e| map_event(e).map(|w| w.kind);
        assert_eq!(kind(Event::InitApply(config_map())), Some(EventKind::Added));
        assert_eq!(kind(Event::Apply(config_map())), Some(EventKind::Modified));
        assert_eq!(kind(Event::Delete(config_map())), Some(EventKind::Deleted));
        assert_eq!(kind(Event::Init), None);
        assert_eq!(kind(Event::InitDone), None);
    }
}
