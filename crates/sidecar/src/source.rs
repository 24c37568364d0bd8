//! ConfigMap events as seen by the reconciler.
//!
//! The reconciler depends only on [`EventSource`]; the cluster adapter
//! lives in [`crate::kube_source`].

use std::collections::BTreeMap;
use std::fmt;

use futures::stream::BoxStream;

use crate::error::SyncError;

/// Snapshot of a watched ConfigMap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigResource {
    pub namespace: String,
    pub name: String,
    /// `None` when the object carries no labels at all.
    pub labels: Option<BTreeMap<String, String>>,
    /// File name -> raw JSON content. `None` when the object has no data.
    pub data: Option<BTreeMap<String, String>>,
}

impl ConfigResource {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.data
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), content.into());
        self
    }

    pub fn has_label(&self, key: &str) -> bool {
        self.labels.as_ref().is_some_and(|l| l.contains_key(key))
    }

    pub fn label_value(&self, key: &str) -> Option<&str> {
        self.labels.as_ref()?.get(key).map(String::as_str)
    }
}

impl fmt::Display for ConfigResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// What happened to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Added,
    Modified,
    Deleted,
}

impl EventKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "ADDED",
            Self::Modified => "MODIFIED",
            Self::Deleted => "DELETED",
        }
    }

    pub const fn is_upsert(&self) -> bool {
        matches!(self, Self::Added | Self::Modified)
    }
}

/// One event carrying the full current state of the resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: EventKind,
    pub resource: ConfigResource,
}

impl WatchEvent {
    pub fn new(kind: EventKind, resource: ConfigResource) -> Self {
        Self { kind, resource }
    }
}

/// Producer of ordered ConfigMap events.
///
/// Each call to `subscribe` starts a fresh stream. An `Err` item or the end
/// of the stream means the subscription is gone and must be re-established.
pub trait EventSource: Send + Sync {
    fn subscribe(&self) -> BoxStream<'static, Result<WatchEvent, SyncError>>;
}
