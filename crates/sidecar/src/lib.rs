//! Kubernetes ConfigMap to Kibana/Elasticsearch sync.
//!
//! Watches ConfigMaps carrying an activation label and pushes the JSON
//! objects found in their data to Kibana (saved objects) and Elasticsearch
//! (watches). The pipeline per event is:
//!
//! 1. [`transform`] parses each file and canonicalizes export-format keys,
//!    optionally deriving ids from titles.
//! 2. [`ids`] rewrites references to replaced ids across the batch.
//! 3. [`objects`] classifies objects into saved objects and watches and
//!    orders saved objects so dependencies are created first.
//! 4. [`rules`] derives watch ids, merges default actions and splits off
//!    the URL parameters.
//! 5. [`reconcile`] performs the upstream writes through [`Upstream`].

pub mod context;
pub mod error;
pub mod ids;
pub mod kube_source;
pub mod objects;
pub mod reconcile;
pub mod rules;
pub mod source;
pub mod transform;
pub mod upstream;

pub use context::SyncContext;
pub use error::{Result, SyncError};
pub use ids::{IdRewriteMap, generate_id, rewrite_references};
pub use kube_source::KubeEventSource;
pub use objects::{
    Classified, RuleObject, SavedObject, SavedObjectType, SyncObject, classify, reorder,
};
pub use reconcile::{ReconcileReport, Reconciler, SkipReason};
pub use rules::{RuleUpload, WatchBody, prepare_rule_objects};
pub use source::{ConfigResource, EventKind, EventSource, WatchEvent};
pub use transform::{to_canonical, transform_payload};
pub use upstream::Upstream;
