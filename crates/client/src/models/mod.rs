//! Data models for Kibana and Elasticsearch API responses.
//!
//! Request bodies are built by the caller (the sidecar forwards objects it
//! parsed from ConfigMaps as-is), so this module mostly describes responses.

mod info;
mod saved_objects;
mod watcher;

pub use info::{ClusterInfo, ElasticVersion, VersionInfo};
pub use saved_objects::{
    BulkCreateOutcome, BulkCreateResponse, SavedObjectFailure, SavedObjectResult,
};
pub use watcher::{PutWatchResponse, WatcherApi};
