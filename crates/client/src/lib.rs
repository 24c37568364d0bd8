//! Kibana and Elasticsearch REST clients for the sidecar.
//!
//! This crate provides a type-safe client for the two upstream APIs the
//! sidecar writes to: the Kibana saved-object bulk-create API and the
//! Elasticsearch watcher API, plus the version probe used at startup.
//! Transport retries, request metrics and telemetry setup live here too.

pub mod client;
pub mod endpoints;
pub mod error;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;
pub mod telemetry;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use client::ElasticClient;
pub use client::builder::ElasticClientBuilder;
pub use endpoints::RetryPolicy;
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector, ObjectFamily};
pub use metrics_exporter::{MetricsExporter, MetricsExporterError};
pub use models::{
    BulkCreateOutcome, BulkCreateResponse, ClusterInfo, ElasticVersion, PutWatchResponse,
    SavedObjectFailure, SavedObjectResult, WatcherApi,
};
pub use telemetry::{TelemetryConfig, TelemetryError, TelemetryGuard};
