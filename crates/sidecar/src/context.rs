//! Process-wide settings shared by every reconciliation.

use std::time::Duration;

use sidecar_client::{MetricsCollector, WatcherApi};
use sidecar_config::{Config, DefaultActions, NamespaceScope};

use crate::upstream::Upstream;

/// Everything the reconciler needs, built once at startup.
///
/// Read-only after construction; per-event state lives in the reconciler's
/// locals and is dropped when the event is done.
#[derive(Debug, Clone)]
pub struct SyncContext<U> {
    /// Label whose presence marks a ConfigMap as managed.
    pub label: String,
    /// Label whose value `"true"` enables id generation.
    pub generate_id_label: String,
    /// Namespaces being watched, for log context.
    pub namespace: NamespaceScope,
    /// Minimum delay between watch re-subscriptions.
    pub watch_retry_interval: Duration,
    /// Watcher API flavour probed at startup.
    pub watcher_api: WatcherApi,
    /// Actions merged into every watch.
    pub default_actions: DefaultActions,
    pub upstream: U,
    pub metrics: MetricsCollector,
}

impl<U: Upstream> SyncContext<U> {
    /// Assemble the context from loaded configuration and startup probes.
    pub fn new(
        config: &Config,
        watcher_api: WatcherApi,
        default_actions: DefaultActions,
        upstream: U,
    ) -> Self {
        Self {
            label: config.watch.label.clone(),
            generate_id_label: config.watch.generate_id_label.clone(),
            namespace: config.watch.namespace.clone(),
            watch_retry_interval: config.watch.retry_interval,
            watcher_api,
            default_actions,
            upstream,
            metrics: MetricsCollector::disabled(),
        }
    }

    /// Record sync metrics through `metrics`.
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }
}
