//! The watch-driven reconciliation loop.
//!
//! Responsibilities:
//! - Turn one ConfigMap event into upstream writes ([`Reconciler::handle_event`]).
//! - Keep a watch subscription alive for the life of the process ([`Reconciler::run`]).
//!
//! Does NOT handle:
//! - Transport retries (done per request in the client crate).
//! - Propagating deletions upstream; delete events are reported as not implemented.
//!
//! Invariants:
//! - Events are handled one at a time in delivery order; an event in progress
//!   always runs to completion, even when shutdown is requested.
//! - Nothing that goes wrong while handling one event stops the loop. Errors
//!   are collected in the [`ReconcileReport`] and logged with the resource.
//! - Re-subscriptions are spaced by at least the configured retry interval.
//! - The id rewrite map and object batch live only for one event.

use std::collections::BTreeMap;
use std::future::Future;

use futures::StreamExt;
use serde_json::Value;
use sidecar_client::ObjectFamily;
use tracing::{debug, error, info, warn};

use crate::context::SyncContext;
use crate::error::SyncError;
use crate::ids::{IdRewriteMap, rewrite_references};
use crate::objects::{RuleObject, SavedObject, classify, reorder};
use crate::rules::prepare_rule_objects;
use crate::source::{ConfigResource, EventSource, WatchEvent};
use crate::transform::transform_payload;
use crate::upstream::Upstream;

/// Why an event was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The ConfigMap has no labels at all.
    NoLabels,
    /// The activation label is absent.
    NotLabelled,
    /// The ConfigMap has no data.
    NoData,
}

/// What happened while handling one event.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// `namespace/name` of the resource.
    pub resource: String,
    pub skipped: Option<SkipReason>,
    /// Saved-object ids Kibana accepted, in upload order.
    pub saved: Vec<String>,
    /// Saved-object ids that were rejected or never accepted.
    pub saved_failed: Vec<String>,
    /// Watch ids Elasticsearch accepted.
    pub rules: Vec<String>,
    /// Watch ids (or `<none>`) that could not be stored.
    pub rules_failed: Vec<String>,
    /// Objects that matched neither family.
    pub dropped: usize,
    /// Non-fatal errors, in the order they occurred.
    pub errors: Vec<SyncError>,
}

impl ReconcileReport {
    fn new(event: &WatchEvent) -> Self {
        Self {
            resource: event.resource.to_string(),
            ..Self::default()
        }
    }

    fn skipped(mut self, reason: SkipReason) -> Self {
        self.skipped = Some(reason);
        self
    }

    /// True when no error of any kind was recorded.
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty() && self.saved_failed.is_empty() && self.rules_failed.is_empty()
    }

    /// Summary label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        if self.skipped.is_some() {
            "skipped"
        } else if self.all_succeeded() {
            "synced"
        } else if self.saved.is_empty() && self.rules.is_empty() {
            "failed"
        } else {
            "partial"
        }
    }
}

/// Drives [`SyncContext::upstream`] from a stream of ConfigMap events.
pub struct Reconciler<U> {
    ctx: SyncContext<U>,
}

impl<U: Upstream> Reconciler<U> {
    pub fn new(ctx: SyncContext<U>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &SyncContext<U> {
        &self.ctx
    }

    /// Reconcile one event.
    pub async fn handle_event(&self, event: &WatchEvent) -> ReconcileReport {
        let report = self.evaluate(event).await;
        self.ctx.metrics.record_reconciliation(report.outcome());

        match report.outcome() {
            "skipped" => {}
            "synced" => info!(
                resource = %report.resource,
                kind = event.kind.as_str(),
                saved = report.saved.len(),
                watches = report.rules.len(),
                "ConfigMap reconciled"
            ),
            outcome => error!(
                resource = %report.resource,
                kind = event.kind.as_str(),
                outcome,
                errors = report.errors.len(),
                saved_failed = report.saved_failed.len(),
                rules_failed = report.rules_failed.len(),
                "ConfigMap reconciled with failures"
            ),
        }
        report
    }

    async fn evaluate(&self, event: &WatchEvent) -> ReconcileReport {
        let report = ReconcileReport::new(event);
        let resource = &event.resource;

        if resource.labels.is_none() {
            return report.skipped(SkipReason::NoLabels);
        }
        debug!(resource = %resource, "Inspecting ConfigMap");
        if !resource.has_label(&self.ctx.label) {
            return report.skipped(SkipReason::NotLabelled);
        }
        info!(resource = %resource, label = %self.ctx.label, "ConfigMap with label found");

        let Some(data) = &resource.data else {
            info!(resource = %resource, "ConfigMap does not have data");
            return report.skipped(SkipReason::NoData);
        };

        let generate_ids = resource.label_value(&self.ctx.generate_id_label) == Some("true");
        self.process_files(event, data, generate_ids, report).await
    }

    async fn process_files(
        &self,
        event: &WatchEvent,
        data: &BTreeMap<String, String>,
        generate_ids: bool,
        mut report: ReconcileReport,
    ) -> ReconcileReport {
        let resource = &event.resource;
        let mut ids = IdRewriteMap::new();
        let mut batch: Vec<Value> = Vec::new();

        for (file, raw) in data {
            info!(resource = %resource, file = %file, kind = event.kind.as_str(), "File in ConfigMap");

            if !event.kind.is_upsert() {
                let err = SyncError::DeleteNotImplemented { file: file.clone() };
                warn!(resource = %resource, file = %file, error = %err, "Delete event not propagated");
                report.errors.push(err);
                continue;
            }

            match transform_payload(raw, generate_ids, &mut ids) {
                Ok(objects) => batch.extend(objects),
                Err(source) => {
                    let err = SyncError::InvalidPayload {
                        file: file.clone(),
                        source,
                    };
                    error!(resource = %resource, file = %file, error = %err, "Skipping file");
                    report.errors.push(err);
                }
            }
        }

        if batch.is_empty() {
            return report;
        }

        if generate_ids {
            batch = match rewrite_references(&ids, batch) {
                Ok(rewritten) => rewritten,
                Err(e) => {
                    let err = SyncError::RewriteFailed(e);
                    error!(resource = %resource, error = %err, "Abandoning batch");
                    report.errors.push(err);
                    return report;
                }
            };
        }

        let classified = classify(batch);
        report.dropped = classified.dropped;

        self.sync_saved_objects(resource, reorder(classified.saved), &mut report)
            .await;

        let rules = prepare_rule_objects(classified.rules, generate_ids, &self.ctx.default_actions);
        if rules.is_empty() {
            info!(resource = %resource, "No watches to process");
        } else {
            self.sync_rules(resource, rules, &mut report).await;
        }

        report
    }

    async fn sync_saved_objects(
        &self,
        resource: &ConfigResource,
        saved: Vec<SavedObject>,
        report: &mut ReconcileReport,
    ) {
        if saved.is_empty() {
            return;
        }

        info!(resource = %resource, count = saved.len(), "Creating/updating saved objects");
        let metrics = &self.ctx.metrics;

        match self.ctx.upstream.upsert_saved_objects(&saved).await {
            Ok(outcome) => {
                for failure in &outcome.failed {
                    error!(
                        resource = %resource,
                        id = %failure.id,
                        error = %failure.error,
                        "Failed to save object"
                    );
                }
                for id in &outcome.saved {
                    debug!(resource = %resource, id = %id, "Saved object");
                }
                if outcome.all_succeeded() {
                    info!(resource = %resource, "All saved objects were stored");
                }
                metrics.record_objects_synced(ObjectFamily::SavedObject, outcome.saved.len());
                metrics.record_objects_failed(ObjectFamily::SavedObject, outcome.failed.len());
                report.saved = outcome.saved;
                report
                    .saved_failed
                    .extend(outcome.failed.into_iter().map(|f| f.id));
            }
            Err(e) => {
                error!(resource = %resource, error = %e, "Failed to save objects");
                metrics.record_objects_failed(ObjectFamily::SavedObject, saved.len());
                report
                    .saved_failed
                    .extend(saved.iter().map(SavedObject::display_id));
                report.errors.push(SyncError::Upstream(e));
            }
        }
    }

    async fn sync_rules(
        &self,
        resource: &ConfigResource,
        rules: Vec<RuleObject>,
        report: &mut ReconcileReport,
    ) {
        info!(resource = %resource, count = rules.len(), "Creating/updating watches");
        let metrics = &self.ctx.metrics;

        for rule in rules {
            let upload = match rule.into_upload() {
                Ok(upload) => upload,
                Err(err) => {
                    error!(resource = %resource, error = %err, "Skipping watch");
                    metrics.record_objects_failed(ObjectFamily::Watch, 1);
                    report.rules_failed.push("<none>".to_string());
                    report.errors.push(err);
                    continue;
                }
            };

            match self.ctx.upstream.upsert_rule(self.ctx.watcher_api, &upload).await {
                Ok(()) => {
                    info!(resource = %resource, id = %upload.id, "Watch saved");
                    metrics.record_objects_synced(ObjectFamily::Watch, 1);
                    report.rules.push(upload.id);
                }
                Err(e) => {
                    error!(resource = %resource, id = %upload.id, error = %e, "Failed to save watch");
                    metrics.record_objects_failed(ObjectFamily::Watch, 1);
                    report.rules_failed.push(upload.id);
                    report.errors.push(SyncError::Upstream(e));
                }
            }
        }
    }

    /// Consume events from `source` until `shutdown` resolves.
    ///
    /// A failed or finished subscription is logged and re-established after
    /// the context's retry interval. Returns only on shutdown.
    pub async fn run<S, F>(&self, source: &S, shutdown: F)
    where
        S: EventSource,
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let interval = self.ctx.watch_retry_interval;

        loop {
            info!(namespace = %self.ctx.namespace, "Subscribing to ConfigMap events");
            let mut stream = source.subscribe();

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown => {
                        info!("Shutdown requested, stopping watch");
                        return;
                    }
                    item = stream.next() => match item {
                        Some(Ok(event)) => {
                            self.handle_event(&event).await;
                        }
                        Some(Err(e)) => {
                            error!(error = %e, "Error while watching for changes, re-establishing watch");
                            break;
                        }
                        None => {
                            warn!("Watch stream ended, re-establishing watch");
                            break;
                        }
                    }
                }
            }

            drop(stream);
            self.ctx.metrics.record_watch_restart();

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping watch");
                    return;
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}
