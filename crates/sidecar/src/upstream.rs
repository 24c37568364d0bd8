//! The two upstream writes the reconciler depends on.
//!
//! [`ElasticClient`] is the production implementation. Tests drive the
//! reconciler with an in-memory implementation instead.

use std::future::Future;

use sidecar_client::{BulkCreateOutcome, ClientError, ElasticClient, WatcherApi};

use crate::objects::SavedObject;
use crate::rules::RuleUpload;

/// Upsert operations against Kibana and Elasticsearch.
pub trait Upstream: Send + Sync {
    /// Bulk create-or-overwrite of saved objects, in the given order.
    fn upsert_saved_objects(
        &self,
        objects: &[SavedObject],
    ) -> impl Future<Output = Result<BulkCreateOutcome, ClientError>> + Send;

    /// Create-or-replace of one watch.
    fn upsert_rule(
        &self,
        api: WatcherApi,
        rule: &RuleUpload,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;
}

impl Upstream for ElasticClient {
    async fn upsert_saved_objects(
        &self,
        objects: &[SavedObject],
    ) -> Result<BulkCreateOutcome, ClientError> {
        self.bulk_create_saved_objects(objects).await
    }

    async fn upsert_rule(&self, api: WatcherApi, rule: &RuleUpload) -> Result<(), ClientError> {
        let response = self.put_watch(api, &rule.id, &rule.active, &rule.body).await?;
        tracing::debug!(
            id = %rule.id,
            version = ?response.version,
            created = ?response.created,
            "Watch stored"
        );
        Ok(())
    }
}
