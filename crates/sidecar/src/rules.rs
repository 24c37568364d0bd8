//! Preparation of watches for upload.

use serde::Serialize;
use serde_json::{Map, Value};
use sidecar_config::DefaultActions;
use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::ids::generate_id;
use crate::objects::RuleObject;

/// Request body of a put-watch call. `id` and `active` travel in the URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A watch split into its routing parameters and request body.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleUpload {
    pub id: String,
    /// Value of the `active` query parameter.
    pub active: String,
    pub body: WatchBody,
}

impl RuleObject {
    /// Split off `id` and `active` for the URL.
    ///
    /// A numeric or boolean `id` is used as its JSON text.
    ///
    /// # Errors
    ///
    /// [`SyncError::MissingRuleId`] when the watch has no usable id.
    pub fn into_upload(self) -> Result<RuleUpload, SyncError> {
        let active = self.active_param();
        let RuleObject {
            id,
            metadata,
            actions,
            mut extra,
            ..
        } = self;

        let raw_id = extra.remove("id");
        let id = id.or_else(|| match raw_id {
            Some(raw @ (Value::Number(_) | Value::Bool(_))) => Some(raw.to_string()),
            _ => None,
        });

        let body = WatchBody {
            metadata,
            actions,
            extra,
        };

        match id {
            Some(id) if !id.is_empty() => Ok(RuleUpload { id, active, body }),
            _ => Err(SyncError::MissingRuleId(
                serde_json::to_string(&body).unwrap_or_else(|_| "<unserializable>".to_string()),
            )),
        }
    }
}

/// Assign generated ids and merge default actions into every watch.
///
/// With `generate_ids`, a watch carrying `metadata.name` gets its id from
/// that name. Each default action is then inserted into the watch's
/// `actions`, replacing a same-named action the watch already had. A watch
/// whose `actions` is present but not an object is left as written.
pub fn prepare_rule_objects(
    mut rules: Vec<RuleObject>,
    generate_ids: bool,
    defaults: &DefaultActions,
) -> Vec<RuleObject> {
    if generate_ids {
        for rule in &mut rules {
            if let Some(name) = rule.name() {
                let new_id = generate_id(name);
                debug!(new_id, name, "Generated watch id from name");
                rule.id = Some(new_id);
            }
        }
    }

    if !defaults.is_empty() {
        for rule in &mut rules {
            info!(
                id = rule.id.as_deref().unwrap_or("<none>"),
                count = defaults.len(),
                "Adding default actions to watch"
            );
            let actions = rule
                .actions
                .get_or_insert_with(|| Value::Object(Map::new()));
            let Value::Object(actions) = actions else {
                warn!(
                    id = rule.id.as_deref().unwrap_or("<none>"),
                    "Watch 'actions' is not an object, default actions not added"
                );
                continue;
            };
            for (key, value) in defaults {
                actions.insert(key.clone(), value.clone());
            }
        }
    }

    rules
}
