//! Typed objects and routing between the two upstream families.
//!
//! Responsibilities:
//! - Give canonical JSON objects a typed shape ([`SavedObject`], [`RuleObject`]).
//! - Route each object to its family or mark it unrecognized ([`classify`]).
//! - Order saved objects so referenced objects are written first ([`reorder`]).
//!
//! Invariants:
//! - The family is decided by keys alone. An object with a `type` key is a
//!   saved object. Without `type`, any of `input`, `trigger` or `actions`
//!   makes it a rule. Anything else is dropped.
//! - Typed fields never reject a value. A non-string `id` stays in the side
//!   map and other known keys hold raw values, so serializing a typed object
//!   reproduces the input object.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Saved-object type, as far as upload ordering cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum SavedObjectType {
    IndexPattern,
    Search,
    Visualization,
    Dashboard,
    /// Any other type, including a `type` that is not a string.
    Other(Value),
}

impl SavedObjectType {
    /// The type name, or `None` when `type` was not a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::IndexPattern => Some("index-pattern"),
            Self::Search => Some("search"),
            Self::Visualization => Some("visualization"),
            Self::Dashboard => Some("dashboard"),
            Self::Other(value) => value.as_str(),
        }
    }

    /// Position in the upload order; lower uploads first.
    ///
    /// Dashboards reference visualizations and searches, visualizations
    /// reference searches, and everything may reference index patterns.
    pub const fn upload_rank(&self) -> u8 {
        match self {
            Self::IndexPattern => 0,
            Self::Search => 1,
            Self::Visualization => 2,
            Self::Dashboard => 3,
            Self::Other(_) => 4,
        }
    }
}

impl From<Value> for SavedObjectType {
    fn from(value: Value) -> Self {
        match value.as_str() {
            Some("index-pattern") => Self::IndexPattern,
            Some("search") => Self::Search,
            Some("visualization") => Self::Visualization,
            Some("dashboard") => Self::Dashboard,
            _ => Self::Other(value),
        }
    }
}

impl From<SavedObjectType> for Value {
    fn from(value: SavedObjectType) -> Self {
        match value {
            SavedObjectType::Other(raw) => raw,
            known => Value::from(known.as_str().unwrap_or_default()),
        }
    }
}

impl fmt::Display for SavedObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(raw) if !raw.is_string() => write!(f, "{}", raw),
            _ => f.write_str(self.as_str().unwrap_or_default()),
        }
    }
}

/// Remove `key` from `map` when its value is a string.
fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    if !map.get(key).is_some_and(Value::is_string) {
        return None;
    }
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// A Kibana saved object in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct SavedObject {
    /// String ids only; any other `id` value stays in `extra`.
    pub id: Option<String>,
    pub object_type: SavedObjectType,
    /// Present whenever the input had the key, `null` included.
    pub attributes: Option<Value>,
    /// `references`, `migrationVersion` and anything else Kibana accepts.
    pub extra: Map<String, Value>,
}

impl SavedObject {
    pub fn title(&self) -> Option<&str> {
        self.attributes.as_ref()?.get("title")?.as_str()
    }

    /// Id as shown in logs and reports.
    pub fn display_id(&self) -> String {
        match (&self.id, self.extra.get("id")) {
            (Some(id), _) => id.clone(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => "<none>".to_string(),
        }
    }
}

impl TryFrom<Map<String, Value>> for SavedObject {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let object_type = map
            .remove("type")
            .map(SavedObjectType::from)
            .ok_or_else(|| "missing field `type`".to_string())?;
        Ok(Self {
            id: take_string(&mut map, "id"),
            object_type,
            attributes: map.remove("attributes"),
            extra: map,
        })
    }
}

impl From<SavedObject> for Map<String, Value> {
    fn from(object: SavedObject) -> Self {
        let mut map = object.extra;
        if let Some(id) = object.id {
            map.insert("id".to_string(), Value::String(id));
        }
        map.insert("type".to_string(), object.object_type.into());
        if let Some(attributes) = object.attributes {
            map.insert("attributes".to_string(), attributes);
        }
        map
    }
}

/// An Elasticsearch watch as found in a ConfigMap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct RuleObject {
    /// String ids only; any other `id` value stays in `extra`.
    pub id: Option<String>,
    /// Boolean, `"true"`/`"false"`, or whatever else the file says.
    pub active: Option<Value>,
    pub metadata: Option<Value>,
    pub actions: Option<Value>,
    /// `trigger`, `input`, `condition`, `transform`, `throttle_period`, ...
    pub extra: Map<String, Value>,
}

impl RuleObject {
    /// `metadata.name`, the title source for id generation.
    pub fn name(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("name")?.as_str()
    }

    /// Value of the `active` query parameter; defaults to `"true"`.
    ///
    /// Booleans and strings are sent as written. Anything else is sent as
    /// its JSON text and left for Elasticsearch to judge.
    pub fn active_param(&self) -> String {
        match &self.active {
            None => "true".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl From<Map<String, Value>> for RuleObject {
    fn from(mut map: Map<String, Value>) -> Self {
        Self {
            id: take_string(&mut map, "id"),
            active: map.remove("active"),
            metadata: map.remove("metadata"),
            actions: map.remove("actions"),
            extra: map,
        }
    }
}

impl From<RuleObject> for Map<String, Value> {
    fn from(rule: RuleObject) -> Self {
        let mut map = rule.extra;
        if let Some(id) = rule.id {
            map.insert("id".to_string(), Value::String(id));
        }
        for (key, value) in [
            ("active", rule.active),
            ("metadata", rule.metadata),
            ("actions", rule.actions),
        ] {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        }
        map
    }
}

/// One object of a batch after routing.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncObject {
    Saved(SavedObject),
    Rule(RuleObject),
    /// Matched neither family.
    Unrecognized { object: Value, reason: String },
}

const RULE_KEYS: [&str; 3] = ["input", "trigger", "actions"];

impl SyncObject {
    /// Route a canonical object to its family.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::Unrecognized {
                object: value,
                reason: "not a JSON object".to_string(),
            };
        };

        if map.contains_key("type") {
            return match SavedObject::try_from(map.clone()) {
                Ok(saved) => Self::Saved(saved),
                Err(reason) => Self::Unrecognized {
                    object: Value::Object(map),
                    reason,
                },
            };
        }

        if RULE_KEYS.iter().any(|k| map.contains_key(*k)) {
            return Self::Rule(RuleObject::from(map));
        }

        Self::Unrecognized {
            object: Value::Object(map),
            reason: "no 'type' and none of 'input', 'trigger', 'actions'".to_string(),
        }
    }
}

/// A batch split into its two families.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub saved: Vec<SavedObject>,
    pub rules: Vec<RuleObject>,
    /// Number of objects dropped as unrecognized.
    pub dropped: usize,
}

/// Split a batch into saved objects and rules, dropping the rest.
///
/// Dropped objects are logged at warn; they never fail the batch.
pub fn classify(objects: Vec<Value>) -> Classified {
    let mut out = Classified::default();
    for value in objects {
        match SyncObject::from_value(value) {
            SyncObject::Saved(saved) => out.saved.push(saved),
            SyncObject::Rule(rule) => out.rules.push(rule),
            SyncObject::Unrecognized { object, reason } => {
                warn!(%reason, object = %object, "Could not determine object family, ignoring it");
                out.dropped += 1;
            }
        }
    }
    out
}

/// Order saved objects: index patterns, searches, visualizations,
/// dashboards, then everything else. Stable within each type.
pub fn reorder(mut objects: Vec<SavedObject>) -> Vec<SavedObject> {
    objects.sort_by_key(|o| o.object_type.upload_rank());
    objects
}
