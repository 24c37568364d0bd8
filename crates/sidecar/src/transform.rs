//! Conversion of ConfigMap file contents into canonical objects.
//!
//! Kibana's UI export writes objects as `{_id, _type, _source}` while the
//! saved-object API expects `{id, type, attributes}`. Files may hold either
//! shape, as one object or an array of objects.

use serde_json::{Map, Value};
use tracing::debug;

use crate::ids::{IdRewriteMap, generate_id};

/// Export-format key and the canonical key it becomes.
const KEY_RENAMES: [(&str, &str); 3] = [("_source", "attributes"), ("_id", "id"), ("_type", "type")];

/// Rename export-format keys to their canonical names in place.
///
/// When both forms are present the export-format value wins, and the
/// export-format key is always removed.
pub fn to_canonical(object: &mut Map<String, Value>) {
    for (from, to) in KEY_RENAMES {
        if let Some(value) = object.remove(from) {
            object.insert(to.to_string(), value);
        }
    }
}

/// Replace the object's id with one derived from `attributes.title`.
///
/// Objects without a string title are left untouched. The substitution is
/// recorded in `ids` when the object had a previous id.
fn assign_title_id(object: &mut Map<String, Value>, ids: &mut IdRewriteMap) {
    let Some(title) = object
        .get("attributes")
        .and_then(|a| a.get("title"))
        .and_then(Value::as_str)
    else {
        return;
    };

    let new_id = generate_id(title);
    debug!(new_id, title, "Generated id from title");

    if let Some(old_id) = object.get("id").and_then(Value::as_str) {
        ids.record(old_id, &new_id);
    }
    object.insert("id".to_string(), Value::String(new_id));
}

/// Parse one file's content and canonicalize every object in it.
///
/// A JSON array yields its elements; any other JSON value is treated as a
/// single object. Non-object elements pass through unchanged and are dropped
/// later by classification.
///
/// # Errors
///
/// Returns the parse error when `raw` is not valid JSON. The caller decides
/// whether that aborts anything beyond this file.
pub fn transform_payload(
    raw: &str,
    generate_ids: bool,
    ids: &mut IdRewriteMap,
) -> Result<Vec<Value>, serde_json::Error> {
    let parsed: Value = serde_json::from_str(raw)?;
    let mut objects = match parsed {
        Value::Array(items) => items,
        single => vec![single],
    };

    for value in &mut objects {
        if let Value::Object(object) = value {
            to_canonical(object);
            if generate_ids {
                assign_title_id(object, ids);
            }
        }
    }

    Ok(objects)
}
