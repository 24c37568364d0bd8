//! Title-derived ids and cross-reference rewriting.
//!
//! Responsibilities:
//! - Derive stable ids from human titles ([`generate_id`]).
//! - Track old -> new id substitutions for one event ([`IdRewriteMap`]).
//! - Apply those substitutions to a serialized batch ([`rewrite_references`]).
//!
//! Invariants:
//! - `generate_id` is pure; the same title always yields the same id, which
//!   keeps re-syncs of an unchanged ConfigMap idempotent upstream.
//! - Rewriting is textual over the serialized batch. References hide inside
//!   string-encoded JSON (e.g. `panelsJSON`), so a structural walk would miss
//!   them. Both the quoted form and the once-escaped quoted form are replaced.

use serde_json::Value;
use tracing::{debug, warn};

/// Derive an id from a title.
///
/// Lower-cases the title, then replaces every character outside
/// `[a-z-_0-9*]` with `_`.
pub fn generate_id(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '_' | '*' => c,
            _ => '_',
        })
        .collect()
}

/// Old -> new id substitutions collected while transforming one event.
///
/// Keys are unique; recording an old id twice keeps the latest target.
/// Substitutions are applied in the order old ids were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdRewriteMap {
    entries: Vec<(String, String)>,
}

impl IdRewriteMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `old_id` is now `new_id`.
    ///
    /// Empty old ids and identity mappings are ignored. Two different old ids
    /// landing on the same new id are kept but logged, since both objects
    /// will overwrite each other upstream.
    pub fn record(&mut self, old_id: &str, new_id: &str) {
        if old_id.is_empty() || old_id == new_id {
            return;
        }

        if let Some((other, _)) = self
            .entries
            .iter()
            .find(|(old, new)| new == new_id && old != old_id)
        {
            warn!(
                new_id,
                old_id,
                colliding_old_id = %other,
                "Generated id collides with another object's generated id"
            );
        }

        match self.entries.iter_mut().find(|(old, _)| old == old_id) {
            Some(entry) => entry.1 = new_id.to_string(),
            None => self.entries.push((old_id.to_string(), new_id.to_string())),
        }
    }

    /// New id recorded for `old_id`, if any.
    pub fn get(&self, old_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(old, _)| old == old_id)
            .map(|(_, new)| new.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(o, n)| (o.as_str(), n.as_str()))
    }
}

/// JSON encoding of `id` as a string literal, quotes included.
fn quoted(id: &str) -> String {
    Value::String(id.to_string()).to_string()
}

/// The quoted form as it appears inside another JSON string, e.g. `\"abc\"`.
fn escaped_quoted(id: &str) -> String {
    let outer = Value::String(quoted(id)).to_string();
    outer[1..outer.len() - 1].to_string()
}

/// Replace every reference to a rewritten id throughout `batch`.
///
/// The batch is serialized, each `"old"` and `\"old\"` occurrence is replaced
/// by the matching form of the new id, and the result is parsed back.
///
/// # Errors
///
/// Returns the parse error if substitution produced invalid JSON. With ids
/// produced by [`generate_id`] this cannot happen.
pub fn rewrite_references(
    map: &IdRewriteMap,
    batch: Vec<Value>,
) -> Result<Vec<Value>, serde_json::Error> {
    if map.is_empty() {
        return Ok(batch);
    }

    let mut serialized = serde_json::to_string(&batch)?;
    for (old_id, new_id) in map.iter() {
        debug!(old_id, new_id, "Replacing references");
        serialized = serialized
            .replace(&quoted(old_id), &quoted(new_id))
            .replace(&escaped_quoted(old_id), &escaped_quoted(new_id));
    }
    serde_json::from_str(&serialized)
}
