//! Default watcher actions file.
//!
//! The file holds a single JSON object whose entries are merged into the
//! `actions` of every watcher uploaded by the sidecar. It is read once at
//! startup; a broken file is a configuration error, not something to skip.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::info;

use super::error::ConfigError;

/// Action name to action definition, as found in the defaults file.
pub type DefaultActions = Map<String, Value>;

/// Load default watcher actions from `path`.
///
/// Returns an empty map when no path is configured.
///
/// # Errors
///
/// - [`ConfigError::DefaultActionsRead`] if the file cannot be read.
/// - [`ConfigError::DefaultActionsParse`] if the content is not valid JSON.
/// - [`ConfigError::DefaultActionsNotObject`] if the JSON is not an object.
pub fn load_default_actions(path: Option<&Path>) -> Result<DefaultActions, ConfigError> {
    let Some(path) = path else {
        return Ok(DefaultActions::new());
    };

    info!(path = %path.display(), "Reading default watcher actions");

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::DefaultActionsRead {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value =
        serde_json::from_str(&content).map_err(|source| ConfigError::DefaultActionsParse {
            path: path.to_path_buf(),
            source,
        })?;

    match value {
        Value::Object(actions) => Ok(actions),
        _ => Err(ConfigError::DefaultActionsNotObject {
            path: path.to_path_buf(),
        }),
    }
}
