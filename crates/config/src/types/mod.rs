//! Configuration type definitions for the Kibana sidecar.
//!
//! Responsibilities:
//! - Define connection settings for the saved-object and watcher APIs.
//! - Define watch settings (activation label, namespace scope, retry interval).
//! - Define logging/telemetry settings.
//!
//! Does NOT handle:
//! - Configuration loading from environment variables (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - All secret values use `secrecy::SecretString` to prevent accidental logging.
//! - Base URLs stored here never end with a trailing slash.

mod auth;
mod connection;
pub(crate) mod logging;
mod watch;

pub use auth::Credentials;
pub use connection::{Config, ConnectionConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use watch::{NamespaceScope, WatchConfig};
