//! Configuration management for the Kibana sidecar.
//!
//! This crate provides types and loaders for the sidecar's connection,
//! watch and logging settings, sourced from environment variables and an
//! optional `.env` file, plus the default watcher actions file.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, DefaultActions, env_var_or_none, load_default_actions};
pub use types::{
    Config, ConnectionConfig, Credentials, LogFormat, LoggingConfig, NamespaceScope, WatchConfig,
};
