//! Configuration loader for environment variables and files.
//!
//! Responsibilities:
//! - Load configuration from `.env` files and environment variables.
//! - Provide a builder-pattern `ConfigLoader` for layered configuration merging.
//! - Load the default watcher actions file once at startup.
//! - Enforce `DOTENV_DISABLED` gate to prevent accidental dotenv loading in tests.
//!
//! Does NOT handle:
//! - Probing upstream versions or any other network access (see client crate).
//!
//! Invariants / Assumptions:
//! - Builder methods take precedence over environment variables.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

mod actions;
mod builder;
mod env;
mod error;

#[cfg(test)]
mod tests;

pub use actions::{DefaultActions, load_default_actions};
pub use builder::ConfigLoader;
pub use env::env_var_or_none;
pub use error::ConfigError;
