//! `.env` loading tests.
//!
//! Invariants:
//! - A missing `.env` is not an error.
//! - `DOTENV_DISABLED=1|true` skips loading entirely.
//! - Parse errors never echo file contents, which may hold credentials.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use super::env_lock;
use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;

/// Switches the working directory for the guard's lifetime.
struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    fn enter(dir: &TempDir) -> Self {
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        Self { original }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

#[test]
#[serial]
fn test_missing_dotenv_is_ignored() {
    let _lock = env_lock().lock().unwrap();
    let dir = TempDir::new().unwrap();
    let _cwd = CwdGuard::enter(&dir);

    temp_env::with_var_unset("DOTENV_DISABLED", || {
        assert!(ConfigLoader::new().load_dotenv().is_ok());
    });
}

#[test]
#[serial]
fn test_dotenv_values_feed_the_environment() {
    let _lock = env_lock().lock().unwrap();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        "SIDECAR_DOTENV_PROBE=from-dotenv\n",
    )
    .unwrap();
    let _cwd = CwdGuard::enter(&dir);

    temp_env::with_vars(
        [
            ("DOTENV_DISABLED", None::<&str>),
            ("SIDECAR_DOTENV_PROBE", None),
        ],
        || {
            ConfigLoader::new().load_dotenv().unwrap();
            assert_eq!(
                std::env::var("SIDECAR_DOTENV_PROBE").as_deref(),
                Ok("from-dotenv")
            );
        },
    );
}

#[test]
#[serial]
fn test_invalid_dotenv_does_not_leak_contents() {
    let _lock = env_lock().lock().unwrap();
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        "KIBANA_PASSWORD=hunter2\nthis line is not valid 'hunter2\n",
    )
    .unwrap();
    let _cwd = CwdGuard::enter(&dir);

    temp_env::with_vars(
        [("DOTENV_DISABLED", None::<&str>), ("KIBANA_PASSWORD", None)],
        || {
            let err = ConfigLoader::new().load_dotenv().unwrap_err();
            assert!(matches!(err, ConfigError::DotenvParse { .. }));
            assert!(!err.to_string().contains("hunter2"));
        },
    );
}

#[test]
#[serial]
fn test_dotenv_disabled_skips_invalid_file() {
    let _lock = env_lock().lock().unwrap();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "not valid 'at all\n").unwrap();
    let _cwd = CwdGuard::enter(&dir);

    for value in ["1", "true"] {
        temp_env::with_var("DOTENV_DISABLED", Some(value), || {
            assert!(ConfigLoader::new().load_dotenv().is_ok());
        });
    }
}
