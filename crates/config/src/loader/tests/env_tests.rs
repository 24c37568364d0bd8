//! Environment variable tests for the configuration loader builder.
//!
//! Responsibilities:
//! - Test that required variables populate the config.
//! - Test handling of empty and whitespace-only environment variables.
//! - Test precedence of builder overrides over the environment.

use crate::loader::builder::ConfigLoader;
use crate::loader::error::ConfigError;
use crate::types::{LogFormat, NamespaceScope};
use secrecy::ExposeSecret;
use serial_test::serial;
use std::path::PathBuf;
use std::time::Duration;

use super::{env_lock, env_with};

const REQUIRED: [(&str, &str); 3] = [
    ("LABEL", "kibana-sync"),
    ("KIBANA_BASE_URL", "http://kibana:5601/"),
    ("ELASTICSEARCH_BASE_URL", "http://elasticsearch:9200"),
];

#[test]
#[serial]
fn test_required_env_builds_config_with_defaults() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(env_with(&REQUIRED), || {
        let config = ConfigLoader::new().from_env().unwrap().build().unwrap();

        assert_eq!(config.watch.label, "kibana-sync");
        assert_eq!(config.watch.generate_id_label, "generate_id_from_title");
        assert_eq!(config.watch.namespace, NamespaceScope::Current);
        assert_eq!(config.watch.retry_interval, Duration::from_secs(5));
        assert_eq!(config.connection.kibana_base_url, "http://kibana:5601");
        assert_eq!(
            config.connection.elasticsearch_base_url,
            "http://elasticsearch:9200"
        );
        assert!(config.connection.credentials.is_none());
        assert_eq!(config.connection.max_retries, 5);
        assert_eq!(config.connection.retry_backoff, Duration::from_millis(200));
        assert_eq!(config.connection.timeout, Duration::from_secs(30));
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.default_actions_path.is_none());
    });
}

#[test]
#[serial]
fn test_missing_label_is_reported() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(env_with(&REQUIRED[1..]), || {
        let err = ConfigLoader::new().from_env().unwrap().build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref var) if var == "LABEL"));
    });
}

#[test]
#[serial]
fn test_missing_elasticsearch_url_is_reported() {
    let _lock = env_lock().lock().unwrap();

    temp_env::with_vars(env_with(&REQUIRED[..2]), || {
        let err = ConfigLoader::new().from_env().unwrap().build().unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingEnvVar(ref var) if var == "ELASTICSEARCH_BASE_URL")
        );
    });
}

#[test]
#[serial]
fn test_optional_settings_are_read() {
    let _lock = env_lock().lock().unwrap();

    let mut vars = REQUIRED.to_vec();
    vars.extend([
        ("KIBANA_USERNAME", "elastic"),
        ("KIBANA_PASSWORD", "changeme"),
        ("NAMESPACE", "ALL"),
        ("DEFAULT_WATCHER_ACTIONS_FILEPATH", "/etc/sidecar/actions.json"),
        ("GENERATE_ID_LABEL", "ids-from-titles"),
        ("SIDECAR_MAX_RETRIES", "2"),
        ("SIDECAR_WATCH_RETRY_INTERVAL", "30"),
        ("LOGLEVEL", "INFO"),
        ("LOG_FORMAT", "text"),
    ]);

    temp_env::with_vars(env_with(&vars), || {
        let config = ConfigLoader::new().from_env().unwrap().build().unwrap();

        let creds = config.connection.credentials.expect("credentials");
        assert_eq!(creds.username, "elastic");
        assert_eq!(creds.password.expose_secret(), "changeme");
        assert_eq!(config.watch.namespace, NamespaceScope::All);
        assert_eq!(config.watch.generate_id_label, "ids-from-titles");
        assert_eq!(
            config.default_actions_path,
            Some(PathBuf::from("/etc/sidecar/actions.json"))
        );
        assert_eq!(config.connection.max_retries, 2);
        assert_eq!(config.watch.retry_interval, Duration::from_secs(30));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    });
}

#[test]
#[serial]
fn test_username_without_password_yields_no_credentials() {
    let _lock = env_lock().lock().unwrap();

    let mut vars = REQUIRED.to_vec();
    vars.push(("KIBANA_USERNAME", "elastic"));

    temp_env::with_vars(env_with(&vars), || {
        let config = ConfigLoader::new().from_env().unwrap().build().unwrap();
        assert!(config.connection.credentials.is_none());
    });
}

#[test]
#[serial]
fn test_whitespace_only_env_var_treated_as_unset() {
    let _lock = env_lock().lock().unwrap();

    let mut vars = REQUIRED.to_vec();
    vars.push(("NAMESPACE", "   "));

    temp_env::with_vars(env_with(&vars), || {
        let config = ConfigLoader::new().from_env().unwrap().build().unwrap();
        assert_eq!(config.watch.namespace, NamespaceScope::Current);
    });
}

#[test]
#[serial]
fn test_builder_overrides_win_over_env() {
    let _lock = env_lock().lock().unwrap();

    let mut vars = REQUIRED.to_vec();
    vars.push(("NAMESPACE", "from-env"));

    temp_env::with_vars(env_with(&vars), || {
        let config = ConfigLoader::new()
            .from_env()
            .unwrap()
            .with_namespace("from-flag".to_string())
            .with_label("other-label".to_string())
            .build()
            .unwrap();

        assert_eq!(
            config.watch.namespace,
            NamespaceScope::Named("from-flag".to_string())
        );
        assert_eq!(config.watch.label, "other-label");
    });
}

#[test]
#[serial]
fn test_invalid_boolean_is_rejected() {
    let _lock = env_lock().lock().unwrap();

    let mut vars = REQUIRED.to_vec();
    vars.push(("SIDECAR_SKIP_VERIFY", "sometimes"));

    temp_env::with_vars(env_with(&vars), || {
        let err = ConfigLoader::new().from_env().err().expect("error");
        assert!(
            matches!(err, ConfigError::InvalidValue { ref var, .. } if var == "SIDECAR_SKIP_VERIFY")
        );
    });
}

#[test]
#[serial]
fn test_unknown_log_level_is_rejected() {
    let _lock = env_lock().lock().unwrap();

    let mut vars = REQUIRED.to_vec();
    vars.push(("LOGLEVEL", "chatty"));

    temp_env::with_vars(env_with(&vars), || {
        let err = ConfigLoader::new().from_env().err().expect("error");
        assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == "LOGLEVEL"));
    });
}
