//! Watch configuration: which ConfigMaps are observed and how the watch is retried.

use std::fmt;
use std::time::Duration;

use crate::constants::ALL_NAMESPACES;

/// Namespaces whose ConfigMaps are watched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    /// The namespace the sidecar's service account lives in.
    Current,
    /// Every namespace in the cluster.
    All,
    /// One explicitly named namespace.
    Named(String),
}

impl NamespaceScope {
    /// Interpret the `NAMESPACE` setting.
    ///
    /// An absent value selects the current namespace and the literal `ALL`
    /// selects every namespace.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            None => Self::Current,
            Some(ALL_NAMESPACES) => Self::All,
            Some(name) => Self::Named(name.to_string()),
        }
    }
}

impl fmt::Display for NamespaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current namespace"),
            Self::All => write!(f, "all namespaces"),
            Self::Named(name) => write!(f, "namespace {}", name),
        }
    }
}

/// Settings for the ConfigMap watch and reconciliation loop.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Label whose presence marks a ConfigMap as managed
    pub label: String,
    /// Label whose value `"true"` enables ID generation from titles
    pub generate_id_label: String,
    /// Which namespaces to watch
    pub namespace: NamespaceScope,
    /// Minimum delay between watch re-subscriptions
    pub retry_interval: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_scope_from_setting() {
        assert_eq!(NamespaceScope::from_setting(None), NamespaceScope::Current);
        assert_eq!(NamespaceScope::from_setting(Some("ALL")), NamespaceScope::All);
        assert_eq!(
            NamespaceScope::from_setting(Some("monitoring")),
            NamespaceScope::Named("monitoring".to_string())
        );
    }

    #[test]
    fn test_namespace_scope_is_case_sensitive() {
        assert_eq!(
            NamespaceScope::from_setting(Some("all")),
            NamespaceScope::Named("all".to_string())
        );
    }
}
