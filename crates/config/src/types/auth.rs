//! Basic-auth credentials shared by both upstream APIs.

use secrecy::SecretString;

/// Username and password sent as HTTP basic auth to Kibana and Elasticsearch.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    /// Pair a username and password.
    ///
    /// Credentials are only usable when both halves are present, so callers
    /// holding optional values should go through [`Credentials::from_parts`].
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Build credentials when both username and password are set.
    pub fn from_parts(username: Option<String>, password: Option<SecretString>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) => Some(Self { username, password }),
            _ => None,
        }
    }
}
