//! Connection configuration types.
//!
//! Responsibilities:
//! - Define connection settings (URL, organization, TLS verification, timeouts, retries).
//! - Define the main `Config` structure combining connection and auth.
//!
//! Does NOT handle:
//! - Configuration loading from files/env (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - All duration fields are serialized as seconds (integers).
//! - `Config::default()` targets a local development Grafana (localhost:3000, admin/admin).

use crate::constants::{
    DEFAULT_ADMIN_USER, DEFAULT_GRAFANA_PORT, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS,
};
use crate::types::auth::{AuthConfig, AuthStrategy};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Module for serializing Duration as seconds (integer).
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

/// Connection configuration for a Grafana server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL of the Grafana server (e.g., http://localhost:3000)
    pub base_url: String,
    /// Organization to act in; `None` uses the user's current organization
    #[serde(default)]
    pub org_id: Option<i64>,
    /// Whether to skip TLS verification (for self-signed certificates)
    pub skip_verify: bool,
    /// Connection timeout (serialized as seconds)
    #[serde(with = "duration_seconds")]
    pub timeout: Duration,
    /// Maximum number of retries for rate-limited requests
    pub max_retries: usize,
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Connection settings
    pub connection: ConnectionConfig,
    /// Authentication settings
    pub auth: AuthConfig,
}

impl Default for Config {
    /// Creates a default configuration with development-only credentials.
    ///
    /// Targets `http://localhost:3000` with Grafana's stock `admin`/`admin`
    /// login. Only suitable for local development and disposable instances.
    fn default() -> Self {
        Self::with_basic_auth(
            format!("http://localhost:{}", DEFAULT_GRAFANA_PORT),
            DEFAULT_ADMIN_USER.to_string(),
            SecretString::new(DEFAULT_ADMIN_USER.to_string().into()),
        )
    }
}

impl Config {
    /// Create a new config with the specified base URL and API token.
    pub fn with_api_token(base_url: String, token: SecretString) -> Self {
        Self {
            connection: ConnectionConfig::new(base_url),
            auth: AuthConfig {
                strategy: AuthStrategy::ApiToken { token },
            },
        }
    }

    /// Create a new config with the specified base URL and username/password.
    pub fn with_basic_auth(base_url: String, username: String, password: SecretString) -> Self {
        Self {
            connection: ConnectionConfig::new(base_url),
            auth: AuthConfig {
                strategy: AuthStrategy::Basic { username, password },
            },
        }
    }

    /// True when authenticating as `admin`/`admin`, Grafana's stock login.
    pub fn is_using_default_credentials(&self) -> bool {
        match &self.auth.strategy {
            AuthStrategy::Basic { username, password } => {
                username == DEFAULT_ADMIN_USER && password.expose_secret() == DEFAULT_ADMIN_USER
            }
            AuthStrategy::ApiToken { .. } => false,
        }
    }

    /// Copy of this config scoped to another organization.
    pub fn for_org(&self, org_id: i64) -> Self {
        let mut config = self.clone();
        config.connection.org_id = Some(org_id);
        config
    }
}

impl ConnectionConfig {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            org_id: None,
            skip_verify: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}
