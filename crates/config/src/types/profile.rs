//! Profile configuration types.
//!
//! Responsibilities:
//! - Define `ProfileConfig` for storing named connection profiles.
//! - Define `ProfileFile`, the on-disk JSON document holding all profiles.
//!
//! Does NOT handle:
//! - Profile loading or merging (see `loader` module).
//!
//! Invariants:
//! - All fields are optional to allow partial profile definitions.
//! - Unknown top-level keys in the profile file are ignored.

use std::collections::BTreeMap;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::types::auth::secret_string;

/// Profile configuration for storing named connection profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Base URL of the Grafana server
    pub base_url: Option<String>,
    /// Username for basic authentication
    pub username: Option<String>,
    /// Password for basic authentication
    #[serde(with = "optional_secret", skip_serializing_if = "Option::is_none")]
    pub password: Option<SecretString>,
    /// API or service-account token
    #[serde(with = "optional_secret", skip_serializing_if = "Option::is_none")]
    pub api_token: Option<SecretString>,
    /// Organization id to act in
    pub org_id: Option<i64>,
    /// Whether to skip TLS verification
    pub skip_verify: Option<bool>,
    /// Connection timeout in seconds
    pub timeout_seconds: Option<u64>,
    /// Maximum number of retries for rate-limited requests
    pub max_retries: Option<usize>,
}

/// The profile file document: `{ "profiles": { "<name>": { ... } } }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

mod optional_secret {
    use secrecy::SecretString;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(secret: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match secret {
            Some(secret) => super::secret_string::serialize(secret, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        Ok(s.map(|s| SecretString::new(s.into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_profile_file_parses_partial_profiles() {
        let json = serde_json::json!({
            "profiles": {
                "dev": {
                    "base_url": "http://dev.grafana:3000",
                    "username": "dev_user",
                    "password": "dev-password"
                },
                "prod": { "api_token": "glsa_prod" }
            },
            "unrelated": true
        });

        let file: ProfileFile = serde_json::from_value(json).unwrap();
        let dev = &file.profiles["dev"];
        assert_eq!(dev.base_url.as_deref(), Some("http://dev.grafana:3000"));
        assert_eq!(
            dev.password.as_ref().map(|p| p.expose_secret().to_string()),
            Some("dev-password".to_string())
        );
        assert!(file.profiles["prod"].base_url.is_none());
    }

    #[test]
    fn test_profile_debug_hides_secrets() {
        let profile = ProfileConfig {
            api_token: Some(SecretString::new("glsa_secret".to_string().into())),
            ..Default::default()
        };
        assert!(!format!("{:?}", profile).contains("glsa_secret"));
    }
}
