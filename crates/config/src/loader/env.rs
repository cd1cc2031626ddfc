//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `GRAFANA_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//! - Provide helper functions for reading env vars with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Loading from profile files (see profile.rs).
//! - Building the final Config (see builder.rs).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric values return ConfigError::InvalidValue.

use secrecy::SecretString;
use std::str::FromStr;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::constants::MAX_MAX_RETRIES;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_env<T: FromStr>(key: &str, message: &str) -> Result<Option<T>, ConfigError> {
    env_var_or_none(key)
        .map(|raw| {
            raw.parse().map_err(|_| ConfigError::InvalidValue {
                var: key.to_string(),
                message: message.to_string(),
            })
        })
        .transpose()
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none("GRAFANA_URL") {
        loader.set_base_url(Some(url));
    }
    if let Some(username) = env_var_or_none("GRAFANA_USERNAME") {
        loader.set_username(Some(username));
    }
    if let Some(password) = env_var_or_none("GRAFANA_PASSWORD") {
        loader.set_password(Some(SecretString::new(password.into())));
    }
    if let Some(token) = env_var_or_none("GRAFANA_API_TOKEN") {
        loader.set_api_token(Some(SecretString::new(token.into())));
    }
    if let Some(org_id) = parse_env::<i64>("GRAFANA_ORG_ID", "must be an integer")? {
        loader.set_org_id(Some(org_id));
    }
    if let Some(skip) = parse_env::<bool>("GRAFANA_SKIP_VERIFY", "must be true or false")? {
        loader.set_skip_verify(Some(skip));
    }
    if let Some(secs) = parse_env::<u64>("GRAFANA_TIMEOUT", "must be a number")? {
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(value) =
        parse_env::<usize>("GRAFANA_MAX_RETRIES", "must be a non-negative integer")?
    {
        if value > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!("must be between 0 and {} (got {})", MAX_MAX_RETRIES, value),
            });
        }
        loader.set_max_retries(Some(value));
    }

    // Config path and profile name from environment (only if not already set via CLI)
    if loader.config_path().is_none()
        && let Some(config_path) = env_var_or_none("GRAFANA_CONFIG_PATH")
    {
        loader.set_config_path(Some(std::path::PathBuf::from(config_path)));
    }
    if loader.profile_name().is_none()
        && let Some(profile) = env_var_or_none("GRAFANA_PROFILE")
    {
        loader.set_profile_name(Some(profile));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_var_or_none_filters_empty_and_whitespace_strings() {
        let key = "_GRAFANA_TEST_UNSET_VAR";
        assert!(env_var_or_none(key).is_none());

        temp_env::with_vars([(key, Some(""))], || {
            assert!(env_var_or_none(key).is_none());
        });

        temp_env::with_vars([(key, Some("   "))], || {
            assert!(env_var_or_none(key).is_none());
        });

        temp_env::with_vars([(key, Some("  value  "))], || {
            assert_eq!(env_var_or_none(key).as_deref(), Some("value"));
        });
    }

    #[test]
    #[serial]
    fn test_parse_env_reports_variable_name() {
        temp_env::with_vars([("GRAFANA_TIMEOUT", Some("soon"))], || {
            let err = parse_env::<u64>("GRAFANA_TIMEOUT", "must be a number").unwrap_err();
            match err {
                ConfigError::InvalidValue { var, .. } => assert_eq!(var, "GRAFANA_TIMEOUT"),
                other => panic!("unexpected error: {other}"),
            }
        });
    }
}
