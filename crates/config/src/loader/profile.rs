//! Profile file loading for configuration.
//!
//! Responsibilities:
//! - Locate and read the JSON profile file.
//! - Apply profile settings to a ConfigLoader instance.
//!
//! Does NOT handle:
//! - Environment variable parsing (see env.rs).
//! - Building the final Config (see builder.rs).
//!
//! Invariants:
//! - Profile settings are applied before environment variables (env vars take precedence).
//! - Missing profiles and missing files are recorded for later error handling in build().

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::types::{ProfileConfig, ProfileFile};

/// Returns the default path to the profile file.
///
/// Uses `ProjectDirs::from("", "", "grafana-templating")`, which resolves to
/// e.g. `~/.config/grafana-templating/config.json` on Linux.
pub fn default_config_path() -> Result<PathBuf, anyhow::Error> {
    let proj_dirs = directories::ProjectDirs::from("", "", "grafana-templating")
        .context("Failed to determine project directories")?;

    Ok(proj_dirs.config_dir().join("config.json"))
}

/// Read and parse a profile file.
pub(crate) fn read_profile_file(path: &Path) -> Result<ProfileFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |source| ConfigError::ConfigFileParse {
        path: path.to_path_buf(),
        source,
    };
    let document: serde_json::Value = serde_json::from_str(&content).map_err(parse_error)?;
    // A struct would also accept a JSON array; profile files are always objects.
    if !document.is_object() {
        return Err(parse_error(serde::de::Error::custom(
            "profile file must be a JSON object",
        )));
    }
    serde_json::from_value(document).map_err(parse_error)
}

/// Apply profile configuration from a profile file to the loader.
pub fn apply_profile(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    let profile_name = match loader.profile_name() {
        Some(name) => name.clone(),
        None => return Ok(()),
    };

    let config_path = match loader.config_path() {
        Some(path) => path.clone(),
        None => {
            default_config_path().map_err(|e| ConfigError::ConfigDirUnavailable(e.to_string()))?
        }
    };

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "profile file does not exist");
        loader.set_profile_missing(Some(profile_name));
        return Ok(());
    }

    let file = read_profile_file(&config_path)?;
    match file.profiles.get(&profile_name) {
        Some(profile) => {
            tracing::debug!(profile = %profile_name, "applying profile");
            apply_profile_config(loader, profile);
        }
        None => loader.set_profile_missing(Some(profile_name)),
    }
    Ok(())
}

fn apply_profile_config(loader: &mut ConfigLoader, profile: &ProfileConfig) {
    if let Some(url) = &profile.base_url {
        loader.set_base_url(Some(url.clone()));
    }
    if let Some(username) = &profile.username {
        loader.set_username(Some(username.clone()));
    }
    if let Some(password) = &profile.password {
        loader.set_password(Some(password.clone()));
    }
    if let Some(token) = &profile.api_token {
        loader.set_api_token(Some(token.clone()));
    }
    if let Some(org_id) = profile.org_id {
        loader.set_org_id(Some(org_id));
    }
    if let Some(skip) = profile.skip_verify {
        loader.set_skip_verify(Some(skip));
    }
    if let Some(secs) = profile.timeout_seconds {
        loader.set_timeout(Some(std::time::Duration::from_secs(secs)));
    }
    if let Some(retries) = profile.max_retries {
        loader.set_max_retries(Some(retries));
    }
}
