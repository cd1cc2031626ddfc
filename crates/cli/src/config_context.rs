//! Connection configuration for command execution.
//!
//! Responsibilities:
//! - Merge profile file, environment and CLI flags into one `Config`.
//! - Warn when the stock development credentials are in use.
//!
//! Does NOT handle:
//! - `.env` loading (done in `main()` before parsing so clap env defaults see it).
//! - Commands that bring their own instance (`migrate` builds its client from the container endpoint).
//!
//! Invariants:
//! - Precedence: CLI flags > environment > profile file.
//! - Blank config paths are ignored so the environment can still provide one.

use std::time::Duration;

use anyhow::{Context, Result};
use grafana_config::{Config, ConfigLoader};
use tracing::warn;

use crate::args::ConnectionArgs;

/// Build the connection configuration for commands that talk to Grafana.
pub(crate) fn load_config(args: &ConnectionArgs) -> Result<Config> {
    let mut loader = ConfigLoader::new();

    if let Some(ref path) = args.config_path
        && !path.to_string_lossy().trim().is_empty()
    {
        loader = loader.with_config_path(path.clone());
    }
    if let Some(ref profile_name) = args.profile {
        loader = loader.with_profile_name(profile_name.clone());
    }

    loader = loader
        .from_env()
        .context("Failed to load configuration from environment")?;

    if loader.profile_name().is_some() {
        loader = loader
            .from_profile()
            .context("Failed to load configuration from profile")?;
    }

    if let Some(ref url) = args.url {
        loader = loader.with_base_url(url.clone());
    }
    if let Some(ref username) = args.username {
        loader = loader.with_username(username.clone());
    }
    if let Some(ref password) = args.password {
        loader = loader.with_password(password.clone());
    }
    if let Some(ref token) = args.api_token {
        loader = loader.with_api_token(token.clone());
    }
    if let Some(org_id) = args.org_id {
        loader = loader.with_org_id(org_id);
    }
    if let Some(timeout_secs) = args.timeout {
        loader = loader.with_timeout(Duration::from_secs(timeout_secs));
    }
    if let Some(retries) = args.max_retries {
        loader = loader.with_max_retries(retries);
    }
    if args.skip_verify {
        loader = loader.with_skip_verify(true);
    }

    let config = loader.build().context("Failed to build configuration")?;

    if config.is_using_default_credentials() {
        warn!(
            "Using default Grafana credentials (admin/admin). \
             These are for local development only."
        );
    }

    Ok(config)
}
