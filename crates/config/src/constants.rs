//! Centralized constants for the Grafana templating workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed connection timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of retries for rate-limited requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Maximum allowed value for max_retries.
pub const MAX_MAX_RETRIES: usize = 10;

/// Default Grafana HTTP port.
pub const DEFAULT_GRAFANA_PORT: u16 = 3000;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

// =============================================================================
// Grafana Object Model
// =============================================================================

/// Title of the built-in folder that ordinary folder search never returns.
pub const GENERAL_FOLDER: &str = "General";

/// Reserved numeric id of the built-in "General" folder.
pub const GENERAL_FOLDER_ID: i64 = 0;

/// Datasource uid of Grafana's server-side expression pseudo-datasource.
pub const EXPRESSION_DATASOURCE_UID: &str = "__expr__";

/// Template environment name that generates `${key}` placeholders.
pub const AUTO_MAPPING_ENV: &str = "$auto";

/// Prefix marking an encoded dashboard reference inside a template.
pub const DASHBOARD_REF_PREFIX: &str = "$$";

// =============================================================================
// Migration Defaults
// =============================================================================

/// Default time to wait for a disposable Grafana instance to report healthy.
pub const DEFAULT_READINESS_TIMEOUT_SECS: u64 = 120;

/// Interval between readiness probes in milliseconds.
pub const DEFAULT_READINESS_POLL_MS: u64 = 500;

/// Default admin username for a disposable Grafana instance.
pub const DEFAULT_ADMIN_USER: &str = "admin";
