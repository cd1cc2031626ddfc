//! Main Grafana HTTP API client and API methods.
//!
//! This module provides the primary [`GrafanaClient`]. Methods are grouped by
//! resource in private submodules and all delegate to [`crate::endpoints`].
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//! - `search`: Dashboard/folder search
//! - `folders`: Folder lookup and creation
//! - `dashboards`: Dashboard get/update
//! - `alert_rules`: Provisioned alert rule CRUD
//! - `orgs`: Organization listing and org-scoped clones
//! - `datasources`: Datasource listing
//! - `health`: Health probing
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Caching lookups (callers own their caches)
//!
//! # Invariants
//! - Every request carries the client's credentials and organization header.
//! - Cloning a client is cheap; clones share the connection pool.

pub mod builder;

mod alert_rules;
mod dashboards;
mod datasources;
mod folders;
mod health;
mod orgs;
mod search;

use crate::auth::Credentials;
use crate::metrics::MetricsCollector;

/// Grafana HTTP API client.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use grafana_client::{AuthStrategy, GrafanaClient};
/// use secrecy::SecretString;
///
/// let client = GrafanaClient::builder()
///     .base_url("http://localhost:3000".to_string())
///     .auth_strategy(AuthStrategy::ApiToken {
///         token: SecretString::new("glsa_...".to_string().into()),
///     })
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct GrafanaClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) credentials: Credentials,
    pub(crate) max_retries: usize,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl GrafanaClient {
    /// Create a new client builder.
    pub fn builder() -> builder::GrafanaClientBuilder {
        builder::GrafanaClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Organization every request is scoped to, if any.
    pub fn org_id(&self) -> Option<i64> {
        self.credentials.org_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthStrategy;
    use crate::error::ClientError;
    use secrecy::SecretString;

    fn token() -> AuthStrategy {
        AuthStrategy::ApiToken {
            token: SecretString::new("test-token".to_string().into()),
        }
    }

    #[test]
    fn test_client_builder_with_api_token() {
        let client = GrafanaClient::builder()
            .base_url("http://localhost:3000".to_string())
            .auth_strategy(token())
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.org_id(), None);
    }

    #[test]
    fn test_client_builder_missing_base_url() {
        let client = GrafanaClient::builder().auth_strategy(token()).build();
        assert!(matches!(client.unwrap_err(), ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_client_builder_missing_auth() {
        let client = GrafanaClient::builder()
            .base_url("http://localhost:3000".to_string())
            .build();
        assert!(matches!(client.unwrap_err(), ClientError::AuthFailed(_)));
    }

    #[test]
    fn test_with_org_scopes_clone_only() {
        let client = GrafanaClient::builder()
            .base_url("http://localhost:3000/".to_string())
            .auth_strategy(token())
            .org_id(1)
            .build()
            .unwrap();

        let scoped = client.with_org(5);
        assert_eq!(scoped.org_id(), Some(5));
        assert_eq!(client.org_id(), Some(1));
        assert_eq!(scoped.base_url(), "http://localhost:3000");
    }
}
