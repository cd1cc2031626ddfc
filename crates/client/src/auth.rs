//! Request authentication for the Grafana API.
//!
//! Responsibilities:
//! - Hold the credentials a client authenticates with.
//! - Attach `Authorization` and organization headers to outgoing requests.
//!
//! Invariants:
//! - Secrets stay wrapped in `SecretString` and are only exposed while building a request.
//! - The organization header is only sent when an org id is configured.

use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};

/// Header Grafana reads to pick the organization a request acts in.
pub const ORG_ID_HEADER: &str = "X-Grafana-Org-Id";

/// Authentication strategy for the Grafana client.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// HTTP basic authentication.
    Basic {
        username: String,
        password: SecretString,
    },
    /// API key or service-account token sent as a bearer token.
    ApiToken { token: SecretString },
}

/// Credentials plus the organization scope applied to every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    strategy: AuthStrategy,
    org_id: Option<i64>,
}

impl Credentials {
    pub fn new(strategy: AuthStrategy, org_id: Option<i64>) -> Self {
        Self { strategy, org_id }
    }

    /// Shorthand for token credentials without an organization scope.
    pub fn token(token: &str) -> Self {
        Self::new(
            AuthStrategy::ApiToken {
                token: SecretString::new(token.to_string().into()),
            },
            None,
        )
    }

    pub fn org_id(&self) -> Option<i64> {
        self.org_id
    }

    pub fn strategy(&self) -> &AuthStrategy {
        &self.strategy
    }

    /// Same credentials scoped to another organization.
    pub fn with_org(&self, org_id: i64) -> Self {
        Self {
            strategy: self.strategy.clone(),
            org_id: Some(org_id),
        }
    }

    /// Attach authentication and organization headers to a request.
    pub fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = match &self.strategy {
            AuthStrategy::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
            AuthStrategy::ApiToken { token } => builder.bearer_auth(token.expose_secret()),
        };
        match self.org_id {
            Some(org_id) => builder.header(ORG_ID_HEADER, org_id.to_string()),
            None => builder,
        }
    }
}
