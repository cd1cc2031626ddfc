//! Common test utilities for integration tests.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - All fixture files must be valid JSON
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)

#[allow(unused_imports)]
pub use grafana_client::testing::load_fixture;

#[allow(unused_imports)]
pub use grafana_client::endpoints;
#[allow(unused_imports)]
pub use grafana_client::{Credentials, GrafanaClient};
#[allow(unused_imports)]
pub use reqwest::Client;
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token credentials used against mock servers.
#[allow(dead_code)]
pub fn test_credentials() -> Credentials {
    Credentials::token("test-token")
}
