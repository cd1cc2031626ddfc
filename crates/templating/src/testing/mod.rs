//! Testing utilities for templating tests.
//!
//! Available when running tests or when the `test-utils` feature is enabled.

use std::path::Path;

use grafana_client::{AuthStrategy, GrafanaClient};

/// Load a JSON fixture file from the fixtures directory.
///
/// # Panics
/// - If the fixture file cannot be read
/// - If the file content is not valid JSON
pub fn load_fixture(fixture_path: &str) -> serde_json::Value {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let full_path = manifest_dir.join("fixtures").join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("Invalid JSON in fixture")
}

/// A token-authenticated client for a mock server, without retries.
///
/// # Panics
/// - If `base_url` is not a valid URL
pub fn mock_client(base_url: &str) -> GrafanaClient {
    GrafanaClient::builder()
        .base_url(base_url.to_string())
        .auth_strategy(AuthStrategy::ApiToken {
            token: "test-token".to_string().into(),
        })
        .max_retries(0)
        .build()
        .expect("mock client should build")
}
