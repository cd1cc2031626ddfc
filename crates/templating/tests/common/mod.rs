//! Common test utilities for templating integration tests.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Clients point at a wiremock server and never retry
//!
//! # What this does NOT handle
//! - Mock setup (use wiremock directly in tests)

#[allow(unused_imports)]
pub use grafana_templating::testing::{load_fixture, mock_client};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use wiremock::matchers::{method, path, query_param};

/// Mount a folder search for `title` answering with `fixture`.
#[allow(dead_code)]
pub async fn mount_folder_search(server: &MockServer, title: &str, fixture: &str) {
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("type", "dash-folder"))
        .and(query_param("query", title))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture(fixture)))
        .mount(server)
        .await;
}

/// Mount a dashboard search for `title` answering with `body`.
#[allow(dead_code)]
pub async fn mount_dashboard_search(server: &MockServer, title: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("type", "dash-db"))
        .and(query_param("query", title))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
