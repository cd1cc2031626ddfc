//! Shared test utilities for grafana-templating CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Mount the Grafana endpoints behind the `Ops/CPU Usage` dashboard.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - `GRAFANA_API_TOKEN` is set to "test-token" unless overridden.

use assert_cmd::Command;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(unused_imports)]
pub use grafana_templating::testing::load_fixture;

/// Returns a hermetic `grafana-templating` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - `GRAFANA_API_TOKEN` is set to a dummy value to satisfy config validation.
/// - Retries are disabled so error tests fail fast.
/// - Other sensitive env vars are cleared to ensure no leakage from the host.
pub fn cli_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("grafana-templating");

    cmd.env("DOTENV_DISABLED", "1");
    cmd.env("GRAFANA_API_TOKEN", "test-token");
    cmd.env("GRAFANA_MAX_RETRIES", "0");

    cmd.env_remove("GRAFANA_URL")
        .env_remove("GRAFANA_USERNAME")
        .env_remove("GRAFANA_PASSWORD")
        .env_remove("GRAFANA_ORG_ID")
        .env_remove("GRAFANA_PROFILE")
        .env_remove("GRAFANA_CONFIG_PATH");

    cmd
}

/// Returns a hermetic command pointed at `base_url`.
#[allow(dead_code)]
pub fn cli_cmd_with_url(base_url: &str) -> Command {
    let mut cmd = cli_cmd();
    cmd.env("GRAFANA_URL", base_url);
    cmd
}

/// Mount search, dashboard and folder lookups for `Ops/CPU Usage`.
#[allow(dead_code)]
pub async fn mount_cpu_dashboard(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("type", "dash-folder"))
        .and(query_param("query", "Ops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("search/folders.json")))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("type", "dash-db"))
        .and(query_param("query", "CPU Usage"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("search/dashboards.json")),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/cpu-usage"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("dashboards/cpu_usage.json")),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/folders/ops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("folders/ops.json")))
        .mount(server)
        .await;
}
