//! Integration tests for `dashboard` and `alert` commands.
//!
//! Responsibilities:
//! - Validate help text and argument validation.
//! - Export a dashboard from a mocked instance into a template file.
//! - Import a template file into a mocked instance.
//!
//! Invariants:
//! - All tests use the hermetic `cli_cmd()` helper.

mod common;

use common::{cli_cmd, cli_cmd_with_url, load_fixture, mount_cpu_dashboard};
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_dashboard_help() {
    cli_cmd()
        .args(["dashboard", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("export")
                .and(predicate::str::contains("import")),
        );
}

#[test]
fn test_export_help_lists_templating_flags() {
    cli_cmd()
        .args(["dashboard", "export", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--mapping")
                .and(predicate::str::contains("--grafana-env"))
                .and(predicate::str::contains("--template-env"))
                .and(predicate::str::contains("--strip-edit-metadata")),
        );
}

#[test]
fn test_mapping_without_envs_is_rejected() {
    cli_cmd()
        .args([
            "dashboard",
            "export",
            "--src",
            "Ops/CPU Usage",
            "--dst",
            "cpu.json",
            "--mapping",
            "{}",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--grafana-env"));
}

#[tokio::test]
async fn test_dashboard_export_writes_template() {
    let server = MockServer::start().await;
    mount_cpu_dashboard(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("cpu.json");

    cli_cmd_with_url(&server.uri())
        .args([
            "dashboard",
            "export",
            "--src",
            "Ops/CPU Usage",
            "--dst",
            dst.to_str().unwrap(),
            "--mapping",
            r#"{"production": {"env": "production", "prometheus": "P1809F7CD0C75ACF3"}}"#,
            "--grafana-env",
            "production",
            "--template-env",
            "$auto",
            "--strip-edit-metadata",
        ])
        .assert()
        .success();

    let template: Value = serde_json::from_str(&std::fs::read_to_string(&dst).unwrap()).unwrap();
    assert!(template.get("uid").is_none());
    assert!(template.get("version").is_none());
    assert_eq!(template["title"], "CPU Usage");
    assert_eq!(template["panels"][0]["title"], "CPU on ${env}");
    assert_eq!(template["panels"][0]["datasource"]["uid"], "${prometheus}");
}

#[tokio::test]
async fn test_dashboard_import_fills_destination() {
    let server = MockServer::start().await;
    mount_cpu_dashboard(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/dashboards/db"))
        .and(body_partial_json(json!({
            "overwrite": true,
            "folderUid": "ops",
            "dashboard": {"uid": "cpu-usage", "id": 21}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("dashboards/saved.json")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("cpu.json");
    std::fs::write(
        &src,
        serde_json::to_string(&load_fixture("templates/cpu_usage.json")).unwrap(),
    )
    .unwrap();

    cli_cmd_with_url(&server.uri())
        .args([
            "dashboard",
            "import",
            "--src",
            src.to_str().unwrap(),
            "--dst",
            "Ops/CPU Usage",
            "--mapping",
            r#"{"staging": {"env": "staging", "prometheus": "PSTAGING0000001"}}"#,
            "--grafana-env",
            "staging",
            "--template-env",
            "$auto",
        ])
        .assert()
        .success();

    let requests = server.received_requests().await.unwrap();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .unwrap();
    let body: Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["dashboard"]["panels"][0]["title"], "CPU on staging");
    assert_eq!(
        body["dashboard"]["panels"][0]["datasource"]["uid"],
        "PSTAGING0000001"
    );
}

#[tokio::test]
async fn test_import_missing_file_fails() {
    let server = MockServer::start().await;
    mount_cpu_dashboard(&server).await;

    cli_cmd_with_url(&server.uri())
        .args([
            "dashboard",
            "import",
            "--src",
            "/nonexistent/cpu.json",
            "--dst",
            "Ops/CPU Usage",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to import dashboard"));
}
