//! Bulk export/import tests.
//!
//! # Invariants
//! - Export writes `{kind}/{org}/{folder}/{name}.json` for every object
//! - Import inflates each file with the identity found at its path

mod common;

use common::*;
use grafana_templating::{BulkExporter, BulkImporter, BulkSummary, Templator};
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};

async fn mount_single_org(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/orgs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Main Org."}])),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_export_writes_tree_per_org() {
    let mock_server = MockServer::start().await;
    mount_single_org(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("type", "dash-db"))
        .and(query_param("page", "1"))
        .and(header("X-Grafana-Org-Id", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("search/dashboards.json")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/dashboards/uid/cpu-usage"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("dashboards/cpu_usage.json")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/folders/ops"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("folders/ops.json")))
        .mount(&mock_server)
        .await;

    let rules = load_fixture("alert_rules/list.json");
    Mock::given(method("GET"))
        .and(path("/api/v1/provisioning/alert-rules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rules.clone()))
        .mount(&mock_server)
        .await;
    for rule in rules.as_array().unwrap() {
        let uid = rule["uid"].as_str().unwrap();
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/provisioning/alert-rules/{uid}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(rule.clone()))
            .mount(&mock_server)
            .await;
    }

    let dir = tempfile::tempdir().unwrap();
    let summary = BulkExporter::new(mock_client(&mock_server.uri()), dir.path(), Templator::default())
        .run()
        .await
        .unwrap();

    assert_eq!(
        summary,
        BulkSummary {
            organizations: 1,
            dashboards: 1,
            alerts: 2
        }
    );

    let dashboard: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("dashboards/Main+Org./Ops/CPU+Usage.json"))
            .unwrap(),
    )
    .unwrap();
    assert_eq!(dashboard["title"], "CPU Usage");
    assert!(dashboard.get("uid").is_none());
    assert!(dir.path().join("alerts/Main+Org./Ops/High+CPU.json").is_file());
    assert!(dir.path().join("alerts/Main+Org./Ops/Disk+Full.json").is_file());
}

#[tokio::test]
async fn test_import_inflates_with_existing_identity() {
    let mock_server = MockServer::start().await;
    mount_single_org(&mock_server).await;
    mount_folder_search(&mock_server, "Ops", "search/folders.json").await;
    mount_dashboard_search(&mock_server, "CPU Usage", load_fixture("search/dashboards.json")).await;

    Mock::given(method("POST"))
        .and(path("/api/dashboards/db"))
        .and(header("X-Grafana-Org-Id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("dashboards/saved.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("dashboards/Main+Org./Ops/CPU+Usage.json");
    std::fs::create_dir_all(file.parent().unwrap()).unwrap();
    std::fs::write(&file, load_fixture("templates/cpu_usage.json").to_string()).unwrap();

    let summary = BulkImporter::new(mock_client(&mock_server.uri()), dir.path(), Templator::default())
        .run()
        .await
        .unwrap();

    assert_eq!(summary.dashboards, 1);
    assert_eq!(summary.alerts, 0);

    let requests = mock_server.received_requests().await.unwrap();
    let save = requests
        .iter()
        .find(|r| r.url.path() == "/api/dashboards/db")
        .unwrap();
    let body: Value = serde_json::from_slice(&save.body).unwrap();
    assert_eq!(body["dashboard"]["uid"], "cpu-usage");
    assert_eq!(body["dashboard"]["id"], 21);
    assert_eq!(body["folderUid"], "ops");
}

#[tokio::test]
async fn test_import_of_empty_tree_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let summary = BulkImporter::new(mock_client("http://localhost:3000"), dir.path(), Templator::default())
        .run()
        .await
        .unwrap();

    assert_eq!(summary, BulkSummary::default());
}
