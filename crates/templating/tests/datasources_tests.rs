//! Datasource table tests against a mocked Grafana.

mod common;

use common::*;
use grafana_templating::DatasourceTable;
use serde_json::json;
use wiremock::matchers::{method, path};

#[tokio::test]
async fn test_table_from_client_rebinds_panels() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/datasources"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("datasources/list.json")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let table = DatasourceTable::from_client(&mock_client(&mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(table.name_for_uid("loki-main"), Some("Loki"));

    let dashboard = load_fixture("dashboards/cpu_usage.json")["dashboard"].clone();
    let template = table.templator().make_template_from_object(&dashboard).unwrap();

    let panel = &template["panels"][0];
    assert_eq!(panel["datasource"], json!({"type": "prometheus", "name": "Prometheus"}));
    assert_eq!(panel["targets"][0]["datasource"]["name"], "Prometheus");
}

#[tokio::test]
async fn test_rebinding_uses_destination_uids() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/datasources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "uid": "prom-staging", "name": "Prometheus", "type": "prometheus", "isDefault": true}
        ])))
        .mount(&mock_server)
        .await;

    let destination = DatasourceTable::from_client(&mock_client(&mock_server.uri()))
        .await
        .unwrap();
    let templator = DatasourceTable::rebinding(&DatasourceTable::default(), &destination);
    let template = json!({"panels": [{"datasource": {"type": "prometheus", "name": "Prometheus"}}]});

    let object = templator
        .make_object_from_template(&json!({"uid": "d"}), &template)
        .unwrap();

    assert_eq!(object["panels"][0]["datasource"]["uid"], "prom-staging");
    assert_eq!(object["uid"], "d");
}
