//! Folder endpoint tests.
//!
//! # Invariants
//! - Folder id 0 resolves to the General folder
//! - A missing folder surfaces as a 404 `ApiError`

mod common;

use common::*;
use wiremock::matchers::{body_json, method, path};

#[tokio::test]
async fn test_get_general_folder_by_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/folders/id/0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("folders/general.json")),
        )
        .mount(&mock_server)
        .await;

    let folder = endpoints::get_folder_by_id(
        &Client::new(),
        &mock_server.uri(),
        &test_credentials(),
        0,
        3,
        None,
    )
    .await
    .unwrap();

    assert!(folder.is_general());
    assert_eq!(folder.title, "General");
    assert_eq!(folder.uid, "");
}

#[tokio::test]
async fn test_get_folder_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/folders/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"message": "folder not found"})),
        )
        .mount(&mock_server)
        .await;

    let err = endpoints::get_folder(
        &Client::new(),
        &mock_server.uri(),
        &test_credentials(),
        "missing",
        3,
        None,
    )
    .await
    .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("folder not found"));
}

#[tokio::test]
async fn test_create_folder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/folders"))
        .and(body_json(serde_json::json!({"title": "Ops"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(load_fixture("folders/ops.json")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let folder = endpoints::create_folder(
        &Client::new(),
        &mock_server.uri(),
        &test_credentials(),
        "Ops",
        3,
        None,
    )
    .await
    .unwrap();

    assert_eq!(folder.id, 7);
    assert_eq!(folder.uid, "ops");
}
