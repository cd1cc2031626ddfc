//! Error handling and retry tests.
//!
//! # Invariants
//! - HTTP 429 is retried with exponential backoff up to `max_retries`
//! - `max_retries == 0` sends exactly one request
//! - Other statuses fail immediately with Grafana's message

mod common;

use common::*;
use grafana_client::{ClientError, SearchQuery};
use wiremock::matchers::{method, path};

#[tokio::test(start_paused = true)]
async fn test_rate_limited_request_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let hits = endpoints::search(
        &Client::new(),
        &mock_server.uri(),
        &test_credentials(),
        &SearchQuery::new(),
        2,
        None,
    )
    .await
    .unwrap();

    assert!(hits.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_exhausts_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orgs"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    let err = endpoints::list_organizations(
        &Client::new(),
        &mock_server.uri(),
        &test_credentials(),
        2,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::MaxRetriesExceeded(3)));
}

#[tokio::test]
async fn test_zero_retries_sends_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orgs"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = endpoints::list_organizations(
        &Client::new(),
        &mock_server.uri(),
        &test_credentials(),
        0,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::MaxRetriesExceeded(1)));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/datasources"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = endpoints::list_datasources(
        &Client::new(),
        &mock_server.uri(),
        &test_credentials(),
        3,
        None,
    )
    .await
    .unwrap_err();

    match err {
        ClientError::ApiError {
            status, message, ..
        } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orgs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = endpoints::list_organizations(
        &Client::new(),
        &mock_server.uri(),
        &test_credentials(),
        0,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ClientError::InvalidResponse(_)));
}
