//! Migration lifecycle tests with a fake disposable instance.
//!
//! # Invariants
//! - Teardown runs after success, after a failing step and after a readiness timeout

mod common;

use std::time::Duration;

use async_trait::async_trait;
use common::*;
use grafana_templating::{DisposableInstance, Endpoint, Error, Result, migrate};
use wiremock::matchers::{method, path};

/// Instance pointing at a mock server that records teardown.
struct FakeInstance {
    endpoint: Endpoint,
    fail_start: bool,
    teardowns: usize,
}

impl FakeInstance {
    fn new(server: &MockServer) -> Self {
        Self {
            endpoint: Endpoint {
                host: server.address().ip().to_string(),
                port: server.address().port(),
            },
            fail_start: false,
            teardowns: 0,
        }
    }
}

#[async_trait]
impl DisposableInstance for FakeInstance {
    async fn start(&mut self) -> Result<Endpoint> {
        if self.fail_start {
            return Err(Error::Migration("no docker".to_string()));
        }
        Ok(self.endpoint.clone())
    }

    async fn teardown(&mut self) -> Result<()> {
        self.teardowns += 1;
        Ok(())
    }
}

async fn healthy_server() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"database": "ok", "version": "10.4.0"})),
        )
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_work_runs_against_ready_instance() {
    let mock_server = healthy_server().await;
    let mut instance = FakeInstance::new(&mock_server);

    let url = migrate(&mut instance, Duration::from_secs(5), |endpoint| async move {
        Ok(endpoint.base_url())
    })
    .await
    .unwrap();

    assert_eq!(url, mock_server.uri());
    assert_eq!(instance.teardowns, 1);
}

#[tokio::test]
async fn test_teardown_after_failing_work() {
    let mock_server = healthy_server().await;
    let mut instance = FakeInstance::new(&mock_server);

    let err = migrate(&mut instance, Duration::from_secs(5), |_| async {
        Err::<(), _>(Error::Unsupported("export failed".to_string()))
    })
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Unsupported(_)));
    assert_eq!(instance.teardowns, 1);
}

#[tokio::test]
async fn test_teardown_after_readiness_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    let mut instance = FakeInstance::new(&mock_server);

    let err = migrate(&mut instance, Duration::from_millis(800), |_| async { Ok(()) })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Migration(_)));
    assert!(err.to_string().contains("not ready"));
    assert_eq!(instance.teardowns, 1);
}

#[tokio::test]
async fn test_teardown_after_failed_start() {
    let mock_server = MockServer::start().await;
    let mut instance = FakeInstance::new(&mock_server);
    instance.fail_start = true;

    let err = migrate(&mut instance, Duration::from_secs(1), |_| async { Ok(()) })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no docker"));
    assert_eq!(instance.teardowns, 1);
}
