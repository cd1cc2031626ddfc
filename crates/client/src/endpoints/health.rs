//! Health endpoint.

use reqwest::Client;

use crate::endpoints::request::{read_json, send_request_with_retry};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::HealthStatus;

/// Query `/api/health`. Needs no authentication.
pub async fn health(
    client: &Client,
    base_url: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<HealthStatus> {
    let url = format!("{}/api/health", base_url);

    let response =
        send_request_with_retry(client.get(&url), max_retries, "/api/health", "GET", metrics)
            .await?;

    read_json(response, "health status").await
}
