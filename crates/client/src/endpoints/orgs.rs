//! Organization endpoints.

use reqwest::Client;

use crate::auth::Credentials;
use crate::endpoints::request::{read_json, send_request_with_retry};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::Organization;

/// List all organizations. Requires a Grafana server admin.
pub async fn list_organizations(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<Organization>> {
    let url = format!("{}/api/orgs", base_url);

    let builder = credentials.authorize(client.get(&url));
    let response =
        send_request_with_retry(builder, max_retries, "/api/orgs", "GET", metrics).await?;

    read_json(response, "organizations").await
}
