//! Datasource endpoints.

use reqwest::Client;

use crate::auth::Credentials;
use crate::endpoints::request::{read_json, send_request_with_retry};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::Datasource;

/// List the datasources of the current organization.
pub async fn list_datasources(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<Datasource>> {
    let url = format!("{}/api/datasources", base_url);

    let builder = credentials.authorize(client.get(&url));
    let response =
        send_request_with_retry(builder, max_retries, "/api/datasources", "GET", metrics).await?;

    read_json(response, "datasources").await
}
