//! Search endpoint.

use reqwest::Client;

use crate::auth::Credentials;
use crate::endpoints::request::{read_json, send_request_with_retry};
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::{SearchHit, SearchQuery};

/// Search dashboards and folders.
pub async fn search(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    query: &SearchQuery,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<SearchHit>> {
    let url = format!("{}/api/search", base_url);

    let builder = credentials
        .authorize(client.get(&url))
        .query(&query.to_params());

    let response =
        send_request_with_retry(builder, max_retries, "/api/search", "GET", metrics).await?;

    read_json(response, "search results").await
}
