//! Dashboard endpoints.

use reqwest::Client;

use crate::auth::Credentials;
use crate::endpoints::request::{read_json, send_request_with_retry};
use crate::endpoints::url_encoding::encode_path_segment;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::{DashboardWithMeta, SaveDashboardRequest, SaveDashboardResponse};

/// Get a dashboard and its metadata by uid.
pub async fn get_dashboard(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    uid: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<DashboardWithMeta> {
    let url = format!(
        "{}/api/dashboards/uid/{}",
        base_url,
        encode_path_segment(uid)
    );

    let builder = credentials.authorize(client.get(&url));
    let response = send_request_with_retry(
        builder,
        max_retries,
        "/api/dashboards/uid/{uid}",
        "GET",
        metrics,
    )
    .await?;

    read_json(response, "dashboard").await
}

/// Create or update a dashboard.
pub async fn update_dashboard(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    request: &SaveDashboardRequest,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<SaveDashboardResponse> {
    let url = format!("{}/api/dashboards/db", base_url);

    let builder = credentials.authorize(client.post(&url)).json(request);
    let response =
        send_request_with_retry(builder, max_retries, "/api/dashboards/db", "POST", metrics)
            .await?;

    read_json(response, "saved dashboard").await
}
