//! Provisioned alert rule endpoints (`/api/v1/provisioning/alert-rules`).

use reqwest::Client;
use serde_json::Value;

use crate::auth::Credentials;
use crate::endpoints::request::{read_json, send_request_with_retry};
use crate::endpoints::url_encoding::encode_path_segment;
use crate::error::Result;
use crate::metrics::MetricsCollector;

/// Header asking Grafana not to mark written rules as provisioned, so they
/// stay editable in the UI.
pub const DISABLE_PROVENANCE_HEADER: &str = "X-Disable-Provenance";

const RULES_PATH: &str = "/api/v1/provisioning/alert-rules";

/// Get an alert rule by uid.
pub async fn get_alert_rule(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    uid: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Value> {
    let url = format!("{}{}/{}", base_url, RULES_PATH, encode_path_segment(uid));

    let builder = credentials.authorize(client.get(&url));
    let response = send_request_with_retry(
        builder,
        max_retries,
        "/api/v1/provisioning/alert-rules/{uid}",
        "GET",
        metrics,
    )
    .await?;

    read_json(response, "alert rule").await
}

/// List every alert rule visible in the current organization.
pub async fn list_alert_rules(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<Value>> {
    let url = format!("{}{}", base_url, RULES_PATH);

    let builder = credentials.authorize(client.get(&url));
    let response =
        send_request_with_retry(builder, max_retries, RULES_PATH, "GET", metrics).await?;

    read_json(response, "alert rules").await
}

/// Create an alert rule.
pub async fn create_alert_rule(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    rule: &Value,
    disable_provenance: bool,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Value> {
    let url = format!("{}{}", base_url, RULES_PATH);

    let mut builder = credentials.authorize(client.post(&url)).json(rule);
    if disable_provenance {
        builder = builder.header(DISABLE_PROVENANCE_HEADER, "true");
    }
    let response =
        send_request_with_retry(builder, max_retries, RULES_PATH, "POST", metrics).await?;

    read_json(response, "created alert rule").await
}

/// Replace the alert rule with the given uid.
#[allow(clippy::too_many_arguments)]
pub async fn update_alert_rule(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    uid: &str,
    rule: &Value,
    disable_provenance: bool,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Value> {
    let url = format!("{}{}/{}", base_url, RULES_PATH, encode_path_segment(uid));

    let mut builder = credentials.authorize(client.put(&url)).json(rule);
    if disable_provenance {
        builder = builder.header(DISABLE_PROVENANCE_HEADER, "true");
    }
    let response = send_request_with_retry(
        builder,
        max_retries,
        "/api/v1/provisioning/alert-rules/{uid}",
        "PUT",
        metrics,
    )
    .await?;

    read_json(response, "updated alert rule").await
}
