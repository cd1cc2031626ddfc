//! Folder endpoints.

use reqwest::Client;
use serde_json::json;

use crate::auth::Credentials;
use crate::endpoints::request::{read_json, send_request_with_retry};
use crate::endpoints::url_encoding::encode_path_segment;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::Folder;

/// Get a folder by uid.
pub async fn get_folder(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    uid: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Folder> {
    let url = format!("{}/api/folders/{}", base_url, encode_path_segment(uid));

    let builder = credentials.authorize(client.get(&url));
    let response =
        send_request_with_retry(builder, max_retries, "/api/folders/{uid}", "GET", metrics)
            .await?;

    read_json(response, "folder").await
}

/// Get a folder by numeric id. Id 0 is the built-in General folder.
pub async fn get_folder_by_id(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    id: i64,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Folder> {
    let url = format!("{}/api/folders/id/{}", base_url, id);

    let builder = credentials.authorize(client.get(&url));
    let response =
        send_request_with_retry(builder, max_retries, "/api/folders/id/{id}", "GET", metrics)
            .await?;

    read_json(response, "folder").await
}

/// Create a folder with the given title.
pub async fn create_folder(
    client: &Client,
    base_url: &str,
    credentials: &Credentials,
    title: &str,
    max_retries: usize,
    metrics: Option<&MetricsCollector>,
) -> Result<Folder> {
    let url = format!("{}/api/folders", base_url);

    let builder = credentials
        .authorize(client.post(&url))
        .json(&json!({ "title": title }));
    let response =
        send_request_with_retry(builder, max_retries, "/api/folders", "POST", metrics).await?;

    read_json(response, "created folder").await
}
