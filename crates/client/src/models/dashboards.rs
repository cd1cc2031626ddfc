//! Dashboard API models (`/api/dashboards`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata returned next to a dashboard by `GET /api/dashboards/uid/{uid}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMeta {
    #[serde(default)]
    pub folder_id: Option<i64>,
    #[serde(default)]
    pub folder_uid: Option<String>,
    #[serde(default)]
    pub folder_title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A dashboard with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardWithMeta {
    pub dashboard: Value,
    #[serde(default)]
    pub meta: DashboardMeta,
}

/// Body of `POST /api/dashboards/db`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDashboardRequest {
    pub dashboard: Value,
    pub overwrite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response of `POST /api/dashboards/db`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDashboardResponse {
    pub id: i64,
    pub uid: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
}
