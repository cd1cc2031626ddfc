//! Health check model (`GET /api/health`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub commit: Option<String>,
}

impl HealthStatus {
    /// Grafana reports `"database": "ok"` once migrations have run.
    pub fn is_ok(&self) -> bool {
        self.database.as_deref() == Some("ok")
    }
}
