//! Datasource models (`GET /api/datasources`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datasource {
    pub id: i64,
    pub uid: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, rename = "isDefault")]
    pub is_default: bool,
}
