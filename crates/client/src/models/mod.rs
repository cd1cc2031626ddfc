//! Data models for Grafana API responses.
//!
//! Dashboards and alert rules are kept as raw JSON (`serde_json::Value`):
//! the templating layer rewrites them wholesale and must not lose fields this
//! crate does not know about. The envelopes around them (search hits,
//! folders, dashboard metadata, organizations, datasources) are typed.

pub mod dashboards;
pub mod datasources;
pub mod folders;
pub mod health;
pub mod orgs;
pub mod search;

pub use dashboards::{DashboardMeta, DashboardWithMeta, SaveDashboardRequest, SaveDashboardResponse};
pub use datasources::Datasource;
pub use folders::Folder;
pub use health::HealthStatus;
pub use orgs::Organization;
pub use search::{SearchHit, SearchQuery, SearchType};
