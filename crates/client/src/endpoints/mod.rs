//! Grafana HTTP API endpoint implementations.
//!
//! Each endpoint is a free function taking the HTTP client, base URL and
//! credentials explicitly, so it can be exercised directly against a mock
//! server. [`crate::GrafanaClient`] wraps them with its own configuration.

mod alert_rules;
mod dashboards;
mod datasources;
mod folders;
mod health;
mod orgs;
mod request;
mod search;
pub mod url_encoding;

pub use alert_rules::{
    DISABLE_PROVENANCE_HEADER, create_alert_rule, get_alert_rule, list_alert_rules,
    update_alert_rule,
};
pub use dashboards::{get_dashboard, update_dashboard};
pub use datasources::list_datasources;
pub use folders::{create_folder, get_folder, get_folder_by_id};
pub use health::health;
pub use orgs::list_organizations;
pub use request::send_request_with_retry;
pub use search::search;
