//! Grafana HTTP API client.
//!
//! This crate provides a type-safe async client for the parts of the Grafana
//! HTTP API used to capture and replay dashboards and alert rules: search,
//! folders, dashboards, provisioned alert rules, organizations, datasources
//! and health. It supports basic authentication and API/service-account
//! tokens, and can scope every request to an organization.

mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{AuthStrategy, Credentials};
pub use client::GrafanaClient;
pub use client::builder::GrafanaClientBuilder;
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use models::{
    DashboardMeta, DashboardWithMeta, Datasource, Folder, HealthStatus, Organization,
    SaveDashboardRequest, SaveDashboardResponse, SearchHit, SearchQuery, SearchType,
};
