//! Dashboard API methods for [`GrafanaClient`].

use crate::client::GrafanaClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{DashboardWithMeta, SaveDashboardRequest, SaveDashboardResponse};

impl GrafanaClient {
    /// Get a dashboard and its metadata by uid.
    pub async fn get_dashboard(&self, uid: &str) -> Result<DashboardWithMeta> {
        endpoints::get_dashboard(
            &self.http,
            &self.base_url,
            &self.credentials,
            uid,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Create or overwrite a dashboard.
    pub async fn update_dashboard(
        &self,
        request: &SaveDashboardRequest,
    ) -> Result<SaveDashboardResponse> {
        endpoints::update_dashboard(
            &self.http,
            &self.base_url,
            &self.credentials,
            request,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
