//! Health API methods for [`GrafanaClient`].

use crate::client::GrafanaClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::HealthStatus;

impl GrafanaClient {
    /// Query the instance's health endpoint.
    pub async fn health(&self) -> Result<HealthStatus> {
        endpoints::health(
            &self.http,
            &self.base_url,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
