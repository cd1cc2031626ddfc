//! Datasource API methods for [`GrafanaClient`].

use crate::client::GrafanaClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::Datasource;

impl GrafanaClient {
    /// List the datasources of the client's organization.
    pub async fn list_datasources(&self) -> Result<Vec<Datasource>> {
        endpoints::list_datasources(
            &self.http,
            &self.base_url,
            &self.credentials,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
