//! Organization API methods for [`GrafanaClient`].

use crate::client::GrafanaClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::Organization;

impl GrafanaClient {
    /// List all organizations.
    pub async fn list_organizations(&self) -> Result<Vec<Organization>> {
        endpoints::list_organizations(
            &self.http,
            &self.base_url,
            &self.credentials,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// A clone of this client acting in another organization.
    pub fn with_org(&self, org_id: i64) -> GrafanaClient {
        GrafanaClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            credentials: self.credentials.with_org(org_id),
            max_retries: self.max_retries,
            metrics: self.metrics.clone(),
        }
    }
}
