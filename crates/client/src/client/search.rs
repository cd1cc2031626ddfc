//! Search API methods for [`GrafanaClient`].

use crate::client::GrafanaClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::{SearchHit, SearchQuery};

impl GrafanaClient {
    /// Search dashboards and folders.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>> {
        endpoints::search(
            &self.http,
            &self.base_url,
            &self.credentials,
            query,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
