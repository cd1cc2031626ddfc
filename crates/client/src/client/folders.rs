//! Folder API methods for [`GrafanaClient`].
//!
//! # What this module does NOT handle:
//! - Resolving folders by title (see the templating crate's finder)

use crate::client::GrafanaClient;
use crate::endpoints;
use crate::error::Result;
use crate::models::Folder;

impl GrafanaClient {
    /// Get a folder by uid.
    pub async fn get_folder(&self, uid: &str) -> Result<Folder> {
        endpoints::get_folder(
            &self.http,
            &self.base_url,
            &self.credentials,
            uid,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Get a folder by numeric id; id 0 is the General folder.
    pub async fn get_folder_by_id(&self, id: i64) -> Result<Folder> {
        endpoints::get_folder_by_id(
            &self.http,
            &self.base_url,
            &self.credentials,
            id,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    /// Create a folder.
    pub async fn create_folder(&self, title: &str) -> Result<Folder> {
        endpoints::create_folder(
            &self.http,
            &self.base_url,
            &self.credentials,
            title,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
