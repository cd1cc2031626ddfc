//! Alert rule API methods for [`GrafanaClient`].
//!
//! Rules are exchanged as raw JSON. Writes take a `disable_provenance` flag;
//! when set, Grafana keeps the rule editable in its UI.

use serde_json::Value;

use crate::client::GrafanaClient;
use crate::endpoints;
use crate::error::Result;

impl GrafanaClient {
    pub async fn get_alert_rule(&self, uid: &str) -> Result<Value> {
        endpoints::get_alert_rule(
            &self.http,
            &self.base_url,
            &self.credentials,
            uid,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    pub async fn list_alert_rules(&self) -> Result<Vec<Value>> {
        endpoints::list_alert_rules(
            &self.http,
            &self.base_url,
            &self.credentials,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    pub async fn create_alert_rule(&self, rule: &Value, disable_provenance: bool) -> Result<Value> {
        endpoints::create_alert_rule(
            &self.http,
            &self.base_url,
            &self.credentials,
            rule,
            disable_provenance,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }

    pub async fn update_alert_rule(
        &self,
        uid: &str,
        rule: &Value,
        disable_provenance: bool,
    ) -> Result<Value> {
        endpoints::update_alert_rule(
            &self.http,
            &self.base_url,
            &self.credentials,
            uid,
            rule,
            disable_provenance,
            self.max_retries,
            self.metrics.as_ref(),
        )
        .await
    }
}
