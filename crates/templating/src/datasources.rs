//! Rebinding panel datasources between uid and name.
//!
//! Datasource uids differ between Grafana instances while names usually do
//! not. Templating rewrites every panel and target datasource reference from
//! `{"uid": ...}` to `{"name": ...}`; inflating rewrites it back using the
//! destination's table.
//!
//! Invariants:
//! - References to the expression pseudo-datasource (`__expr__`) are never
//!   rewritten.
//! - References not in the table are left as they are.

use std::sync::Arc;

use grafana_client::{Datasource, GrafanaClient};
use grafana_config::constants::EXPRESSION_DATASOURCE_UID;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;
use crate::templator::Templator;
use crate::transform::{Transformer, panel_transformer, transformer};

/// One `{uid, name}` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasourceRef {
    pub uid: String,
    pub name: String,
}

impl From<Datasource> for DatasourceRef {
    fn from(ds: Datasource) -> Self {
        Self {
            uid: ds.uid,
            name: ds.name,
        }
    }
}

/// The datasources of one organization.
#[derive(Debug, Clone, Default)]
pub struct DatasourceTable {
    entries: Vec<DatasourceRef>,
}

#[derive(Clone, Copy)]
enum Direction {
    UidToName,
    NameToUid,
}

impl DatasourceTable {
    pub fn new(entries: Vec<DatasourceRef>) -> Self {
        Self { entries }
    }

    /// Build the table from the datasources visible to `client`.
    pub async fn from_client(client: &GrafanaClient) -> Result<Self> {
        let datasources = client.list_datasources().await?;
        debug!(count = datasources.len(), "Loaded datasource table");
        Ok(Self::new(datasources.into_iter().map(Into::into).collect()))
    }

    pub fn name_for_uid(&self, uid: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.uid == uid)
            .map(|e| e.name.as_str())
    }

    pub fn uid_for_name(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.uid.as_str())
    }

    /// Transformer rewriting panel datasource uids to names.
    pub fn uid_to_name(&self) -> Transformer {
        self.panel_rewriter(Direction::UidToName)
    }

    /// Transformer rewriting panel datasource names to uids.
    pub fn name_to_uid(&self) -> Transformer {
        self.panel_rewriter(Direction::NameToUid)
    }

    /// Templator pairing [`Self::uid_to_name`] with [`Self::name_to_uid`].
    ///
    /// Use the source instance's table for templating and the destination's
    /// for inflating; see [`Self::rebinding`].
    pub fn templator(&self) -> Templator {
        Templator::new(self.uid_to_name(), self.name_to_uid())
    }

    /// Templator using `source` when templating and `destination` when inflating.
    pub fn rebinding(source: &DatasourceTable, destination: &DatasourceTable) -> Templator {
        Templator::new(source.uid_to_name(), destination.name_to_uid())
    }

    fn panel_rewriter(&self, direction: Direction) -> Transformer {
        let table = Arc::new(self.clone());
        panel_transformer(transformer(move |mut panel| {
            if let Value::Object(fields) = &mut panel {
                if let Some(Value::Object(reference)) = fields.get_mut("datasource") {
                    table.rewrite(reference, direction);
                }
                if let Some(Value::Array(targets)) = fields.get_mut("targets") {
                    for target in targets.iter_mut() {
                        if let Some(Value::Object(reference)) = target.get_mut("datasource") {
                            table.rewrite(reference, direction);
                        }
                    }
                }
            }
            Ok(panel)
        }))
    }

    fn rewrite(&self, reference: &mut Map<String, Value>, direction: Direction) {
        match direction {
            Direction::UidToName => {
                let Some(uid) = reference.get("uid").and_then(Value::as_str) else {
                    return;
                };
                if uid == EXPRESSION_DATASOURCE_UID {
                    return;
                }
                if let Some(name) = self.name_for_uid(uid) {
                    let name = Value::String(name.to_string());
                    reference.shift_remove("uid");
                    reference.insert("name".to_string(), name);
                }
            }
            Direction::NameToUid => {
                let Some(name) = reference.get("name").and_then(Value::as_str) else {
                    return;
                };
                if let Some(uid) = self.uid_for_name(name) {
                    if uid == EXPRESSION_DATASOURCE_UID {
                        return;
                    }
                    let uid = Value::String(uid.to_string());
                    reference.shift_remove("name");
                    reference.insert("uid".to_string(), uid);
                }
            }
        }
    }
}
