//! Dashboard references inside alert rules.
//!
//! An alert rule may link to a dashboard through its `__dashboardUid__`
//! annotation. Uids are instance-specific, so templating replaces the uid
//! with `$$` followed by the dashboard's escaped `org/folder/name`, and
//! inflating replaces that reference with the uid of the destination's
//! dashboard (creating a placeholder dashboard if needed).
//!
//! Lookups are asynchronous while templators are not. A
//! [`DashboardDirectory`] therefore splits the work: [`DashboardDirectory::prepare`]
//! resolves the reference found in one object through the [`Finder`], and
//! [`DashboardDirectory::templator`] rewrites from the resulting table.
//!
//! Invariants:
//! - Uids that cannot be resolved are logged and left as they are.
//! - An unprepared or malformed `$$` reference fails inflation.
//! - A `$$` reference is never resolved to an empty uid.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use grafana_client::ClientError;
use grafana_config::constants::DASHBOARD_REF_PREFIX;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::finder::Finder;
use crate::flow::Direction;
use crate::paths::{GrafanaPath, PathCodec};
use crate::templator::Templator;
use crate::transform::transformer;

/// Annotation linking an alert rule to a dashboard.
pub const DASHBOARD_UID_ANNOTATION: &str = "__dashboardUid__";

#[derive(Debug, Default)]
struct Table {
    paths: HashMap<String, GrafanaPath>,
    uids: HashMap<GrafanaPath, String>,
}

/// Encode a path as a `$$org/folder/name` reference.
pub fn encode_reference(path: &GrafanaPath) -> String {
    let encoded: Vec<String> = path
        .segments()
        .iter()
        .map(|s| PathCodec::encode_segment(s))
        .collect();
    format!("{DASHBOARD_REF_PREFIX}{}", encoded.join("/"))
}

/// Decode a `$$` reference; `None` if `value` is not one.
pub fn decode_reference(value: &str) -> Option<Result<GrafanaPath>> {
    let encoded = value.strip_prefix(DASHBOARD_REF_PREFIX)?;
    let segments: Vec<String> = encoded
        .split('/')
        .filter(|s| !s.is_empty())
        .map(PathCodec::decode_segment)
        .collect();
    Some(PathCodec::try_parse(segments))
}

fn annotation(content: &Value) -> Option<&str> {
    content
        .get("annotations")?
        .get(DASHBOARD_UID_ANNOTATION)?
        .as_str()
}

fn set_annotation(content: &mut Value, value: String) {
    if let Some(annotations) = content.get_mut("annotations").and_then(Value::as_object_mut) {
        annotations.insert(DASHBOARD_UID_ANNOTATION.to_string(), Value::String(value));
    }
}

/// Shared uid ↔ path table for dashboard references. Clones share the table.
#[derive(Debug, Clone)]
pub struct DashboardDirectory {
    finder: Finder,
    table: Arc<RwLock<Table>>,
}

impl DashboardDirectory {
    pub fn new(finder: Finder) -> Self {
        Self {
            finder,
            table: Arc::default(),
        }
    }

    fn insert(&self, uid: String, path: GrafanaPath) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.uids.insert(path.clone(), uid.clone());
        table.paths.insert(uid, path);
    }

    pub fn path_for(&self, uid: &str) -> Option<GrafanaPath> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.paths.get(uid).cloned()
    }

    pub fn uid_for(&self, path: &GrafanaPath) -> Option<String> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.uids.get(path).cloned()
    }

    /// Resolve the reference in `content` ahead of templating in `direction`.
    ///
    /// Templating looks the uid up; inflating create-or-gets the referenced
    /// dashboard. Content without a reference is ignored.
    pub async fn prepare(&self, direction: Direction, content: &Value) -> Result<()> {
        let Some(value) = annotation(content) else {
            return Ok(());
        };

        match direction {
            Direction::ObjectToTemplate => {
                if value.starts_with(DASHBOARD_REF_PREFIX) || self.path_for(value).is_some() {
                    return Ok(());
                }
                match self.finder.dashboard_path(value).await {
                    Ok(path) => {
                        debug!(uid = value, path = %path, "Resolved dashboard reference");
                        self.insert(value.to_string(), path);
                    }
                    Err(e) if e.is_not_found() => {
                        warn!(uid = value, "Could not find dashboard referenced by alert rule");
                    }
                    Err(e) => return Err(e),
                }
            }
            Direction::TemplateToObject => {
                let Some(path) = decode_reference(value) else {
                    return Ok(());
                };
                let path = path?;
                if self.uid_for(&path).is_some() {
                    return Ok(());
                }
                let (identity, _) = self.finder.create_or_get_dashboard(path.clone()).await?;
                let uid = identity
                    .get("uid")
                    .and_then(Value::as_str)
                    .filter(|uid| !uid.is_empty())
                    .ok_or_else(|| {
                        Error::Remote(ClientError::InvalidResponse(format!(
                            "dashboard {path} has no uid"
                        )))
                    })?
                    .to_string();
                debug!(path = %path, uid, "Resolved dashboard reference");
                self.insert(uid, path);
            }
        }
        Ok(())
    }

    /// Templator rewriting `__dashboardUid__` from the prepared table.
    pub fn templator(&self) -> Templator {
        let forward = self.clone();
        let reverse = self.clone();
        Templator::new(
            transformer(move |mut content| {
                let Some(uid) = annotation(&content).map(str::to_string) else {
                    return Ok(content);
                };
                if uid.starts_with(DASHBOARD_REF_PREFIX) {
                    return Ok(content);
                }
                match forward.path_for(&uid) {
                    Some(path) => set_annotation(&mut content, encode_reference(&path)),
                    None => warn!(uid, "Leaving unresolved dashboard uid in template"),
                }
                Ok(content)
            }),
            transformer(move |mut content| {
                let Some(path) = annotation(&content).and_then(decode_reference) else {
                    return Ok(content);
                };
                let path = path?;
                let uid = reverse.uid_for(&path).ok_or_else(|| Error::AmbiguousOrMissing {
                    kind: "dashboard reference",
                    query: path.to_string(),
                    found: 0,
                })?;
                set_annotation(&mut content, uid);
                Ok(content)
            }),
        )
    }
}
