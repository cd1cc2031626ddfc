//! Export or import every dashboard and alert rule of every organization.
//!
//! The file tree is the [`crate::store::FileStore`] layout with the
//! organization always present:
//!
//! ```text
//! {root}/dashboards/{org}/{folder}/{name}.json
//! {root}/alerts/{org}/{folder}/{name}.json
//! ```
//!
//! Responsibilities:
//! - Walk organizations through org-scoped clients.
//! - Template on export, inflate on import, with one [`Templator`] for all
//!   objects.
//!
//! Does NOT handle:
//! - Creating organizations. Importing into an organization that does not
//!   exist fails.
//! - Continuing past errors. The first failure aborts the run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use grafana_client::GrafanaClient;
use grafana_config::constants::GENERAL_FOLDER;
use serde_json::Value;
use tracing::info;

use crate::cache::LookupCache;
use crate::error::{Error, Result};
use crate::exchange;
use crate::finder::Finder;
use crate::flow::{Direction, link_dashboard};
use crate::paths::{GrafanaPath, PathCodec};
use crate::references::DashboardDirectory;
use crate::store::{ALERTS_DIR, DASHBOARDS_DIR, OBJECT_EXTENSION, object_file, read_json_file, write_json_file};
use crate::templator::Templator;

/// Counts of what a bulk run touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkSummary {
    pub organizations: usize,
    pub dashboards: usize,
    pub alerts: usize,
}

fn title_of(content: &Value) -> String {
    content
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn uid_of(content: &Value) -> Option<&str> {
    content.get("uid").and_then(Value::as_str)
}

/// Sorted entries of `dir` that are directories (or `.json` files when
/// `dirs` is false). A missing directory has no entries.
async fn entries(dir: &Path, dirs: bool) -> Result<Vec<PathBuf>> {
    let mut reader = match tokio::fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::io(dir, e)),
    };
    let mut found = Vec::new();
    while let Some(entry) = reader.next_entry().await.map_err(|e| Error::io(dir, e))? {
        let file_type = entry.file_type().await.map_err(|e| Error::io(entry.path(), e))?;
        let path = entry.path();
        let wanted = if dirs {
            file_type.is_dir()
        } else {
            file_type.is_file() && path.extension().is_some_and(|ext| ext == OBJECT_EXTENSION)
        };
        if wanted {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

fn decoded_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(&format!(".{OBJECT_EXTENSION}"))
        .unwrap_or(&file_name);
    PathCodec::decode_segment(stem)
}

/// Writes every object of every organization to a file tree.
#[derive(Debug, Clone)]
pub struct BulkExporter {
    client: GrafanaClient,
    root: PathBuf,
    templator: Templator,
    dashboard_references: bool,
}

impl BulkExporter {
    pub fn new(client: GrafanaClient, root: impl Into<PathBuf>, templator: Templator) -> Self {
        Self {
            client,
            root: root.into(),
            templator,
            dashboard_references: false,
        }
    }

    /// Rewrite alert rules' dashboard links to path references.
    pub fn with_dashboard_references(mut self, enabled: bool) -> Self {
        self.dashboard_references = enabled;
        self
    }

    pub async fn run(&self) -> Result<BulkSummary> {
        let mut summary = BulkSummary::default();
        let base = Finder::with_cache(self.client.clone(), LookupCache::scoped());

        for org in self.client.list_organizations().await? {
            let finder = base.scoped_to(Some(&org.name)).await?;
            let directory = self
                .dashboard_references
                .then(|| DashboardDirectory::new(finder.clone()));
            summary.organizations += 1;

            for hit in finder.list_dashboards().await? {
                let (content, folder) = exchange::export_dashboard(finder.client(), &hit.uid).await?;
                let folder = folder
                    .map(|f| f.title)
                    .unwrap_or_else(|| GENERAL_FOLDER.to_string());
                let path = GrafanaPath::in_org(org.name.clone(), folder, title_of(&content));
                let template = self.templator.make_template_from_object(&content)?;
                info!(path = %path, "Exporting dashboard");
                write_json_file(&object_file(&self.root, DASHBOARDS_DIR, &path), &template).await?;
                summary.dashboards += 1;
            }

            for rule in finder.list_alerts().await? {
                let Some(uid) = uid_of(&rule) else {
                    continue;
                };
                let (content, folder) = exchange::export_alert(finder.client(), uid).await?;
                let path = GrafanaPath::in_org(org.name.clone(), folder.title, title_of(&content));
                let content = match &directory {
                    Some(directory) => {
                        link_dashboard(directory, Direction::ObjectToTemplate, &Value::Null, content).await?
                    }
                    None => content,
                };
                let template = self.templator.make_template_from_object(&content)?;
                info!(path = %path, "Exporting alert rule");
                write_json_file(&object_file(&self.root, ALERTS_DIR, &path), &template).await?;
                summary.alerts += 1;
            }
        }

        Ok(summary)
    }
}

/// Imports a file tree written by [`BulkExporter`].
///
/// Each object is inflated with the identity of the object already at its
/// path (created as a placeholder if missing), so importing twice updates
/// rather than duplicates.
#[derive(Debug, Clone)]
pub struct BulkImporter {
    client: GrafanaClient,
    root: PathBuf,
    templator: Templator,
    dashboard_references: bool,
}

impl BulkImporter {
    pub fn new(client: GrafanaClient, root: impl Into<PathBuf>, templator: Templator) -> Self {
        Self {
            client,
            root: root.into(),
            templator,
            dashboard_references: false,
        }
    }

    /// Resolve `$$` dashboard references in alert rules.
    pub fn with_dashboard_references(mut self, enabled: bool) -> Self {
        self.dashboard_references = enabled;
        self
    }

    /// Organization names present in the tree.
    pub async fn organizations(&self) -> Result<BTreeSet<String>> {
        let mut orgs = BTreeSet::new();
        for kind in [DASHBOARDS_DIR, ALERTS_DIR] {
            for dir in entries(&self.root.join(kind), true).await? {
                orgs.insert(decoded_name(&dir));
            }
        }
        Ok(orgs)
    }

    /// `(path, content)` of every object of `kind` in `org`.
    async fn objects(&self, kind: &str, org: &str) -> Result<Vec<(GrafanaPath, Value)>> {
        let org_dir = self.root.join(kind).join(PathCodec::encode_segment(org));
        let mut objects = Vec::new();
        for folder_dir in entries(&org_dir, true).await? {
            for file in entries(&folder_dir, false).await? {
                let path = GrafanaPath::in_org(org, decoded_name(&folder_dir), decoded_name(&file));
                objects.push((path, read_json_file(&file).await?));
            }
        }
        Ok(objects)
    }

    pub async fn run(&self) -> Result<BulkSummary> {
        let mut summary = BulkSummary::default();
        let base = Finder::with_cache(self.client.clone(), LookupCache::scoped());

        for org in self.organizations().await? {
            let finder = base.scoped_to(Some(&org)).await?;
            let directory = self
                .dashboard_references
                .then(|| DashboardDirectory::new(finder.clone()));
            summary.organizations += 1;

            for (path, template) in self.objects(DASHBOARDS_DIR, &org).await? {
                let (identity, folder) = finder.create_or_get_dashboard(path.clone()).await?;
                let object = self.templator.make_object_from_template(&identity, &template)?;
                info!(path = %path, "Importing dashboard");
                exchange::import_dashboard(finder.client(), object, Some(&folder)).await?;
                summary.dashboards += 1;
            }

            for (path, template) in self.objects(ALERTS_DIR, &org).await? {
                let (identity, folder) = finder.create_or_get_alert(path.clone()).await?;
                let object = self.templator.make_object_from_template(&identity, &template)?;
                let object = match &directory {
                    Some(directory) => {
                        link_dashboard(directory, Direction::TemplateToObject, &identity, object).await?
                    }
                    None => object,
                };
                info!(path = %path, "Importing alert rule");
                exchange::import_alert(finder.client(), object, &folder).await?;
                summary.alerts += 1;
            }
        }

        Ok(summary)
    }
}
