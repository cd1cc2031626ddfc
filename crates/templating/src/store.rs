//! Places dashboards and alert rules are read from and written to.
//!
//! - [`FileStore`]: one JSON file per object under a root directory.
//! - [`JsonFileStore`]: names are file paths, for one-off exports.
//! - [`GrafanaStore`]: a live Grafana instance (create-or-get, then
//!   import/export).
//! - [`UrlStore`]: read-only HTTP GET of a URL, for published dashboards.
//!
//! Stores know nothing about templating; [`crate::flow::Flow`] moves content
//! between two of them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use grafana_client::{ClientError, GrafanaClient};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::cache::LookupCache;
use crate::error::{Error, Result};
use crate::exchange;
use crate::finder::Finder;
use crate::paths::{GrafanaPath, PathCodec, PathLike};

/// Directory of dashboards under a store root.
pub const DASHBOARDS_DIR: &str = "dashboards";

/// Directory of alert rules under a store root.
pub const ALERTS_DIR: &str = "alerts";

/// Extension of stored objects.
pub const OBJECT_EXTENSION: &str = "json";

/// Source or destination of Grafana objects.
#[async_trait]
pub trait Store: Send + Sync {
    async fn read_alert(&self, name: &PathLike) -> Result<Value>;

    async fn read_dashboard(&self, name: &PathLike) -> Result<Value>;

    async fn write_alert(&self, name: &PathLike, alert: &Value) -> Result<()>;

    async fn write_dashboard(&self, name: &PathLike, dashboard: &Value) -> Result<()>;
}

/// Serialize as tab-indented JSON, keeping key order and non-ASCII text.
pub fn to_json_pretty(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut serializer)?;
    Ok(out)
}

pub(crate) async fn read_json_file(path: &Path) -> Result<Value> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_slice(&content)?)
}

pub(crate) async fn write_json_file(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }
    tokio::fs::write(path, to_json_pretty(value)?)
        .await
        .map_err(|e| Error::io(path, e))
}

/// Location of an object below `root/kind`.
pub fn object_file(root: &Path, kind: &str, path: &GrafanaPath) -> PathBuf {
    let mut file = root.join(kind).join(PathCodec::encode_grafana(path));
    let name = format!("{}.{OBJECT_EXTENSION}", PathCodec::encode_segment(&path.name));
    file.set_file_name(name);
    file
}

/// Objects as files: `{root}/{dashboards|alerts}/[org/]folder/name.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file holding the object called `name`.
    pub fn resolve(&self, name: &PathLike, kind: &str) -> Result<PathBuf> {
        let path = PathCodec::try_parse(name.clone())?;
        Ok(object_file(&self.root, kind, &path))
    }
}

#[async_trait]
impl Store for FileStore {
    async fn read_alert(&self, name: &PathLike) -> Result<Value> {
        read_json_file(&self.resolve(name, ALERTS_DIR)?).await
    }

    async fn read_dashboard(&self, name: &PathLike) -> Result<Value> {
        read_json_file(&self.resolve(name, DASHBOARDS_DIR)?).await
    }

    async fn write_alert(&self, name: &PathLike, alert: &Value) -> Result<()> {
        let file = self.resolve(name, ALERTS_DIR)?;
        debug!(file = %file.display(), "Writing alert rule");
        write_json_file(&file, alert).await
    }

    async fn write_dashboard(&self, name: &PathLike, dashboard: &Value) -> Result<()> {
        let file = self.resolve(name, DASHBOARDS_DIR)?;
        debug!(file = %file.display(), "Writing dashboard");
        write_json_file(&file, dashboard).await
    }
}

/// Objects as standalone JSON files. Names must be raw file paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileStore;

impl JsonFileStore {
    fn file(name: &PathLike) -> Result<PathBuf> {
        match name {
            PathLike::Raw(file) => Ok(PathBuf::from(file)),
            other => Err(Error::Unsupported(format!(
                "JsonFileStore names are file paths, not {other}"
            ))),
        }
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn read_alert(&self, name: &PathLike) -> Result<Value> {
        read_json_file(&Self::file(name)?).await
    }

    async fn read_dashboard(&self, name: &PathLike) -> Result<Value> {
        read_json_file(&Self::file(name)?).await
    }

    async fn write_alert(&self, name: &PathLike, alert: &Value) -> Result<()> {
        write_json_file(&Self::file(name)?, alert).await
    }

    async fn write_dashboard(&self, name: &PathLike, dashboard: &Value) -> Result<()> {
        write_json_file(&Self::file(name)?, dashboard).await
    }
}

/// Objects in a live Grafana instance.
///
/// Reading or writing a path that does not exist yet creates its folder and
/// a placeholder object first.
#[derive(Debug, Clone)]
pub struct GrafanaStore {
    finder: Finder,
}

impl GrafanaStore {
    /// A store with its own session-scoped lookup cache.
    pub fn new(client: GrafanaClient) -> Self {
        Self::with_finder(Finder::with_cache(client, LookupCache::scoped()))
    }

    pub fn with_finder(finder: Finder) -> Self {
        Self { finder }
    }

    pub fn finder(&self) -> &Finder {
        &self.finder
    }

    async fn locate(&self, name: &PathLike) -> Result<(GrafanaPath, Finder)> {
        let path = PathCodec::try_parse(name.clone())?;
        let finder = self.finder.scoped_to(path.org.as_deref()).await?;
        Ok((path, finder))
    }
}

fn uid_of(identity: &Value) -> Result<&str> {
    identity
        .get("uid")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Remote(ClientError::InvalidResponse("object has no uid".to_string())))
}

#[async_trait]
impl Store for GrafanaStore {
    async fn read_alert(&self, name: &PathLike) -> Result<Value> {
        let (path, finder) = self.locate(name).await?;
        let (rule, _) = finder.create_or_get_alert(path).await?;
        Ok(rule)
    }

    async fn read_dashboard(&self, name: &PathLike) -> Result<Value> {
        let (path, finder) = self.locate(name).await?;
        let (identity, _) = finder.create_or_get_dashboard(path).await?;
        let (content, _) = exchange::export_dashboard(finder.client(), uid_of(&identity)?).await?;
        Ok(content)
    }

    async fn write_alert(&self, name: &PathLike, alert: &Value) -> Result<()> {
        let (path, finder) = self.locate(name).await?;
        let (_, folder) = finder.create_or_get_alert(path).await?;
        exchange::import_alert(finder.client(), alert.clone(), &folder).await?;
        Ok(())
    }

    async fn write_dashboard(&self, name: &PathLike, dashboard: &Value) -> Result<()> {
        let (path, finder) = self.locate(name).await?;
        let (_, folder) = finder.create_or_get_dashboard(path).await?;
        exchange::import_dashboard(finder.client(), dashboard.clone(), Some(&folder)).await?;
        Ok(())
    }
}

/// Read-only store fetching objects from URLs, such as a dashboard
/// published on grafana.com or GitHub. Names must be raw URL strings.
#[derive(Debug, Clone, Default)]
pub struct UrlStore {
    http: reqwest::Client,
}

impl UrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn read_url(&self, name: &PathLike) -> Result<Value> {
        let PathLike::Raw(url) = name else {
            return Err(Error::Unsupported(format!(
                "UrlStore can only read URLs, not {name}"
            )));
        };
        debug!(url, "Fetching object from URL");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(ClientError::from)?;
        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Remote(ClientError::from(e)))
    }
}

#[async_trait]
impl Store for UrlStore {
    async fn read_alert(&self, name: &PathLike) -> Result<Value> {
        self.read_url(name).await
    }

    async fn read_dashboard(&self, name: &PathLike) -> Result<Value> {
        self.read_url(name).await
    }

    async fn write_alert(&self, _name: &PathLike, _alert: &Value) -> Result<()> {
        Err(Error::Unsupported("UrlStore cannot write alert rules".to_string()))
    }

    async fn write_dashboard(&self, _name: &PathLike, _dashboard: &Value) -> Result<()> {
        Err(Error::Unsupported("UrlStore cannot write dashboards".to_string()))
    }
}
