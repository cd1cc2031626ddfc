//! Resolve [`GrafanaPath`]s to concrete Grafana objects.
//!
//! Lookups are searches filtered to an exact title match that must yield
//! exactly one result:
//!
//! ```text
//! SEARCH ─ one ──────────────► DONE
//!        ─ none ─► CREATE ───► DONE      (create_or_get_* only)
//!        ─ several ──────────► AmbiguousOrMissing
//! ```
//!
//! Responsibilities:
//! - Folder, dashboard, alert rule and organization lookups.
//! - Create-or-get with minimal placeholders.
//! - Scoping to the organization named in a path.
//!
//! Does NOT handle:
//! - Atomicity. Two concurrent create-or-get calls for the same path may
//!   both create; Grafana allows duplicate folder titles.
//! - Retries (the client retries rate-limited requests; nothing else is retried).
//!
//! Invariants:
//! - The `General` folder is never searched for; it is fetched by its
//!   reserved id.
//! - Every create clears the lookup cache.

use grafana_client::{Folder, GrafanaClient, Organization, SaveDashboardRequest, SearchHit, SearchQuery, SearchType};
use grafana_config::constants::{EXPRESSION_DATASOURCE_UID, GENERAL_FOLDER, GENERAL_FOLDER_ID};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::cache::{LookupCache, LookupKey};
use crate::error::{Error, Result};
use crate::paths::{GrafanaPath, PathCodec, PathLike};

/// Page size used when listing every dashboard.
const LIST_PAGE_SIZE: u32 = 1000;

/// Rule group given to placeholder alert rules.
pub const PLACEHOLDER_RULE_GROUP: &str = "default";

/// Path-based lookups against one Grafana organization.
#[derive(Debug, Clone)]
pub struct Finder {
    client: GrafanaClient,
    cache: LookupCache,
    org_name: Option<String>,
}

fn exactly_one<T>(mut items: Vec<T>, kind: &'static str, query: impl FnOnce() -> String) -> Result<T> {
    if items.len() == 1 {
        Ok(items.remove(0))
    } else {
        Err(Error::AmbiguousOrMissing {
            kind,
            query: query(),
            found: items.len(),
        })
    }
}

fn is_missing(err: &Error) -> bool {
    matches!(err, Error::AmbiguousOrMissing { found: 0, .. }) || err.is_not_found()
}

fn dashboard_identity(id: i64, uid: &str, title: &str) -> Value {
    json!({"id": id, "uid": uid, "title": title})
}

/// Alert rule that never fires, used to reserve a path.
pub fn placeholder_alert_rule(title: &str, folder_uid: &str) -> Value {
    json!({
        "title": title,
        "folderUID": folder_uid,
        "ruleGroup": PLACEHOLDER_RULE_GROUP,
        "condition": "A",
        "data": [{
            "refId": "A",
            "datasourceUid": EXPRESSION_DATASOURCE_UID,
            "relativeTimeRange": {"from": 0, "to": 0},
            "model": {"refId": "A", "type": "math", "expression": "0 == 1"}
        }],
        "noDataState": "OK",
        "execErrState": "OK",
        "for": "0s"
    })
}

impl Finder {
    pub fn new(client: GrafanaClient) -> Self {
        Self::with_cache(client, LookupCache::disabled())
    }

    pub fn with_cache(client: GrafanaClient, cache: LookupCache) -> Self {
        Self {
            client,
            cache,
            org_name: None,
        }
    }

    pub fn client(&self) -> &GrafanaClient {
        &self.client
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    /// Name of the organization this finder was scoped to, if any.
    pub fn org_name(&self) -> Option<&str> {
        self.org_name.as_deref()
    }

    fn key(&self, operation: &'static str, args: impl IntoIterator<Item = String>) -> LookupKey {
        LookupKey::new(operation, self.client.org_id(), args)
    }

    /// Find an organization by exact name.
    pub async fn resolve_org(&self, name: &str) -> Result<Organization> {
        let orgs: Vec<Organization> = self
            .cache
            .get_or_try_compute(self.key("list_organizations", []), || async {
                Ok(self.client.list_organizations().await?)
            })
            .await?;
        let matching = orgs.into_iter().filter(|o| o.name == name).collect();
        exactly_one(matching, "organization", || format!("name={name}"))
    }

    /// A finder acting in the organization `org` (or this one when `None`).
    pub async fn scoped_to(&self, org: Option<&str>) -> Result<Finder> {
        let Some(name) = org else {
            return Ok(self.clone());
        };
        if self.org_name.as_deref() == Some(name) {
            return Ok(self.clone());
        }
        let resolved = self.resolve_org(name).await?;
        debug!(org = name, org_id = resolved.id, "Scoped finder to organization");
        Ok(Finder {
            client: self.client.with_org(resolved.id),
            cache: self.cache.clone(),
            org_name: Some(resolved.name),
        })
    }

    /// Find a folder by exact title. `General` is fetched by its reserved id.
    pub async fn resolve_folder(&self, name: &str) -> Result<Folder> {
        if name == GENERAL_FOLDER {
            return self
                .cache
                .get_or_try_compute(self.key("general_folder", []), || async {
                    Ok(self.client.get_folder_by_id(GENERAL_FOLDER_ID).await?)
                })
                .await;
        }

        let query = SearchQuery::new().query(name).kind(SearchType::Folder);
        let hits = self.search(query.clone()).await?;
        let matching: Vec<Folder> = hits
            .into_iter()
            .filter(|hit| hit.title == name)
            .map(|hit| Folder {
                id: hit.id,
                uid: hit.uid,
                title: hit.title,
            })
            .collect();
        exactly_one(matching, "folder", || format!("{query:?}"))
    }

    /// Find a dashboard in `folder` by exact title.
    pub async fn resolve_dashboard(&self, folder: &Folder, name: &str) -> Result<SearchHit> {
        let query = SearchQuery::new()
            .query(name)
            .kind(SearchType::Dashboard)
            .folder_id(folder.id);
        let hits = self.search(query.clone()).await?;
        let matching = hits.into_iter().filter(|hit| hit.title == name).collect();
        exactly_one(matching, "dashboard", || format!("{query:?}"))
    }

    /// Find an alert rule in `folder` by exact title.
    pub async fn resolve_alert(&self, folder: &Folder, name: &str) -> Result<Value> {
        let rules = self.list_alerts().await?;
        let matching = rules
            .into_iter()
            .filter(|rule| {
                rule.get("folderUID").and_then(Value::as_str) == Some(folder.uid.as_str())
                    && rule.get("title").and_then(Value::as_str) == Some(name)
            })
            .collect();
        exactly_one(matching, "alert rule", || {
            format!("folderUID={} title={name}", folder.uid)
        })
    }

    /// Resolve a dashboard path to its `{id, uid, title}` and folder.
    pub async fn get_dashboard(&self, path: impl Into<PathLike>) -> Result<(Value, Folder)> {
        let path = PathCodec::try_parse(path)?;
        let finder = self.scoped_to(path.org.as_deref()).await?;
        let folder = finder.resolve_folder(&path.folder).await?;
        let hit = finder.resolve_dashboard(&folder, &path.name).await?;
        Ok((dashboard_identity(hit.id, &hit.uid, &hit.title), folder))
    }

    /// Resolve an alert path to the rule and its folder.
    pub async fn get_alert(&self, path: impl Into<PathLike>) -> Result<(Value, Folder)> {
        let path = PathCodec::try_parse(path)?;
        let finder = self.scoped_to(path.org.as_deref()).await?;
        let folder = finder.resolve_folder(&path.folder).await?;
        let rule = finder.resolve_alert(&folder, &path.name).await?;
        Ok((rule, folder))
    }

    /// Resolve a folder, creating it if it does not exist.
    ///
    /// `General` always exists and is never created; failing to fetch it is
    /// returned as is.
    pub async fn create_or_get_folder(&self, name: &str) -> Result<Folder> {
        if name == GENERAL_FOLDER {
            return self.resolve_folder(name).await;
        }
        match self.resolve_folder(name).await {
            Err(e) if is_missing(&e) => {
                info!(folder = name, "Creating folder");
                let folder = self.client.create_folder(name).await?;
                self.cache.invalidate_all();
                Ok(folder)
            }
            other => other,
        }
    }

    /// Resolve a dashboard path, creating the folder and an empty dashboard
    /// as needed. Returns the dashboard's `{id, uid, title}` and its folder.
    pub async fn create_or_get_dashboard(&self, path: impl Into<PathLike>) -> Result<(Value, Folder)> {
        let path = PathCodec::try_parse(path)?;
        let finder = self.scoped_to(path.org.as_deref()).await?;
        let folder = finder.create_or_get_folder(&path.folder).await?;

        match finder.resolve_dashboard(&folder, &path.name).await {
            Ok(hit) => Ok((dashboard_identity(hit.id, &hit.uid, &hit.title), folder)),
            Err(e) if is_missing(&e) => {
                info!(path = %path, "Creating placeholder dashboard");
                let saved = finder
                    .client
                    .update_dashboard(&SaveDashboardRequest {
                        dashboard: json!({"title": path.name}),
                        overwrite: true,
                        folder_uid: (!folder.is_general()).then(|| folder.uid.clone()),
                        folder_id: None,
                        message: None,
                    })
                    .await?;
                finder.cache.invalidate_all();
                Ok((dashboard_identity(saved.id, &saved.uid, &path.name), folder))
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve an alert path, creating the folder and a never-firing rule as
    /// needed. Returns the rule and its folder.
    pub async fn create_or_get_alert(&self, path: impl Into<PathLike>) -> Result<(Value, Folder)> {
        let path = PathCodec::try_parse(path)?;
        let finder = self.scoped_to(path.org.as_deref()).await?;
        let folder = finder.create_or_get_folder(&path.folder).await?;

        match finder.resolve_alert(&folder, &path.name).await {
            Ok(rule) => Ok((rule, folder)),
            Err(e) if is_missing(&e) => {
                info!(path = %path, "Creating placeholder alert rule");
                let rule = finder
                    .client
                    .create_alert_rule(&placeholder_alert_rule(&path.name, &folder.uid), true)
                    .await?;
                finder.cache.invalidate_all();
                Ok((rule, folder))
            }
            Err(e) => Err(e),
        }
    }

    /// The path of the dashboard with `uid`.
    pub async fn dashboard_path(&self, uid: &str) -> Result<GrafanaPath> {
        let found = self.client.get_dashboard(uid).await?;
        let name = found
            .dashboard
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let folder = found
            .meta
            .folder_title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| GENERAL_FOLDER.to_string());
        Ok(GrafanaPath {
            org: self.org_name.clone(),
            folder,
            name,
        })
    }

    /// Every dashboard in this organization.
    pub async fn list_dashboards(&self) -> Result<Vec<SearchHit>> {
        let mut all = Vec::new();
        for page in 1.. {
            let hits = self
                .client
                .search(
                    &SearchQuery::new()
                        .kind(SearchType::Dashboard)
                        .limit(LIST_PAGE_SIZE)
                        .page(page),
                )
                .await?;
            let last = hits.len() < LIST_PAGE_SIZE as usize;
            all.extend(hits);
            if last {
                break;
            }
        }
        Ok(all)
    }

    /// Every alert rule in this organization.
    pub async fn list_alerts(&self) -> Result<Vec<Value>> {
        self.cache
            .get_or_try_compute(self.key("list_alert_rules", []), || async {
                Ok(self.client.list_alert_rules().await?)
            })
            .await
    }

    async fn search(&self, query: SearchQuery) -> Result<Vec<SearchHit>> {
        let key = self.key(
            "search",
            [
                query.query.clone().unwrap_or_default(),
                query.kind.map(|k| k.as_str().to_string()).unwrap_or_default(),
                format!("{:?}", query.folder_ids),
            ],
        );
        self.cache
            .get_or_try_compute(key, || async { Ok(self.client.search(&query).await?) })
            .await
    }
}
