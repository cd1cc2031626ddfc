//! Search API models (`GET /api/search`).

use serde::{Deserialize, Serialize};

/// Kind of object a search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchType {
    #[serde(rename = "dash-db")]
    Dashboard,
    #[serde(rename = "dash-folder")]
    Folder,
}

impl SearchType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SearchType::Dashboard => "dash-db",
            SearchType::Folder => "dash-folder",
        }
    }
}

/// Query parameters for a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    /// Free-text title query (Grafana matches substrings, case-insensitively).
    pub query: Option<String>,
    pub kind: Option<SearchType>,
    pub folder_ids: Vec<i64>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn kind(mut self, kind: SearchType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn folder_id(mut self, folder_id: i64) -> Self {
        self.folder_ids.push(folder_id);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Render as `reqwest` query pairs.
    pub(crate) fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(query) = &self.query {
            params.push(("query".to_string(), query.clone()));
        }
        if let Some(kind) = self.kind {
            params.push(("type".to_string(), kind.as_str().to_string()));
        }
        for id in &self.folder_ids {
            params.push(("folderIds".to_string(), id.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        params
    }
}

/// One search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: i64,
    pub uid: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SearchType,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub folder_id: Option<i64>,
    #[serde(default)]
    pub folder_uid: Option<String>,
    #[serde(default)]
    pub folder_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_params() {
        let params = SearchQuery::new()
            .query("CPU")
            .kind(SearchType::Dashboard)
            .folder_id(7)
            .to_params();

        assert_eq!(
            params,
            vec![
                ("query".to_string(), "CPU".to_string()),
                ("type".to_string(), "dash-db".to_string()),
                ("folderIds".to_string(), "7".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_hit_parses_folder_fields() {
        let hit: SearchHit = serde_json::from_value(serde_json::json!({
            "id": 12,
            "uid": "cpu",
            "title": "CPU",
            "type": "dash-db",
            "folderId": 3,
            "folderUid": "ops",
            "folderTitle": "Ops",
            "tags": []
        }))
        .unwrap();

        assert_eq!(hit.kind, SearchType::Dashboard);
        assert_eq!(hit.folder_id, Some(3));
    }

    #[test]
    fn test_search_queries_key_by_value() {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        assert!(seen.insert(SearchQuery::new().query("Ops").kind(SearchType::Folder)));
        assert!(!seen.insert(SearchQuery::new().query("Ops").kind(SearchType::Folder)));
        assert!(seen.insert(SearchQuery::new().query("Ops").kind(SearchType::Dashboard)));
        assert_eq!(seen.len(), 2);
    }
}
