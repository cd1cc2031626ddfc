//! Batch templating between two stores.
//!
//! A [`Flow`] holds an object store (usually Grafana), a template store
//! (usually files) and a queue of [`Flowable`] items. Running it moves each
//! item in the requested [`Direction`] through the item's own
//! [`Templator`].
//!
//! Invariants:
//! - Items run in the order they were queued.
//! - A failing item is recorded with its error and never stops the batch.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use crate::error::{FlowFailure, Result};
use crate::paths::PathLike;
use crate::references::DashboardDirectory;
use crate::store::Store;
use crate::templator::Templator;

/// Which way content moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Read objects, write templates.
    ObjectToTemplate,
    /// Read templates, write objects.
    TemplateToObject,
}

/// A dashboard to template.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub name_obj: PathLike,
    pub name_tmpl: PathLike,
    pub templator: Templator,
}

impl Dashboard {
    pub fn new(name_obj: impl Into<PathLike>, name_tmpl: impl Into<PathLike>, templator: Templator) -> Self {
        Self {
            name_obj: name_obj.into(),
            name_tmpl: name_tmpl.into(),
            templator,
        }
    }
}

/// An alert rule to template.
///
/// With a [`DashboardDirectory`], the rule's dashboard link is rewritten to
/// a path reference and back. The directory must look up dashboards in the
/// instance behind the object store.
#[derive(Debug, Clone)]
pub struct Alert {
    pub name_obj: PathLike,
    pub name_tmpl: PathLike,
    pub templator: Templator,
    pub dashboards: Option<DashboardDirectory>,
}

impl Alert {
    pub fn new(name_obj: impl Into<PathLike>, name_tmpl: impl Into<PathLike>, templator: Templator) -> Self {
        Self {
            name_obj: name_obj.into(),
            name_tmpl: name_tmpl.into(),
            templator,
            dashboards: None,
        }
    }

    pub fn with_dashboard_directory(mut self, directory: DashboardDirectory) -> Self {
        self.dashboards = Some(directory);
        self
    }
}

/// One queued templating request.
#[derive(Debug, Clone)]
pub enum Flowable {
    Dashboard(Dashboard),
    Alert(Alert),
}

impl From<Dashboard> for Flowable {
    fn from(item: Dashboard) -> Self {
        Flowable::Dashboard(item)
    }
}

impl From<Alert> for Flowable {
    fn from(item: Alert) -> Self {
        Flowable::Alert(item)
    }
}

impl fmt::Display for Flowable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flowable::Dashboard(d) => write!(f, "dashboard {} <-> {}", d.name_obj, d.name_tmpl),
            Flowable::Alert(a) => write!(f, "alert rule {} <-> {}", a.name_obj, a.name_tmpl),
        }
    }
}

/// Outcome of a [`Flow`] run.
#[derive(Debug, Default)]
pub struct FlowResult {
    pub successes: Vec<Flowable>,
    pub failures: Vec<FlowFailure>,
}

impl FlowResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The first failure, if any.
    pub fn raise_first(self) -> std::result::Result<(), FlowFailure> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    /// `self` if every item succeeded, else the first failure.
    pub fn ensure_success(mut self) -> std::result::Result<FlowResult, FlowFailure> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(self.failures.remove(0))
        }
    }
}

/// A batch of templating requests between two stores.
#[derive(Clone)]
pub struct Flow {
    store_obj: Arc<dyn Store>,
    store_tmpl: Arc<dyn Store>,
    items: Vec<Flowable>,
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow").field("items", &self.items).finish_non_exhaustive()
    }
}

impl Flow {
    pub fn new(store_obj: Arc<dyn Store>, store_tmpl: Arc<dyn Store>) -> Self {
        Self {
            store_obj,
            store_tmpl,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: impl Into<Flowable>) {
        self.items.push(item.into());
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Flowable>) {
        self.items.extend(items);
    }

    pub fn items(&self) -> &[Flowable] {
        &self.items
    }

    /// Template every item from the object store into the template store.
    pub async fn obj_to_tmpl(&self) -> FlowResult {
        self.run(Direction::ObjectToTemplate).await
    }

    /// Inflate every item from the template store into the object store.
    pub async fn tmpl_to_obj(&self) -> FlowResult {
        self.run(Direction::TemplateToObject).await
    }

    pub async fn run(&self, direction: Direction) -> FlowResult {
        let mut result = FlowResult::default();
        for item in &self.items {
            match self.run_item(item, direction).await {
                Ok(()) => {
                    info!(item = %item, ?direction, "Templated");
                    result.successes.push(item.clone());
                }
                Err(source) => {
                    error!(item = %item, ?direction, error = %source, "Templating failed");
                    result.failures.push(FlowFailure {
                        item: item.clone(),
                        source,
                    });
                }
            }
        }
        result
    }

    async fn run_item(&self, item: &Flowable, direction: Direction) -> Result<()> {
        match (item, direction) {
            (Flowable::Dashboard(d), Direction::ObjectToTemplate) => {
                let object = self.store_obj.read_dashboard(&d.name_obj).await?;
                let template = d.templator.make_template_from_object(&object)?;
                self.store_tmpl.write_dashboard(&d.name_tmpl, &template).await
            }
            (Flowable::Dashboard(d), Direction::TemplateToObject) => {
                let template = self.store_tmpl.read_dashboard(&d.name_tmpl).await?;
                let identity = self.store_obj.read_dashboard(&d.name_obj).await?;
                let object = d.templator.make_object_from_template(&identity, &template)?;
                self.store_obj.write_dashboard(&d.name_obj, &object).await
            }
            (Flowable::Alert(a), Direction::ObjectToTemplate) => {
                let object = self.store_obj.read_alert(&a.name_obj).await?;
                let object = match &a.dashboards {
                    Some(directory) => link_dashboard(directory, direction, &Value::Null, object).await?,
                    None => object,
                };
                let template = a.templator.make_template_from_object(&object)?;
                self.store_tmpl.write_alert(&a.name_tmpl, &template).await
            }
            (Flowable::Alert(a), Direction::TemplateToObject) => {
                let template = self.store_tmpl.read_alert(&a.name_tmpl).await?;
                let identity = self.store_obj.read_alert(&a.name_obj).await?;
                let object = a.templator.make_object_from_template(&identity, &template)?;
                let object = match &a.dashboards {
                    Some(directory) => link_dashboard(directory, direction, &identity, object).await?,
                    None => object,
                };
                self.store_obj.write_alert(&a.name_obj, &object).await
            }
        }
    }
}

/// Rewrite the dashboard link of `content`. It runs innermost: before the
/// item templator when templating, after it when inflating, so environment
/// placeholders inside a reference are filled before it is resolved.
pub(crate) async fn link_dashboard(
    directory: &DashboardDirectory,
    direction: Direction,
    identity: &Value,
    content: Value,
) -> Result<Value> {
    directory.prepare(direction, &content).await?;
    let templator = directory.templator();
    match direction {
        Direction::ObjectToTemplate => templator.make_template_from_object(&content),
        Direction::TemplateToObject => templator.make_object_from_template(identity, &content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory store keyed by the display form of the name.
    #[derive(Default)]
    struct MemoryStore {
        objects: Mutex<Vec<(String, Value)>>,
    }

    impl MemoryStore {
        fn with(entries: &[(&str, Value)]) -> Self {
            Self {
                objects: Mutex::new(
                    entries
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.clone()))
                        .collect(),
                ),
            }
        }

        fn get(&self, name: &PathLike) -> Result<Value> {
            let key = name.to_string();
            self.objects
                .lock()
                .unwrap()
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| Error::Unsupported(format!("missing {key}")))
        }

        fn put(&self, name: &PathLike, value: &Value) {
            let mut objects = self.objects.lock().unwrap();
            let key = name.to_string();
            objects.retain(|(k, _)| *k != key);
            objects.push((key, value.clone()));
        }
    }

    #[async_trait]
    impl Store for MemoryStore {
        async fn read_alert(&self, name: &PathLike) -> Result<Value> {
            self.get(name)
        }
        async fn read_dashboard(&self, name: &PathLike) -> Result<Value> {
            self.get(name)
        }
        async fn write_alert(&self, name: &PathLike, alert: &Value) -> Result<()> {
            self.put(name, alert);
            Ok(())
        }
        async fn write_dashboard(&self, name: &PathLike, dashboard: &Value) -> Result<()> {
            self.put(name, dashboard);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_batch() {
        let objects = Arc::new(MemoryStore::with(&[
            ("a", json!({"id": 1, "uid": "a", "title": "A"})),
            ("c", json!({"id": 3, "uid": "c", "title": "C"})),
        ]));
        let templates = Arc::new(MemoryStore::default());
        let mut flow = Flow::new(objects, templates.clone());
        for name in ["a", "b", "c"] {
            flow.push(Dashboard::new(name, name, Templator::default()));
        }

        let result = flow.obj_to_tmpl().await;

        assert_eq!(result.successes.len(), 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].item.to_string(), "dashboard b <-> b");
        assert_eq!(
            templates.get(&PathLike::from("c")).unwrap(),
            json!({"title": "C"})
        );
        assert!(result.raise_first().is_err());
    }

    #[tokio::test]
    async fn test_tmpl_to_obj_uses_destination_identity() {
        let objects = Arc::new(MemoryStore::with(&[(
            "Ops/CPU",
            json!({"id": 9, "uid": "dest", "title": "CPU", "panels": []}),
        )]));
        let templates = Arc::new(MemoryStore::with(&[(
            "cpu",
            json!({"title": "CPU", "panels": [{"id": 1}]}),
        )]));
        let mut flow = Flow::new(objects.clone(), templates);
        flow.push(Alert::new("Ops/CPU", "cpu", Templator::default()));

        let result = flow.tmpl_to_obj().await.ensure_success().unwrap();
        assert_eq!(result.successes.len(), 1);
        assert_eq!(
            objects.get(&PathLike::from("Ops/CPU")).unwrap(),
            json!({"id": 9, "uid": "dest", "title": "CPU", "panels": [{"id": 1}]})
        );
    }

    #[test]
    fn test_empty_result_is_success() {
        let result = FlowResult::default();
        assert!(result.is_success());
        assert!(result.ensure_success().is_ok());
    }
}
