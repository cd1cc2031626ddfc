//! Single dashboard and alert rule commands.
//!
//! Responsibilities:
//! - `export`: template one object from Grafana into a JSON file.
//! - `import`: inflate a JSON file (or a URL) into Grafana at a path.
//!
//! Does NOT handle:
//! - Whole-instance trees (see `bulk`).

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use grafana_client::GrafanaClient;
use grafana_templating::store::Store;
use grafana_templating::{
    Alert, Dashboard, DashboardDirectory, Finder, Flow, Flowable, GrafanaStore, JsonFileStore,
    PathCodec, Templator, UrlStore,
};
use tracing::info;

use crate::args::{ObjectCommand, TemplatingArgs};
use crate::commands::templator;

/// Which kind of object a command moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Dashboard,
    Alert,
}

impl ObjectKind {
    fn label(self) -> &'static str {
        match self {
            ObjectKind::Dashboard => "dashboard",
            ObjectKind::Alert => "alert rule",
        }
    }
}

fn is_url(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

/// Template store for an import source: a URL or a local file.
fn template_store(src: &str) -> Arc<dyn Store> {
    if is_url(src) {
        Arc::new(UrlStore::new())
    } else {
        Arc::new(JsonFileStore)
    }
}

/// Queue item for `grafana_path` <-> `file`.
///
/// Alert rules get a dashboard directory scoped to the organization of
/// their path when references are enabled.
async fn flowable(
    kind: ObjectKind,
    client: &GrafanaClient,
    grafana_path: &str,
    file: String,
    templator: Templator,
    dashboard_references: bool,
) -> Result<Flowable> {
    match kind {
        ObjectKind::Dashboard => Ok(Dashboard::new(grafana_path, file, templator).into()),
        ObjectKind::Alert => {
            let mut alert = Alert::new(grafana_path, file, templator);
            if dashboard_references {
                let path = PathCodec::try_parse(grafana_path)
                    .with_context(|| format!("Invalid Grafana path '{grafana_path}'"))?;
                let finder = Finder::new(client.clone())
                    .scoped_to(path.org.as_deref())
                    .await
                    .context("Failed to resolve organization")?;
                alert = alert.with_dashboard_directory(DashboardDirectory::new(finder));
            }
            Ok(alert.into())
        }
    }
}

pub async fn run(client: &GrafanaClient, kind: ObjectKind, command: ObjectCommand) -> Result<()> {
    match command {
        ObjectCommand::Export {
            src,
            dst,
            templating,
        } => export(client, kind, &src, &dst, &templating).await,
        ObjectCommand::Import {
            src,
            dst,
            templating,
        } => import(client, kind, &src, &dst, &templating).await,
    }
}

async fn export(
    client: &GrafanaClient,
    kind: ObjectKind,
    src: &str,
    dst: &Path,
    args: &TemplatingArgs,
) -> Result<()> {
    let file = dst.to_string_lossy().into_owned();
    let item = flowable(kind, client, src, file, templator(args)?, args.dashboard_references).await?;

    let mut flow = Flow::new(Arc::new(GrafanaStore::new(client.clone())), Arc::new(JsonFileStore));
    flow.push(item);
    flow.obj_to_tmpl()
        .await
        .raise_first()
        .with_context(|| format!("Failed to export {} '{src}'", kind.label()))?;

    info!(kind = kind.label(), src, dst = %dst.display(), "Exported template");
    Ok(())
}

async fn import(
    client: &GrafanaClient,
    kind: ObjectKind,
    src: &str,
    dst: &str,
    args: &TemplatingArgs,
) -> Result<()> {
    let item = flowable(
        kind,
        client,
        dst,
        src.to_string(),
        templator(args)?,
        args.dashboard_references,
    )
    .await?;

    let mut flow = Flow::new(Arc::new(GrafanaStore::new(client.clone())), template_store(src));
    flow.push(item);
    flow.tmpl_to_obj()
        .await
        .raise_first()
        .with_context(|| format!("Failed to import {} into '{dst}'", kind.label()))?;

    info!(kind = kind.label(), src, dst, "Imported template");
    Ok(())
}
