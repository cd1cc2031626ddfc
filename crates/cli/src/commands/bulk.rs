//! Whole-instance export and import through a file tree.

use std::path::Path;

use anyhow::{Context, Result};
use grafana_client::GrafanaClient;
use grafana_templating::{BulkExporter, BulkImporter, BulkSummary};
use tracing::info;

use crate::args::{BulkCommand, TemplatingArgs};
use crate::commands::templator;

pub async fn run(client: &GrafanaClient, command: BulkCommand) -> Result<()> {
    let summary = match command {
        BulkCommand::Export { root, templating } => export(client, &root, &templating).await?,
        BulkCommand::Import { root, templating } => {
            let summary = BulkImporter::new(client.clone(), &root, templator(&templating)?)
                .with_dashboard_references(templating.dashboard_references)
                .run()
                .await
                .with_context(|| format!("Failed to import tree at {}", root.display()))?;
            info!(root = %root.display(), "Bulk import finished");
            summary
        }
    };
    print_summary(&summary);
    Ok(())
}

/// Export every object of the instance behind `client` to `root`.
pub(crate) async fn export(
    client: &GrafanaClient,
    root: &Path,
    args: &TemplatingArgs,
) -> Result<BulkSummary> {
    let summary = BulkExporter::new(client.clone(), root, templator(args)?)
        .with_dashboard_references(args.dashboard_references)
        .run()
        .await
        .with_context(|| format!("Failed to export tree to {}", root.display()))?;
    info!(root = %root.display(), "Bulk export finished");
    Ok(summary)
}

fn format_summary(summary: &BulkSummary) -> String {
    format!(
        "{} organization(s), {} dashboard(s), {} alert rule(s)",
        summary.organizations, summary.dashboards, summary.alerts
    )
}

pub(crate) fn print_summary(summary: &BulkSummary) {
    println!("{}", format_summary(summary));
}
