//! Command implementations.
//!
//! Shared helpers build the client and the templator from parsed arguments;
//! each submodule runs one command family.

pub mod bulk;
pub mod migrate;
pub mod objects;

use anyhow::{Context, Result};
use grafana_client::{GrafanaClient, MetricsCollector};
use grafana_config::Config;
use grafana_templating::transform::{nop, remove_edit_metadata};
use grafana_templating::{Templator, load_env_mapping};

use crate::args::TemplatingArgs;

/// Build a client for the configured instance.
pub(crate) fn build_client(config: &Config, with_metrics: bool) -> Result<GrafanaClient> {
    let mut builder = GrafanaClient::builder().from_config(config);
    if with_metrics {
        builder = builder.metrics(MetricsCollector::new());
    }
    builder.build().context("Failed to build Grafana client")
}

/// Assemble the templator requested on the command line.
///
/// Edit metadata is stripped before the environment mapping is applied.
pub(crate) fn templator(args: &TemplatingArgs) -> Result<Templator> {
    let mut templator = Templator::default();

    if args.strip_edit_metadata {
        templator = templator.chain(&Templator::new(remove_edit_metadata(), nop()));
    }

    match (&args.mapping, &args.grafana_env, &args.template_env) {
        (Some(source), Some(grafana_env), Some(template_env)) => {
            let mapping =
                load_env_mapping(source).context("Failed to load environment mapping")?;
            let env_templator = Templator::from_env_mapping(&mapping, grafana_env, template_env)
                .context("Failed to build templator from environment mapping")?;
            templator = templator.chain(&env_templator);
        }
        (None, None, None) => {}
        _ => anyhow::bail!("--mapping, --grafana-env and --template-env must be given together"),
    }

    Ok(templator)
}
