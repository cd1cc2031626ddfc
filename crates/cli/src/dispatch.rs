//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the matching command handler.
//! - Stop commands on Ctrl+C.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Configuration loading (see `config_context`).
//!
//! Invariants:
//! - `migrate` handles Ctrl+C itself so its container is always torn down.
//! - Every other command is dropped at the first Ctrl+C and reports `Interrupted`.

use std::future::Future;

use anyhow::Result;
use grafana_client::GrafanaClient;

use crate::args::{Cli, Commands};
use crate::commands::{self, objects::ObjectKind};
use crate::config_context::load_config;
use crate::error::Interrupted;

async fn interruptible(work: impl Future<Output = Result<()>>) -> Result<()> {
    tokio::select! {
        result = work => result,
        _ = tokio::signal::ctrl_c() => Err(Interrupted.into()),
    }
}

/// Dispatch CLI commands to their respective handlers.
pub(crate) async fn run_command(cli: Cli) -> Result<()> {
    let Cli {
        connection,
        metrics_bind,
        command,
    } = cli;

    let client = || -> Result<GrafanaClient> {
        let config = load_config(&connection)?;
        commands::build_client(&config, metrics_bind.is_some())
    };

    match command {
        Commands::Dashboard { command } => {
            let client = client()?;
            interruptible(commands::objects::run(&client, ObjectKind::Dashboard, command)).await
        }
        Commands::Alert { command } => {
            let client = client()?;
            interruptible(commands::objects::run(&client, ObjectKind::Alert, command)).await
        }
        Commands::Bulk { command } => {
            let client = client()?;
            interruptible(commands::bulk::run(&client, command)).await
        }
        Commands::Migrate(args) => commands::migrate::run(args).await,
    }
}
