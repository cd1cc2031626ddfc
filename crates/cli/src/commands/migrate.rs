//! Migrate an old database in a disposable container, then export it.
//!
//! Invariants:
//! - The container is torn down on success, failure and Ctrl+C alike.
//! - The original database file is never modified.

use std::time::Duration;

use anyhow::{Context, Result};
use grafana_templating::migrate::default_admin_client;
use grafana_templating::{DockerInstance, migrate};
use tracing::{info, warn};

use crate::args::MigrateArgs;
use crate::commands::bulk;
use crate::error::Interrupted;

pub async fn run(args: MigrateArgs) -> Result<()> {
    let mut instance = args
        .env
        .iter()
        .fold(DockerInstance::new(&args.image, &args.db), |instance, (k, v)| {
            instance.env(k, v)
        });

    info!(image = %args.image, db = %args.db.display(), "Starting migration");

    // The export outcome is carried as the value so that teardown errors
    // stay distinguishable from export errors.
    let exported = migrate(
        &mut instance,
        Duration::from_secs(args.ready_timeout),
        |endpoint| {
            let args = &args;
            async move {
                let client = default_admin_client(&endpoint, &args.admin_password)?;
                Ok(tokio::select! {
                    result = bulk::export(&client, &args.root, &args.templating) => result,
                    _ = tokio::signal::ctrl_c() => {
                        warn!("Interrupted, tearing down the instance");
                        Err(Interrupted.into())
                    }
                })
            }
        },
    )
    .await
    .context("Migration failed")?;

    let summary = exported?;
    bulk::print_summary(&summary);
    Ok(())
}
