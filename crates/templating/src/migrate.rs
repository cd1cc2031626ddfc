//! Run a throwaway Grafana to migrate an old database.
//!
//! Opening a Grafana database with a newer Grafana migrates its schema (for
//! example from legacy to unified alerting). [`migrate`] starts a
//! [`DisposableInstance`] on a copy of the database, waits for it to report
//! healthy, hands its endpoint to the caller (typically to run a
//! [`crate::bulk::BulkExporter`]) and always tears the instance down.
//!
//! Invariants:
//! - Teardown runs on every exit path: success, failure of the caller's
//!   work, and readiness timeout.
//! - The original database file is never opened by the instance.
//! - The readiness poll is the only wait loop in this crate.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use grafana_client::{AuthStrategy, GrafanaClient};
use grafana_config::constants::{DEFAULT_ADMIN_USER, DEFAULT_GRAFANA_PORT, DEFAULT_READINESS_POLL_MS};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// Where Grafana keeps its database inside the official image.
pub const CONTAINER_DB_PATH: &str = "/var/lib/grafana/grafana.db";

/// File name of the migrated copy, placed next to the original.
pub const MIGRATED_DB_NAME: &str = "migrated.sqlite3";

/// Host and port of a running instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// A client authenticating with basic auth.
    pub fn client(&self, username: &str, password: &str) -> Result<GrafanaClient> {
        Ok(GrafanaClient::builder()
            .base_url(self.base_url())
            .auth_strategy(AuthStrategy::Basic {
                username: username.to_string(),
                password: password.to_string().into(),
            })
            .build()?)
    }
}

/// A Grafana instance that exists only for the duration of a migration.
#[async_trait]
pub trait DisposableInstance: Send {
    async fn start(&mut self) -> Result<Endpoint>;

    /// Stop and remove the instance. Must be safe to call when `start`
    /// failed or was never called.
    async fn teardown(&mut self) -> Result<()>;
}

async fn docker(args: &[&str]) -> Result<String> {
    debug!(?args, "Running docker");
    let output = Command::new("docker")
        .args(args)
        .output()
        .await
        .map_err(|e| Error::Migration(format!("could not run docker: {e}")))?;
    if !output.status.success() {
        return Err(Error::Migration(format!(
            "docker {} failed: {}",
            args.first().copied().unwrap_or_default(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Parse `docker port` output such as `0.0.0.0:49153` or `[::]:49153`.
fn parse_host_port(output: &str) -> Option<u16> {
    output
        .lines()
        .next()?
        .rsplit_once(':')
        .and_then(|(_, port)| port.trim().parse().ok())
}

/// Grafana in a local Docker container.
#[derive(Debug, Clone)]
pub struct DockerInstance {
    image: String,
    database: PathBuf,
    env: Vec<(String, String)>,
    container_id: Option<String>,
}

impl DockerInstance {
    pub fn new(image: impl Into<String>, database: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            database: database.into(),
            env: Vec::new(),
            container_id: None,
        }
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn container_id(&self) -> Option<&str> {
        self.container_id.as_deref()
    }

    /// Path of the copy the container runs on.
    pub fn migrated_database(&self) -> PathBuf {
        self.database.with_file_name(MIGRATED_DB_NAME)
    }

    async fn copy_database(&self) -> Result<PathBuf> {
        let target = self.migrated_database();
        // Copying a file onto itself truncates it.
        if target == self.database {
            return Err(Error::Migration(format!(
                "database {} would be overwritten by its own migrated copy; rename it first",
                self.database.display()
            )));
        }
        tokio::fs::copy(&self.database, &target)
            .await
            .map_err(|e| Error::io(&self.database, e))?;
        std::path::absolute(&target).map_err(|e| Error::io(&target, e))
    }

    async fn logs(&self, id: &str) -> String {
        docker(&["logs", "--tail", "50", id])
            .await
            .unwrap_or_else(|e| e.to_string())
    }
}

#[async_trait]
impl DisposableInstance for DockerInstance {
    async fn start(&mut self) -> Result<Endpoint> {
        let database = self.copy_database().await?;
        let volume = format!("{}:{CONTAINER_DB_PATH}", database.display());
        let port = format!("127.0.0.1::{DEFAULT_GRAFANA_PORT}");
        let env: Vec<String> = self.env.iter().map(|(k, v)| format!("{k}={v}")).collect();

        let mut args: Vec<&str> = vec![
            "run",
            "--detach",
            "--publish",
            port.as_str(),
            "--volume",
            volume.as_str(),
        ];
        for pair in &env {
            args.extend(["--env", pair.as_str()]);
        }
        args.push(self.image.as_str());

        let id = docker(&args).await?;
        self.container_id = Some(id.clone());
        info!(image = %self.image, container = %id, "Started disposable Grafana");

        let status = docker(&["inspect", "--format", "{{.State.Status}}", &id]).await?;
        if status != "running" {
            let logs = self.logs(&id).await;
            return Err(Error::Migration(format!(
                "container {id} is {status}, not running: {logs}"
            )));
        }

        let published = docker(&["port", &id, &format!("{DEFAULT_GRAFANA_PORT}/tcp")]).await?;
        let port = parse_host_port(&published).ok_or_else(|| {
            Error::Migration(format!("could not read published port from '{published}'"))
        })?;
        Ok(Endpoint {
            host: "127.0.0.1".to_string(),
            port,
        })
    }

    async fn teardown(&mut self) -> Result<()> {
        if let Some(id) = self.container_id.take() {
            docker(&["rm", "--force", &id]).await?;
            info!(container = %id, "Removed disposable Grafana");
        }
        Ok(())
    }
}

/// Poll `/api/health` until the database reports ok or `timeout` elapses.
pub async fn wait_until_ready(endpoint: &Endpoint, timeout: Duration) -> Result<()> {
    // The health endpoint ignores credentials.
    let client = endpoint.client(DEFAULT_ADMIN_USER, "")?;
    let poll = Duration::from_millis(DEFAULT_READINESS_POLL_MS);

    let ready = async {
        loop {
            match client.health().await {
                Ok(health) if health.is_ok() => return,
                Ok(health) => debug!(database = ?health.database, "Grafana not ready"),
                Err(e) => debug!(error = %e, "Grafana not reachable yet"),
            }
            tokio::time::sleep(poll).await;
        }
    };

    tokio::time::timeout(timeout, ready).await.map_err(|_| {
        Error::Migration(format!(
            "{} not ready within {}s",
            endpoint.base_url(),
            timeout.as_secs()
        ))
    })?;
    info!(url = %endpoint.base_url(), "Grafana is ready");
    Ok(())
}

/// Start `instance`, wait for it, run `work` against it and tear it down.
///
/// The error of `work` (or of startup) wins over a teardown error, which is
/// then only logged.
pub async fn migrate<I, F, Fut, T>(instance: &mut I, timeout: Duration, work: F) -> Result<T>
where
    I: DisposableInstance + ?Sized,
    F: FnOnce(Endpoint) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let outcome = async {
        let endpoint = instance.start().await?;
        wait_until_ready(&endpoint, timeout).await?;
        work(endpoint).await
    }
    .await;

    let teardown = instance.teardown().await;
    match (outcome, teardown) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(teardown_error)) => {
            warn!(error = %teardown_error, "Teardown failed after migration error");
            Err(e)
        }
    }
}

/// Default credentials of a fresh or migrated instance.
pub fn default_admin_client(endpoint: &Endpoint, password: &str) -> Result<GrafanaClient> {
    endpoint.client(DEFAULT_ADMIN_USER, password)
}
