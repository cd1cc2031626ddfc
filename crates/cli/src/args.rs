//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Read connection settings from flags or `GRAFANA_*` environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not merge configuration sources (see `config_context` module).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use grafana_config::constants::DEFAULT_READINESS_TIMEOUT_SECS;

#[derive(Parser)]
#[command(name = "grafana-templating")]
#[command(about = "Template Grafana dashboards and alert rules across instances", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  grafana-templating dashboard export --src 'Ops/CPU Usage' --dst cpu.json\n  grafana-templating dashboard import --src cpu.json --dst 'Staging/Ops/CPU Usage' \\\n      --mapping file://envs.yaml --grafana-env staging --template-env '$auto'\n  grafana-templating bulk export --root ./backup\n  grafana-templating migrate --image grafana/grafana:10.4.0 --db grafana.db --root ./migrated\n"
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Serve Prometheus metrics on this address (e.g., 127.0.0.1:9090)
    #[arg(long, global = true, value_name = "ADDR")]
    pub metrics_bind: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection settings, each overriding the profile and environment.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Base URL of the Grafana server (e.g., http://localhost:3000)
    #[arg(long, global = true, env = "GRAFANA_URL")]
    pub url: Option<String>,

    /// Username for basic authentication
    #[arg(short, long, global = true, env = "GRAFANA_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(short, long, global = true, env = "GRAFANA_PASSWORD")]
    pub password: Option<String>,

    /// API token or service account token (preferred over username/password)
    #[arg(short = 't', long, global = true, env = "GRAFANA_API_TOKEN")]
    pub api_token: Option<String>,

    /// Organization id to act in
    #[arg(long, global = true, env = "GRAFANA_ORG_ID")]
    pub org_id: Option<i64>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "GRAFANA_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Maximum number of retries for rate-limited requests
    #[arg(long, global = true, env = "GRAFANA_MAX_RETRIES")]
    pub max_retries: Option<usize>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true, env = "GRAFANA_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// Profile name to load from the config file
    #[arg(long, global = true, env = "GRAFANA_PROFILE")]
    pub profile: Option<String>,

    /// Path to a custom configuration file (overrides default location)
    #[arg(long, global = true, env = "GRAFANA_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export or import a single dashboard
    Dashboard {
        #[command(subcommand)]
        command: ObjectCommand,
    },

    /// Export or import a single alert rule
    Alert {
        #[command(subcommand)]
        command: ObjectCommand,
    },

    /// Export or import every dashboard and alert rule of every organization
    Bulk {
        #[command(subcommand)]
        command: BulkCommand,
    },

    /// Migrate an old Grafana database in a disposable container and export it
    Migrate(MigrateArgs),
}

#[derive(Subcommand)]
pub enum ObjectCommand {
    /// Template an object from Grafana into a file
    Export {
        /// Grafana path of the object: [org/]folder/name
        #[arg(long)]
        src: String,

        /// File to write the template to
        #[arg(long)]
        dst: PathBuf,

        #[command(flatten)]
        templating: TemplatingArgs,
    },

    /// Inflate a template file into Grafana
    Import {
        /// Template file, or an http(s) URL to fetch it from
        #[arg(long)]
        src: String,

        /// Grafana path of the object: [org/]folder/name
        #[arg(long)]
        dst: String,

        #[command(flatten)]
        templating: TemplatingArgs,
    },
}

#[derive(Subcommand)]
pub enum BulkCommand {
    /// Write every object to `{root}/{dashboards|alerts}/{org}/{folder}/{name}.json`
    Export {
        /// Root directory of the tree
        #[arg(long)]
        root: PathBuf,

        #[command(flatten)]
        templating: TemplatingArgs,
    },

    /// Import a tree written by `bulk export`
    Import {
        /// Root directory of the tree
        #[arg(long)]
        root: PathBuf,

        #[command(flatten)]
        templating: TemplatingArgs,
    },
}

/// Options shaping the templator.
#[derive(Args, Debug, Clone, Default)]
pub struct TemplatingArgs {
    /// Environment mapping: inline JSON, or a file:// URI to a JSON or YAML file
    #[arg(long, requires_all = ["grafana_env", "template_env"])]
    pub mapping: Option<String>,

    /// Environment of the Grafana side of the mapping
    #[arg(long, requires = "mapping")]
    pub grafana_env: Option<String>,

    /// Environment of the template side of the mapping ('$auto' for ${key} placeholders)
    #[arg(long, requires = "mapping")]
    pub template_env: Option<String>,

    /// Drop `updated`, `version` and `provenance` from templates
    #[arg(long)]
    pub strip_edit_metadata: bool,

    /// Rewrite alert rule dashboard links to `$$org/folder/name` references
    #[arg(long)]
    pub dashboard_references: bool,
}

#[derive(Args, Debug, Clone)]
pub struct MigrateArgs {
    /// Grafana image able to migrate the database
    #[arg(long)]
    pub image: String,

    /// Grafana database file to migrate (left untouched)
    #[arg(long)]
    pub db: PathBuf,

    /// Root directory to export the migrated objects to
    #[arg(long)]
    pub root: PathBuf,

    /// Seconds to wait for the instance to become ready
    #[arg(long, default_value_t = DEFAULT_READINESS_TIMEOUT_SECS)]
    pub ready_timeout: u64,

    /// Extra container environment variable (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub env: Vec<(String, String)>,

    /// Admin password of the migrated database
    #[arg(long, default_value = "admin")]
    pub admin_password: String,

    #[command(flatten)]
    pub templating: TemplatingArgs,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("GF_FEATURE_TOGGLES_ENABLE=ngalert").unwrap(),
            ("GF_FEATURE_TOGGLES_ENABLE".to_string(), "ngalert".to_string())
        );
        assert_eq!(parse_key_value("K=a=b").unwrap().1, "a=b");
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_migrate_defaults() {
        let cli = Cli::try_parse_from([
            "grafana-templating",
            "migrate",
            "--image",
            "grafana/grafana:10.4.0",
            "--db",
            "grafana.db",
            "--root",
            "out",
        ])
        .unwrap();
        let Commands::Migrate(args) = cli.command else {
            panic!("expected migrate");
        };
        assert_eq!(args.ready_timeout, DEFAULT_READINESS_TIMEOUT_SECS);
        assert!(args.env.is_empty());
        assert_eq!(args.admin_password, "admin");
    }

    #[test]
    fn test_mapping_requires_both_envs() {
        let result = Cli::try_parse_from([
            "grafana-templating",
            "bulk",
            "export",
            "--root",
            "out",
            "--mapping",
            "{}",
            "--grafana-env",
            "prod",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_envs_require_mapping() {
        for envs in [
            &["--grafana-env", "prod"][..],
            &["--template-env", "$auto"][..],
            &["--grafana-env", "prod", "--template-env", "$auto"][..],
        ] {
            let mut argv = vec!["grafana-templating", "bulk", "export", "--root", "out"];
            argv.extend_from_slice(envs);
            assert!(Cli::try_parse_from(argv).is_err(), "{envs:?} without --mapping");
        }
    }

    #[test]
    fn test_complete_mapping_flags_parse() {
        let result = Cli::try_parse_from([
            "grafana-templating",
            "bulk",
            "export",
            "--root",
            "out",
            "--mapping",
            "{}",
            "--grafana-env",
            "prod",
            "--template-env",
            "$auto",
        ]);
        assert!(result.is_ok());
    }
}
