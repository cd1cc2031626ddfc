//! Templating for Grafana dashboards and alert rules.
//!
//! Capture an object from one Grafana instance, strip its instance-specific
//! identity, replace environment-specific values with placeholders, and
//! replay the result into another instance, folder or organization.
//!
//! The pure core ([`paths`], [`identity`], [`transform`], [`templator`]) is
//! synchronous and side-effect free. Talking to Grafana ([`finder`],
//! [`exchange`], [`store`], [`flow`], [`bulk`], [`migrate`]) is async and
//! goes through [`grafana_client::GrafanaClient`].

pub mod bulk;
pub mod cache;
pub mod datasources;
pub mod error;
pub mod exchange;
pub mod finder;
pub mod flow;
pub mod identity;
pub mod mapping;
pub mod migrate;
pub mod paths;
pub mod references;
pub mod store;
pub mod templator;
pub mod transform;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use bulk::{BulkExporter, BulkImporter, BulkSummary};
pub use cache::{CacheMode, LookupCache};
pub use datasources::DatasourceTable;
pub use error::{Error, FlowFailure, Result};
pub use finder::Finder;
pub use flow::{Alert, Dashboard, Direction, Flow, FlowResult, Flowable};
pub use mapping::{EnvMapping, load_env_mapping};
pub use migrate::{DisposableInstance, DockerInstance, Endpoint, migrate};
pub use paths::{GrafanaPath, PathCodec, PathLike};
pub use references::DashboardDirectory;
pub use store::{FileStore, GrafanaStore, JsonFileStore, Store, UrlStore};
pub use templator::Templator;
pub use transform::Transformer;
