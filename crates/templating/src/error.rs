//! Error types for the templating layer.
//!
//! Responsibilities:
//! - One taxonomy for every fallible operation in this crate.
//! - Carry remote failures unchanged (`Remote`) so callers can inspect
//!   status codes through [`ClientError`].
//!
//! Does NOT handle:
//! - Converting errors into data. Only [`crate::flow::Flow`] does that, via
//!   [`FlowFailure`].

use std::path::PathBuf;

use grafana_client::ClientError;
use thiserror::Error;

use crate::flow::Flowable;

/// Result type alias for templating operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by path parsing, lookups, templating and stores.
#[derive(Error, Debug)]
pub enum Error {
    /// A path had zero or more than three segments.
    #[error("Malformed path: expected 1 to 3 segments, got {segments:?}")]
    MalformedPath { segments: Vec<String> },

    /// A lookup that must match exactly one object matched none or several.
    #[error("Expected exactly one {kind} matching {query}, found {found}")]
    AmbiguousOrMissing {
        kind: &'static str,
        query: String,
        found: usize,
    },

    /// An environment mapping is missing keys present in the platform mapping.
    #[error("Template environment is missing mapping keys: {}", .keys.join(", "))]
    MissingMappingKey { keys: Vec<String> },

    /// Grafana (or the transport to it) failed.
    #[error(transparent)]
    Remote(#[from] ClientError),

    /// The store cannot perform this operation.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment mapping could not be loaded or is malformed.
    #[error("Invalid environment mapping: {0}")]
    Mapping(String),

    /// The disposable migration instance failed.
    #[error("Migration failed: {0}")]
    Migration(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the underlying remote call answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote(e) if e.is_not_found())
    }
}

/// One failed item of a [`crate::flow::Flow`] run.
#[derive(Error, Debug)]
#[error("Failed to template {item}: {source}")]
pub struct FlowFailure {
    pub item: Flowable,
    #[source]
    pub source: Error,
}
