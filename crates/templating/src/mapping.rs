//! Loading environment mappings.
//!
//! An environment mapping names, for each environment, the literal value of
//! each substitution key:
//!
//! ```json
//! { "production": { "env": "production", "ds": "P1809F7CD0C75ACF3" },
//!   "staging":    { "env": "staging",    "ds": "loki-main" } }
//! ```
//!
//! Sources are either inline JSON or a `file://` URI. Files ending in
//! `.yaml`/`.yml` are parsed as YAML, anything else as JSON.

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};

/// `{environment: {key: literal}}`, in file order.
pub type EnvMapping = IndexMap<String, IndexMap<String, String>>;

const FILE_URI_PREFIX: &str = "file://";

/// Load a mapping from inline JSON or a `file://` URI.
pub fn load_env_mapping(source: &str) -> Result<EnvMapping> {
    match source.strip_prefix(FILE_URI_PREFIX) {
        Some(file) => read_env_mapping_file(Path::new(file)),
        None => serde_json::from_str(source)
            .map_err(|e| Error::Mapping(format!("inline mapping is not valid JSON: {e}"))),
    }
}

/// Read a mapping file, choosing the format from its extension.
pub fn read_env_mapping_file(path: &Path) -> Result<EnvMapping> {
    debug!(path = %path.display(), "Reading environment mapping");
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Mapping(format!("{}: {e}", path.display())))
    } else {
        serde_json::from_str(&content)
            .map_err(|e| Error::Mapping(format!("{}: {e}", path.display())))
    }
}
