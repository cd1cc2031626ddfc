//! Composable JSON transformers.
//!
//! A [`Transformer`] takes ownership of a JSON value and returns the
//! rewritten value; callers keep their own copy untouched. Transformers are
//! shared (`Arc`) so a [`crate::templator::Templator`] can be cloned and
//! chained cheaply.
//!
//! Invariants:
//! - [`combine`] applies transformers in the order given. Composition is
//!   associative but not commutative.
//! - [`find_replace`] never fails; [`panel_transformer`] propagates the
//!   failure of the panel function.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::Result;

/// A pure `Content -> Content` rewrite.
pub type Transformer = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Fields that change on every save and make templates noisy.
pub const EDIT_METADATA_FIELDS: &[&str] = &["updated", "version", "provenance"];

/// Wrap a closure as a [`Transformer`].
pub fn transformer<F>(f: F) -> Transformer
where
    F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The identity transformer.
pub fn nop() -> Transformer {
    transformer(Ok)
}

/// Apply `f` to every string in a JSON tree. Object keys are left alone.
pub fn map_strings(value: Value, f: &dyn Fn(String) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(s)),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| map_strings(v, f)).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, map_strings(v, f)))
                .collect(),
        ),
        other => other,
    }
}

/// Literal substring replacement over every string value.
///
/// Replacements are applied one after another in the map's iteration order,
/// so a later entry sees (and may rewrite) the output of an earlier one.
pub fn find_replace(replacements: IndexMap<String, String>) -> Transformer {
    transformer(move |value| {
        Ok(map_strings(value, &|s| {
            replacements
                .iter()
                .filter(|(find, _)| !find.is_empty())
                .fold(s, |acc, (find, replace)| acc.replace(find.as_str(), replace))
        }))
    })
}

/// Apply each transformer in turn.
pub fn combine(transformers: impl IntoIterator<Item = Transformer>) -> Transformer {
    let transformers: Vec<Transformer> = transformers.into_iter().collect();
    transformer(move |value| transformers.iter().try_fold(value, |acc, t| t(acc)))
}

/// Whether a value counts as empty: `null`, `false`, zero, `""`, `[]` or `{}`.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Apply `f` to each element of the top-level `panels` array.
///
/// Panels for which `f` returns a falsy value are dropped. Nothing but
/// `panels` is touched; a value without a `panels` array passes through.
pub fn panel_transformer(f: Transformer) -> Transformer {
    transformer(move |mut value| {
        if let Some(Value::Array(panels)) = value.get_mut("panels") {
            let mut kept = Vec::with_capacity(panels.len());
            for panel in std::mem::take(panels) {
                let panel = f(panel)?;
                if !is_falsy(&panel) {
                    kept.push(panel);
                }
            }
            *panels = kept;
        }
        Ok(value)
    })
}

/// Drop `updated`, `version` and `provenance` from the top level.
pub fn remove_edit_metadata() -> Transformer {
    transformer(|mut value| {
        if let Value::Object(map) = &mut value {
            for field in EDIT_METADATA_FIELDS {
                map.shift_remove(*field);
            }
        }
        Ok(value)
    })
}
