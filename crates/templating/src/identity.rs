//! Split Grafana objects into identity and content fields.
//!
//! Identity fields locate an object on one particular instance. A template
//! must never carry another instance's `id`/`uid` forward, so they are
//! projected out when templating and taken from the destination when
//! inflating.
//!
//! All functions are pure: they return new values, never mutate their input
//! and preserve the key order of what they keep.

use serde_json::{Map, Value};

/// Identity fields of dashboards and search results.
pub const DASHBOARD_IDENTITY_FIELDS: &[&str] = &["id", "uid", "title"];

/// Identity fields of alert rules.
pub const ALERT_IDENTITY_FIELDS: &[&str] = &["id", "uid", "title", "orgID", "folderUID"];

/// Fields erased when turning an object into a template. The title is kept
/// so it can itself be templated.
pub const TEMPLATE_ERASED_FIELDS: &[&str] = &["id", "uid"];

/// Keep only `keys` (or, with `inverse`, everything but `keys`).
///
/// A value that is not a JSON object has no fields: projecting it yields an
/// empty object, inverse-projecting it returns it unchanged.
pub fn project(obj: &Value, keys: &[&str], inverse: bool) -> Value {
    match obj {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(k, _)| inverse ^ keys.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<String, Value>>(),
        ),
        other if inverse => other.clone(),
        _ => Value::Object(Map::new()),
    }
}

pub fn project_identity(obj: &Value) -> Value {
    project(obj, DASHBOARD_IDENTITY_FIELDS, false)
}

pub fn erase_identity(obj: &Value) -> Value {
    project(obj, DASHBOARD_IDENTITY_FIELDS, true)
}

pub fn project_alert_identity(obj: &Value) -> Value {
    project(obj, ALERT_IDENTITY_FIELDS, false)
}

pub fn erase_alert_identity(obj: &Value) -> Value {
    project(obj, ALERT_IDENTITY_FIELDS, true)
}
