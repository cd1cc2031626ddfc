//! Turn objects into templates and templates back into objects.
//!
//! A [`Templator`] is an immutable pair of transformers: `make_template`
//! (object → template) and `fill_template` (template → object). Templators
//! chain: both directions are composed in the declared order.
//!
//! Responsibilities:
//! - Erase instance identity (`id`, `uid`) when templating.
//! - Restore destination identity when inflating.
//! - Build the common environment-mapping templator.
//!
//! Invariants:
//! - A template never contains the source object's `id` or `uid`.
//! - An inflated object always carries the destination's identity, even when
//!   `fill_template` rewrote those fields.

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use grafana_config::constants::AUTO_MAPPING_ENV;

use crate::error::{Error, Result};
use crate::identity::{TEMPLATE_ERASED_FIELDS, project, project_identity};
use crate::mapping::EnvMapping;
use crate::transform::{Transformer, combine, find_replace, nop};

/// Paired forward/reverse transformers.
#[derive(Clone)]
pub struct Templator {
    make_template: Transformer,
    fill_template: Transformer,
}

impl Default for Templator {
    fn default() -> Self {
        Self::new(nop(), nop())
    }
}

impl fmt::Debug for Templator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templator").finish_non_exhaustive()
    }
}

impl Templator {
    pub fn new(make_template: Transformer, fill_template: Transformer) -> Self {
        Self {
            make_template,
            fill_template,
        }
    }

    /// Convert an object into a template.
    pub fn make_template_from_object(&self, object: &Value) -> Result<Value> {
        let content = project(object, TEMPLATE_ERASED_FIELDS, true);
        (self.make_template)(content)
    }

    /// Inflate a template, giving it the identity of `identity`.
    ///
    /// `fill_template` runs first; the identity fields of `identity`
    /// (`id`, `uid`, `title`) then overwrite whatever it produced.
    pub fn make_object_from_template(&self, identity: &Value, template: &Value) -> Result<Value> {
        let mut filled = (self.fill_template)(template.clone())?;
        if let (Value::Object(target), Value::Object(fields)) =
            (&mut filled, project_identity(identity))
        {
            target.extend(fields);
        }
        Ok(filled)
    }

    /// Run `self` then `other`, in both directions.
    pub fn chain(&self, other: &Templator) -> Templator {
        Templator {
            make_template: combine([self.make_template.clone(), other.make_template.clone()]),
            fill_template: combine([self.fill_template.clone(), other.fill_template.clone()]),
        }
    }

    /// Templator replacing the literals of `grafana_env` with those of
    /// `template_env`, and back.
    ///
    /// A `template_env` of `$auto` maps every key `k` to the placeholder
    /// `${k}`. Fails immediately if the template environment lacks any key
    /// of the Grafana environment.
    pub fn from_env_mapping(mapping: &EnvMapping, grafana_env: &str, template_env: &str) -> Result<Templator> {
        let grafana = mapping
            .get(grafana_env)
            .ok_or_else(|| Error::Mapping(format!("unknown environment '{grafana_env}'")))?;

        let template: IndexMap<String, String> = if template_env == AUTO_MAPPING_ENV {
            grafana
                .keys()
                .map(|k| (k.clone(), format!("${{{k}}}")))
                .collect()
        } else {
            mapping
                .get(template_env)
                .cloned()
                .ok_or_else(|| Error::Mapping(format!("unknown environment '{template_env}'")))?
        };

        let missing: Vec<String> = grafana
            .keys()
            .filter(|k| !template.contains_key(*k))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingMappingKey { keys: missing });
        }

        let forward: IndexMap<String, String> = grafana
            .iter()
            .filter_map(|(k, literal)| template.get(k).map(|t| (literal.clone(), t.clone())))
            .collect();
        let reverse: IndexMap<String, String> = forward
            .iter()
            .map(|(literal, placeholder)| (placeholder.clone(), literal.clone()))
            .collect();

        debug!(
            grafana_env,
            template_env,
            replacements = forward.len(),
            "Built environment mapping templator"
        );

        Ok(Templator::new(find_replace(forward), find_replace(reverse)))
    }
}
