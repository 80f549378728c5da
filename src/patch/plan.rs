// SPDX-License-Identifier: PMPL-1.0-or-later

//! Patch plan files
//!
//! A plan is the data form of a patch set, written in YAML or JSON:
//!
//! ```yaml
//! fallback: en
//! entries:
//!   - key: common.apply
//!     op: upsert-if-absent
//!     values: { en: "Apply Changes", es: "Aplicar Cambios" }
//!   - key: whats_new.f2_title
//!     op: delete
//!   - key: settings.light
//!     op: rename
//!     to: settings.cappuccino
//! ```
//!
//! Plans are validated against the locale registry when loaded, so a typo
//! in a locale code or a table without its fallback fails before any
//! document is touched.

use super::{PatchEntry, PatchOp, PatchSet, ValueSource};
use crate::error::ConfigurationError;
use crate::registry::LocaleRegistry;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Yaml,
    Json,
}

impl PlanFormat {
    /// Format implied by a file extension. Unknown extensions read as YAML,
    /// which also accepts plain JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => PlanFormat::Json,
            _ => PlanFormat::Yaml,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlan {
    #[serde(default)]
    fallback: Option<String>,
    entries: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    key: String,
    op: RawOp,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    values: Option<IndexMap<String, String>>,
    #[serde(default)]
    fallback: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    after: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum RawOp {
    UpsertIfAbsent,
    UpsertAlways,
    Delete,
    #[serde(alias = "rename-to")]
    Rename,
}

/// Read and validate a plan file.
pub fn load_plan(path: &Path, registry: &LocaleRegistry) -> Result<PatchSet, ConfigurationError> {
    let body = fs::read_to_string(path).map_err(|err| ConfigurationError::InvalidPlan {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    parse_plan(&body, PlanFormat::from_path(path), registry).map_err(|reason| {
        ConfigurationError::InvalidPlan {
            path: path.to_path_buf(),
            reason,
        }
    })
}

/// Parse and validate a plan body. Errors are human-readable reasons.
pub fn parse_plan(
    body: &str,
    format: PlanFormat,
    registry: &LocaleRegistry,
) -> Result<PatchSet, String> {
    let raw: RawPlan = match format {
        PlanFormat::Yaml => serde_yaml::from_str(body).map_err(|err| err.to_string())?,
        PlanFormat::Json => serde_json::from_str(body).map_err(|err| err.to_string())?,
    };

    let default_fallback = raw
        .fallback
        .unwrap_or_else(|| registry.reference().code.to_string());
    if !registry.is_registered(&default_fallback) {
        return Err(format!("fallback locale '{}' is not registered", default_fallback));
    }

    raw.entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            convert_entry(entry, &default_fallback, registry)
                .map_err(|reason| format!("entry {}: {}", index + 1, reason))
        })
        .collect()
}

fn convert_entry(
    raw: RawEntry,
    default_fallback: &str,
    registry: &LocaleRegistry,
) -> Result<PatchEntry, String> {
    if raw.key.trim().is_empty() {
        return Err("key must not be empty".to_string());
    }
    let key = raw.key;

    let op = match raw.op {
        RawOp::UpsertIfAbsent | RawOp::UpsertAlways => {
            if raw.to.is_some() {
                return Err(format!("'{}': 'to' is only valid for rename", key));
            }
            let source = value_source(&key, raw.value, raw.values, raw.fallback, default_fallback, registry)?;
            if matches!(raw.op, RawOp::UpsertIfAbsent) {
                PatchOp::UpsertIfAbsent(source)
            } else {
                PatchOp::UpsertAlways(source)
            }
        }
        RawOp::Delete | RawOp::Rename => {
            if raw.value.is_some() || raw.values.is_some() || raw.fallback.is_some() {
                return Err(format!("'{}': delete and rename take no values", key));
            }
            if raw.after.is_some() {
                return Err(format!("'{}': 'after' is only valid for upserts", key));
            }
            match (raw.op, raw.to) {
                (RawOp::Delete, None) => PatchOp::Delete,
                (RawOp::Delete, Some(_)) => {
                    return Err(format!("'{}': 'to' is only valid for rename", key))
                }
                (_, Some(to)) if !to.trim().is_empty() && to != key => PatchOp::RenameTo(to),
                (_, Some(_)) => {
                    return Err(format!("'{}': rename target must differ from the key", key))
                }
                (_, None) => return Err(format!("'{}': rename needs 'to'", key)),
            }
        }
    };

    Ok(PatchEntry {
        key,
        op,
        after: raw.after,
    })
}

fn value_source(
    key: &str,
    value: Option<String>,
    values: Option<IndexMap<String, String>>,
    fallback: Option<String>,
    default_fallback: &str,
    registry: &LocaleRegistry,
) -> Result<ValueSource, String> {
    match (value, values) {
        (Some(value), None) => {
            if fallback.is_some() {
                return Err(format!("'{}': 'fallback' needs a 'values' table", key));
            }
            Ok(ValueSource::Literal(value))
        }
        (None, Some(values)) => {
            if values.is_empty() {
                return Err(format!("'{}': 'values' table is empty", key));
            }
            if let Some(unknown) = values.keys().find(|code| !registry.is_registered(code)) {
                return Err(format!("'{}': unknown locale '{}' in values", key, unknown));
            }
            let fallback = fallback.unwrap_or_else(|| default_fallback.to_string());
            match values.get(&fallback) {
                Some(text) if !text.trim().is_empty() => {}
                Some(_) => {
                    return Err(format!("'{}': fallback '{}' value is empty", key, fallback))
                }
                None => {
                    return Err(format!(
                        "'{}': fallback '{}' missing from values",
                        key, fallback
                    ))
                }
            }
            Ok(ValueSource::PerLocale { values, fallback })
        }
        (Some(_), Some(_)) => Err(format!("'{}': give either 'value' or 'values', not both", key)),
        (None, None) => Err(format!("'{}': upsert needs 'value' or 'values'", key)),
    }
}
