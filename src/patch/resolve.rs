// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale resolver: picks the text one locale receives from a patch entry.
//!
//! Lookup order for a per-locale table: the locale's own entry (verbatim,
//! even when empty), then the entry's fallback locale. A missing or empty
//! fallback is a configuration error rather than a silent blank.

use super::{Edit, PatchEntry, PatchOp, PatchSet, ResolvedEntry, ValueSource};
use crate::error::ConfigurationError;

/// Text `locale` receives for `key` from `source`.
pub fn resolve_value<'a>(
    key: &str,
    source: &'a ValueSource,
    locale: &str,
) -> Result<&'a str, ConfigurationError> {
    match source {
        ValueSource::Literal(value) => Ok(value.as_str()),
        ValueSource::PerLocale { values, fallback } => {
            if let Some(own) = values.get(locale) {
                return Ok(own.as_str());
            }
            match values.get(fallback) {
                Some(value) if !value.trim().is_empty() => Ok(value.as_str()),
                Some(_) => Err(ConfigurationError::EmptyFallback {
                    key: key.to_string(),
                    fallback: fallback.clone(),
                }),
                None => Err(ConfigurationError::MissingFallback {
                    key: key.to_string(),
                    fallback: fallback.clone(),
                }),
            }
        }
    }
}

/// Resolve one entry for `locale`.
pub fn resolve_entry(entry: &PatchEntry, locale: &str) -> Result<ResolvedEntry, ConfigurationError> {
    let edit = match &entry.op {
        PatchOp::UpsertIfAbsent(source) => {
            Edit::UpsertIfAbsent(resolve_value(&entry.key, source, locale)?.to_string())
        }
        PatchOp::UpsertAlways(source) => {
            Edit::UpsertAlways(resolve_value(&entry.key, source, locale)?.to_string())
        }
        PatchOp::Delete => Edit::Delete,
        PatchOp::RenameTo(to) => Edit::RenameTo(to.clone()),
    };
    Ok(ResolvedEntry {
        key: entry.key.clone(),
        edit,
        after: entry.after.clone(),
    })
}

/// Resolve a whole patch set for `locale`, keeping entry order.
pub fn resolve(patch: &PatchSet, locale: &str) -> Result<Vec<ResolvedEntry>, ConfigurationError> {
    patch
        .entries()
        .iter()
        .map(|entry| resolve_entry(entry, locale))
        .collect()
}
