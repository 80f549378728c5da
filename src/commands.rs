// SPDX-License-Identifier: PMPL-1.0-or-later

//! Batch operations behind the CLI subcommands
//!
//! Each function prepares per-locale edits and hands them to
//! [`batch::run`]. Machine translation lives in [`crate::translate`].

use crate::batch::{self, BatchConfig, BatchReport, LocalePlan};
use crate::catalog::{Catalog, LocaleStore};
use crate::error::PatchError;
use crate::patch::{self, Edit, PatchEntry, PatchSet, ResolvedEntry};
use crate::registry::LocaleRegistry;
use crate::verify::is_locale_invariant;
use std::collections::HashMap;

/// Apply a patch set to every selected locale, reference included.
///
/// Values are resolved for every locale up front, so a missing or empty
/// fallback fails the run before any document is written.
pub fn apply_patch(
    store: &LocaleStore,
    registry: &LocaleRegistry,
    patch: &PatchSet,
    config: &BatchConfig,
) -> Result<BatchReport, PatchError> {
    let mut resolved: HashMap<&str, Vec<ResolvedEntry>> = HashMap::new();
    for info in registry.locales() {
        resolved.insert(info.code, patch::resolve(patch, info.code)?);
    }

    batch::run(store, registry, config, |info, _| {
        Ok(LocalePlan::from(resolved.remove(info.code).unwrap_or_default()))
    })
}

/// Remove `keys` from every selected locale.
pub fn delete_keys<S: AsRef<str>>(
    store: &LocaleStore,
    registry: &LocaleRegistry,
    keys: &[S],
    config: &BatchConfig,
) -> Result<BatchReport, PatchError> {
    let patch: PatchSet = keys
        .iter()
        .map(|key| PatchEntry::delete(key.as_ref()))
        .collect();
    apply_patch(store, registry, &patch, config)
}

/// Rename `from` to `to` in every selected locale.
pub fn rename_key(
    store: &LocaleStore,
    registry: &LocaleRegistry,
    from: &str,
    to: &str,
    config: &BatchConfig,
) -> Result<BatchReport, PatchError> {
    let patch = PatchSet::new().with(PatchEntry::rename(from, to));
    apply_patch(store, registry, &patch, config)
}

/// What `sync_reference` does besides adding missing keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Delete keys the reference does not have
    pub prune: bool,
    /// Overwrite blank values with the reference text
    pub fill_empty: bool,
}

/// Bring every non-reference locale to the reference key set.
///
/// Missing keys are added with the reference text, in reference order.
pub fn sync_reference(
    store: &LocaleStore,
    registry: &LocaleRegistry,
    options: SyncOptions,
    config: &BatchConfig,
) -> Result<BatchReport, PatchError> {
    let reference = store.load_reference(registry.reference().code)?;
    let config = BatchConfig {
        operation: config.operation.clone(),
        dry_run: config.dry_run,
        include_reference: false,
        quiet: config.quiet,
    };

    batch::run(store, registry, &config, |_, catalog| {
        let mut entries = Vec::new();
        let mut previous: Option<&str> = None;

        for (key, text) in reference.iter() {
            match catalog.get(key) {
                None => {
                    let mut entry = ResolvedEntry::new(key, Edit::UpsertIfAbsent(text.to_string()));
                    entry.after = previous.map(str::to_string);
                    entries.push(entry);
                }
                Some(current)
                    if options.fill_empty
                        && current.trim().is_empty()
                        && !text.trim().is_empty() =>
                {
                    entries.push(ResolvedEntry::new(key, Edit::UpsertAlways(text.to_string())));
                }
                Some(_) => {}
            }
            previous = Some(key);
        }

        if options.prune {
            for key in catalog.keys() {
                if !reference.contains_key(key) {
                    entries.push(ResolvedEntry::new(key, Edit::Delete));
                }
            }
        }

        Ok(LocalePlan::from(entries))
    })
}

/// Keys of `catalog` that still need a translation of the reference text.
///
/// A key qualifies when it is missing, blank, or identical to a reference
/// value that is not locale-invariant.
pub fn untranslated_keys<'a>(
    reference: &'a Catalog,
    catalog: &Catalog,
    same_language: bool,
) -> Vec<(&'a str, &'a str)> {
    reference
        .iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .filter(|(key, text)| match catalog.get(key) {
            None => true,
            Some(current) if current.trim().is_empty() => true,
            Some(current) => !same_language && current == *text && !is_locale_invariant(text),
        })
        .collect()
}
