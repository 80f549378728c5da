// SPDX-License-Identifier: PMPL-1.0-or-later

//! Patch sets and the catalog patcher
//!
//! A [`PatchSet`] is an ordered list of edits written once for every locale.
//! The resolver turns it into literal per-locale edits ([`ResolvedEntry`]),
//! and [`apply`] runs those against one [`Catalog`], counting only the
//! entries that actually changed. Running the same patch twice reports zero
//! changes the second time.

mod plan;
mod resolve;

pub use plan::{load_plan, parse_plan, PlanFormat};
pub use resolve::{resolve, resolve_entry, resolve_value};

use crate::catalog::Catalog;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Where an upsert gets its text from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Same text for every locale.
    Literal(String),
    /// Hand-written text per locale; locales not listed get the fallback's.
    PerLocale {
        values: IndexMap<String, String>,
        fallback: String,
    },
}

/// Operation applied to one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOp {
    UpsertIfAbsent(ValueSource),
    UpsertAlways(ValueSource),
    Delete,
    RenameTo(String),
}

/// One edit of a patch set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchEntry {
    pub key: String,
    pub op: PatchOp,
    /// Place a newly inserted key right after this one, when present.
    pub after: Option<String>,
}

impl PatchEntry {
    pub fn new(key: impl Into<String>, op: PatchOp) -> Self {
        Self {
            key: key.into(),
            op,
            after: None,
        }
    }

    pub fn upsert_if_absent(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, PatchOp::UpsertIfAbsent(ValueSource::Literal(value.into())))
    }

    pub fn upsert_always(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, PatchOp::UpsertAlways(ValueSource::Literal(value.into())))
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Self::new(key, PatchOp::Delete)
    }

    pub fn rename(key: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(key, PatchOp::RenameTo(to.into()))
    }

    pub fn after(mut self, anchor: impl Into<String>) -> Self {
        self.after = Some(anchor.into());
        self
    }
}

/// Ordered list of edits. Later entries for a key win within one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchSet {
    entries: Vec<PatchEntry>,
}

impl PatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: PatchEntry) {
        self.entries.push(entry);
    }

    pub fn with(mut self, entry: PatchEntry) -> Self {
        self.push(entry);
        self
    }

    pub fn entries(&self) -> &[PatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<PatchEntry> for PatchSet {
    fn from_iter<I: IntoIterator<Item = PatchEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A patch operation with its text already chosen for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    UpsertIfAbsent(String),
    UpsertAlways(String),
    Delete,
    RenameTo(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub key: String,
    pub edit: Edit,
    pub after: Option<String>,
}

impl ResolvedEntry {
    pub fn new(key: impl Into<String>, edit: Edit) -> Self {
        Self {
            key: key.into(),
            edit,
            after: None,
        }
    }
}

/// Per-kind change counts for one application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub renamed: usize,
}

impl ChangeSummary {
    pub fn total(&self) -> usize {
        self.added + self.updated + self.removed + self.renamed
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn absorb(&mut self, other: ChangeSummary) {
        self.added += other.added;
        self.updated += other.updated;
        self.removed += other.removed;
        self.renamed += other.renamed;
    }
}

impl std::fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "+{} ~{} -{} >{}",
            self.added, self.updated, self.removed, self.renamed
        )
    }
}

// ─── Patcher ────────────────────────────────────────────────────────

/// Apply resolved edits to `catalog` in order.
///
/// Values are written exactly as given; `{{token}}` placeholders pass
/// through untouched.
pub fn apply(catalog: &mut Catalog, entries: &[ResolvedEntry]) -> ChangeSummary {
    let mut summary = ChangeSummary::default();

    for entry in entries {
        match &entry.edit {
            Edit::UpsertIfAbsent(value) => {
                if !catalog.contains_key(&entry.key) {
                    insert_new(catalog, entry, value.clone());
                    summary.added += 1;
                }
            }
            Edit::UpsertAlways(value) => match catalog.get(&entry.key) {
                Some(current) if current == value => {}
                Some(_) => {
                    catalog.insert(entry.key.clone(), value.clone());
                    summary.updated += 1;
                }
                None => {
                    insert_new(catalog, entry, value.clone());
                    summary.added += 1;
                }
            },
            Edit::Delete => {
                if catalog.remove(&entry.key).is_some() {
                    summary.removed += 1;
                }
            }
            Edit::RenameTo(new_key) => {
                if new_key == &entry.key {
                    continue;
                }
                let Some(index) = catalog.index_of(&entry.key) else {
                    continue;
                };
                let Some(value) = catalog.remove(&entry.key) else {
                    continue;
                };
                if catalog.contains_key(new_key) {
                    catalog.insert(new_key.clone(), value);
                } else {
                    catalog.insert_at(index, new_key.clone(), value);
                }
                summary.renamed += 1;
            }
        }
    }

    summary
}

fn insert_new(catalog: &mut Catalog, entry: &ResolvedEntry, value: String) {
    let anchor = entry
        .after
        .as_deref()
        .and_then(|anchor| catalog.index_of(anchor));
    match anchor {
        Some(index) => catalog.insert_at(index + 1, entry.key.clone(), value),
        None => {
            catalog.insert(entry.key.clone(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(patch: &PatchSet, locale: &str) -> Vec<ResolvedEntry> {
        resolve(patch, locale).expect("literal patches always resolve")
    }

    #[test]
    fn upsert_if_absent_leaves_existing_values() {
        let mut catalog = Catalog::from_pairs("es", [("a", "Aplicar")]);
        let patch = PatchSet::new()
            .with(PatchEntry::upsert_if_absent("a", "Apply"))
            .with(PatchEntry::upsert_if_absent("b", "Cancelar"));
        let summary = apply(&mut catalog, &resolved(&patch, "es"));
        assert_eq!(summary.added, 1);
        assert_eq!(summary.total(), 1);
        assert_eq!(catalog.get("a"), Some("Aplicar"));
        assert_eq!(catalog.get("b"), Some("Cancelar"));
    }

    #[test]
    fn upsert_always_counts_only_real_changes() {
        let mut catalog = Catalog::from_pairs("es", [("a", "Aplicar"), ("b", "Viejo")]);
        let patch = PatchSet::new()
            .with(PatchEntry::upsert_always("a", "Aplicar"))
            .with(PatchEntry::upsert_always("b", "Nuevo"))
            .with(PatchEntry::upsert_always("c", "Otro"));
        let summary = apply(&mut catalog, &resolved(&patch, "es"));
        assert_eq!(summary, ChangeSummary { added: 1, updated: 1, removed: 0, renamed: 0 });

        let again = apply(&mut catalog, &resolved(&patch, "es"));
        assert!(again.is_empty());
    }

    #[test]
    fn delete_scenario_is_idempotent() {
        let mut catalog = Catalog::from_pairs("de", [("old.key", "x"), ("y", "z")]);
        let patch = PatchSet::new().with(PatchEntry::delete("old.key"));
        assert_eq!(apply(&mut catalog, &resolved(&patch, "de")).total(), 1);
        assert!(catalog.same_layout(&Catalog::from_pairs("de", [("y", "z")])));
        assert_eq!(apply(&mut catalog, &resolved(&patch, "de")).total(), 0);
    }

    #[test]
    fn rename_keeps_position_and_is_idempotent() {
        let mut catalog =
            Catalog::from_pairs("fr", [("a", "1"), ("settings.light", "Clair"), ("z", "2")]);
        let patch = PatchSet::new().with(PatchEntry::rename("settings.light", "settings.cappuccino"));
        assert_eq!(apply(&mut catalog, &resolved(&patch, "fr")).renamed, 1);
        assert_eq!(
            catalog.keys().collect::<Vec<_>>(),
            vec!["a", "settings.cappuccino", "z"]
        );
        assert_eq!(catalog.get("settings.cappuccino"), Some("Clair"));
        assert_eq!(apply(&mut catalog, &resolved(&patch, "fr")).total(), 0);
    }

    #[test]
    fn rename_overwrites_existing_target() {
        let mut catalog = Catalog::from_pairs("fr", [("old", "Ancien"), ("new", "Périmé")]);
        let patch = PatchSet::new().with(PatchEntry::rename("old", "new"));
        let summary = apply(&mut catalog, &resolved(&patch, "fr"));
        assert_eq!(summary.renamed, 1);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("new"), Some("Ancien"));
    }

    #[test]
    fn rename_of_absent_key_is_a_no_op() {
        let mut catalog = Catalog::from_pairs("fr", [("a", "1")]);
        let patch = PatchSet::new().with(PatchEntry::rename("missing", "a"));
        assert!(apply(&mut catalog, &resolved(&patch, "fr")).is_empty());
        assert_eq!(catalog.get("a"), Some("1"));
    }

    #[test]
    fn after_anchor_places_new_keys() {
        let mut catalog =
            Catalog::from_pairs("it", [("grammar.saved", "Salvato"), ("grammar.title", "Titolo")]);
        let patch = PatchSet::new()
            .with(PatchEntry::upsert_if_absent("grammar.bnfc", "grammar.bnfc").after("grammar.saved"))
            .with(PatchEntry::upsert_if_absent("tail", "fine").after("not.there"));
        apply(&mut catalog, &resolved(&patch, "it"));
        assert_eq!(
            catalog.keys().collect::<Vec<_>>(),
            vec!["grammar.saved", "grammar.bnfc", "grammar.title", "tail"]
        );
    }

    #[test]
    fn later_entries_override_earlier_ones() {
        let mut catalog = Catalog::new("pt");
        let patch = PatchSet::new()
            .with(PatchEntry::upsert_always("k", "primeiro"))
            .with(PatchEntry::upsert_always("k", "segundo"));
        apply(&mut catalog, &resolved(&patch, "pt"));
        assert_eq!(catalog.get("k"), Some("segundo"));
    }

    #[test]
    fn placeholders_pass_through_verbatim() {
        let mut catalog = Catalog::new("ja");
        let patch = PatchSet::new().with(PatchEntry::upsert_always(
            "console.ai_applied_count",
            "AI適用：{{count}}語を変更しました。",
        ));
        apply(&mut catalog, &resolved(&patch, "ja"));
        assert!(catalog
            .get("console.ai_applied_count")
            .unwrap()
            .contains("{{count}}"));
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let original = Catalog::from_pairs("sv", [("a", "1"), ("b", "2")]);
        let mut catalog = original.clone();
        assert!(apply(&mut catalog, &[]).is_empty());
        assert!(catalog.same_layout(&original));
    }

    #[test]
    fn summary_display_is_compact() {
        let summary = ChangeSummary { added: 2, updated: 1, removed: 0, renamed: 3 };
        assert_eq!(summary.to_string(), "+2 ~1 -0 >3");
    }
}
