// SPDX-License-Identifier: PMPL-1.0-or-later

//! Consistency verifier
//!
//! Compares every locale document against the reference catalog: same key
//! set, no blank values, no text that is still the reference text, and the
//! same `{{token}}` placeholders. Findings are advisory. Nothing here fails
//! because of what it finds; a document that will not parse becomes an
//! issue of its own and the remaining locales are still checked.

use crate::catalog::{Catalog, LocaleStore};
use crate::error::{DataError, PatchError};
use crate::placeholder;
use crate::registry::LocaleRegistry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Reference values that read the same in every language.
pub const INVARIANT_VALUES: &[&str] = &["...", "…", "?", "!", "-", ":", "/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingKey,
    ExtraKey,
    EmptyValue,
    LikelyUntranslated,
    PlaceholderMismatch,
    ParseError,
    MissingDocument,
    UnregisteredLocale,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::MissingKey => "missing key",
            IssueKind::ExtraKey => "extra key",
            IssueKind::EmptyValue => "empty value",
            IssueKind::LikelyUntranslated => "likely untranslated",
            IssueKind::PlaceholderMismatch => "placeholder mismatch",
            IssueKind::ParseError => "parse error",
            IssueKind::MissingDocument => "missing document",
            IssueKind::UnregisteredLocale => "unregistered locale",
        }
    }

    /// Kinds that break the one-key-set-for-all-locales invariant.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            IssueKind::MissingKey
                | IssueKind::ExtraKey
                | IssueKind::ParseError
                | IssueKind::MissingDocument
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub locale: String,
    pub kind: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Issue {
    fn keyed(locale: &str, kind: IssueKind, key: &str) -> Self {
        Self {
            locale: locale.to_string(),
            kind,
            key: Some(key.to_string()),
            detail: None,
        }
    }

    fn document(locale: &str, kind: IssueKind, detail: impl Into<String>) -> Self {
        Self {
            locale: locale.to_string(),
            kind,
            key: None,
            detail: Some(detail.into()),
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Findings for one locale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleReport {
    pub locale: String,
    pub keys: usize,
    pub issues: Vec<Issue>,
}

impl LocaleReport {
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|issue| issue.kind == kind).count()
    }
}

/// Findings for a whole locale directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    pub reference: String,
    pub reference_keys: usize,
    pub locales: Vec<LocaleReport>,
}

impl VerificationReport {
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.locales.iter().flat_map(|locale| locale.issues.iter())
    }

    pub fn total_issues(&self) -> usize {
        self.locales.iter().map(|locale| locale.issues.len()).sum()
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues().filter(|issue| issue.kind == kind).count()
    }

    /// Issues that leave the locales without one shared key set.
    pub fn structural_issues(&self) -> usize {
        self.issues().filter(|issue| issue.kind.is_structural()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.total_issues() == 0
    }

    pub fn locale(&self, code: &str) -> Option<&LocaleReport> {
        self.locales.iter().find(|report| report.locale == code)
    }
}

/// Whether a reference value is expected to appear unchanged in a translation.
pub fn is_locale_invariant(value: &str) -> bool {
    let value = value.trim();
    if INVARIANT_VALUES.contains(&value) {
        return true;
    }
    let mut chars = value.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_alphanumeric())
}

/// Checks catalogs against one reference.
pub struct Verifier<'a> {
    reference: &'a Catalog,
    registry: &'a LocaleRegistry,
}

impl<'a> Verifier<'a> {
    pub fn new(reference: &'a Catalog, registry: &'a LocaleRegistry) -> Self {
        Self {
            reference,
            registry,
        }
    }

    /// All issues for one loaded catalog.
    pub fn check(&self, catalog: &Catalog) -> Vec<Issue> {
        let locale = catalog.locale();
        let mut issues = Vec::new();

        for key in self.reference.keys() {
            if !catalog.contains_key(key) {
                issues.push(Issue::keyed(locale, IssueKind::MissingKey, key));
            }
        }
        for key in catalog.keys() {
            if !self.reference.contains_key(key) {
                issues.push(Issue::keyed(locale, IssueKind::ExtraKey, key));
            }
        }

        let same_language = self.registry.shares_reference_language(locale);
        for (key, reference_value) in self.reference.iter() {
            let Some(value) = catalog.get(key) else {
                continue;
            };

            if value.trim().is_empty() {
                if !reference_value.trim().is_empty() {
                    issues.push(Issue::keyed(locale, IssueKind::EmptyValue, key));
                }
                continue;
            }

            if !same_language && value == reference_value && !is_locale_invariant(reference_value) {
                issues.push(
                    Issue::keyed(locale, IssueKind::LikelyUntranslated, key)
                        .with_detail(format!("\"{}\"", value)),
                );
            }

            let expected = placeholder::token_set(reference_value);
            let found = placeholder::token_set(value);
            if expected != found {
                let missing: Vec<_> = expected.difference(&found).cloned().collect();
                let unexpected: Vec<_> = found.difference(&expected).cloned().collect();
                let mut parts = Vec::new();
                if !missing.is_empty() {
                    parts.push(format!("missing {}", missing.join(", ")));
                }
                if !unexpected.is_empty() {
                    parts.push(format!("unexpected {}", unexpected.join(", ")));
                }
                issues.push(
                    Issue::keyed(locale, IssueKind::PlaceholderMismatch, key)
                        .with_detail(parts.join("; ")),
                );
            }
        }

        issues
    }

    /// Report for one locale, given the outcome of loading its document.
    pub fn check_loaded(&self, locale: &str, loaded: Result<Catalog, DataError>) -> LocaleReport {
        match loaded {
            Ok(catalog) => LocaleReport {
                locale: locale.to_string(),
                keys: catalog.len(),
                issues: self.check(&catalog),
            },
            Err(err) => LocaleReport {
                locale: locale.to_string(),
                keys: 0,
                issues: vec![Issue::document(locale, IssueKind::ParseError, err.to_string())],
            },
        }
    }
}

/// Verify in-memory catalogs (or load failures) against `reference`.
pub fn verify_catalogs<I>(reference: &Catalog, others: I, registry: &LocaleRegistry) -> VerificationReport
where
    I: IntoIterator<Item = (String, Result<Catalog, DataError>)>,
{
    let verifier = Verifier::new(reference, registry);
    let locales = others
        .into_iter()
        .map(|(locale, loaded)| verifier.check_loaded(&locale, loaded))
        .collect();

    VerificationReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        directory: None,
        reference: reference.locale().to_string(),
        reference_keys: reference.len(),
        locales,
    }
}

/// Verify every document in `store` against the registry's reference.
///
/// Registered locales come first in registry order, followed by documents
/// the registry does not know about. Only a missing or unreadable reference
/// document is an error.
pub fn verify_store(store: &LocaleStore, registry: &LocaleRegistry) -> Result<VerificationReport, PatchError> {
    let reference_code = registry.reference().code;
    let reference = store.load_reference(reference_code)?;
    let verifier = Verifier::new(&reference, registry);
    let mut locales = Vec::new();

    for info in registry.targets() {
        if !store.exists(info.code) {
            locales.push(LocaleReport {
                locale: info.code.to_string(),
                keys: 0,
                issues: vec![Issue::document(
                    info.code,
                    IssueKind::MissingDocument,
                    format!("{} not found", store.path_for(info.code).display()),
                )],
            });
            continue;
        }
        debug!(locale = info.code, "verifying");
        locales.push(verifier.check_loaded(info.code, store.load(info.code)));
    }

    for locale in store.discover() {
        if locale == reference_code || registry.is_registered(&locale) {
            continue;
        }
        let mut report = verifier.check_loaded(&locale, store.load(&locale));
        report.issues.insert(
            0,
            Issue::document(&locale, IssueKind::UnregisteredLocale, "not in the locale registry"),
        );
        locales.push(report);
    }

    Ok(VerificationReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        directory: Some(store.dir().to_path_buf()),
        reference: reference_code.to_string(),
        reference_keys: reference.len(),
        locales,
    })
}
