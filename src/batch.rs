// SPDX-License-Identifier: PMPL-1.0-or-later

//! Batch runner: one load/patch/save pass over every selected locale
//!
//! Each locale is handled on its own. A document that is missing or will
//! not parse is recorded and skipped; only configuration problems stop the
//! run. Documents are written back only when something changed, and never
//! in dry-run mode.

use crate::catalog::{Catalog, LocaleStore};
use crate::error::{ConfigurationError, PatchError};
use crate::patch::{self, ChangeSummary, ResolvedEntry};
use crate::registry::{LocaleInfo, LocaleRegistry};
use anyhow::Result;
use colored::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options for a batch run
pub struct BatchConfig {
    /// Operation name shown in the summary and report
    pub operation: String,
    /// Compute changes without writing documents
    pub dry_run: bool,
    /// Also patch the reference locale
    pub include_reference: bool,
    /// Suppress per-locale progress lines
    pub quiet: bool,
}

impl BatchConfig {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            dry_run: false,
            include_reference: true,
            quiet: true,
        }
    }
}

/// Edits prepared for one locale.
#[derive(Debug, Default)]
pub struct LocalePlan {
    pub entries: Vec<ResolvedEntry>,
    /// Operator-facing remarks, e.g. substituted translations
    pub notes: Vec<String>,
    pub provider_failures: usize,
}

impl From<Vec<ResolvedEntry>> for LocalePlan {
    fn from(entries: Vec<ResolvedEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleStatus {
    Updated,
    WouldUpdate,
    Unchanged,
    Skipped,
    Failed,
}

impl LocaleStatus {
    fn tag(&self) -> ColoredString {
        match self {
            LocaleStatus::Updated => "UPDATED".green().bold(),
            LocaleStatus::WouldUpdate => "WOULD UPDATE".cyan().bold(),
            LocaleStatus::Unchanged => "unchanged".dimmed(),
            LocaleStatus::Skipped => "SKIPPED".yellow(),
            LocaleStatus::Failed => "FAILED".red().bold(),
        }
    }
}

/// Outcome for a single locale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleResult {
    pub locale: String,
    pub status: LocaleStatus,
    pub changes: ChangeSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(default)]
    pub provider_failures: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LocaleResult {
    fn new(locale: &str, status: LocaleStatus) -> Self {
        Self {
            locale: locale.to_string(),
            status,
            changes: ChangeSummary::default(),
            notes: Vec::new(),
            provider_failures: 0,
            error: None,
        }
    }

    fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Complete batch report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub created_at: String,
    pub operation: String,
    pub directory: PathBuf,
    pub dry_run: bool,
    pub locales_processed: usize,
    pub locales_changed: usize,
    pub locales_skipped: usize,
    pub locales_failed: usize,
    pub total_changes: ChangeSummary,
    pub provider_failures: usize,
    pub results: Vec<LocaleResult>,
}

impl BatchReport {
    pub fn result(&self, locale: &str) -> Option<&LocaleResult> {
        self.results.iter().find(|result| result.locale == locale)
    }

    pub fn has_failures(&self) -> bool {
        self.locales_failed > 0
    }
}

/// Run `plan_for` over every selected locale and apply what it returns.
///
/// The reference document must exist even when it is not patched.
pub fn run<F>(
    store: &LocaleStore,
    registry: &LocaleRegistry,
    config: &BatchConfig,
    mut plan_for: F,
) -> Result<BatchReport, PatchError>
where
    F: FnMut(&LocaleInfo, &Catalog) -> Result<LocalePlan, PatchError>,
{
    let reference = registry.reference().code;
    if !store.exists(reference) {
        return Err(ConfigurationError::MissingReference {
            locale: reference.to_string(),
            path: store.path_for(reference),
        }
        .into());
    }

    let selected: Vec<&LocaleInfo> = if config.include_reference {
        registry.locales().iter().collect()
    } else {
        registry.targets().collect()
    };

    let mut results = Vec::with_capacity(selected.len());
    for info in selected {
        let result = process_locale(store, config, info, &mut plan_for)?;
        if !config.quiet {
            print_progress(&result);
        }
        results.push(result);
    }

    let mut total_changes = ChangeSummary::default();
    for result in &results {
        total_changes.absorb(result.changes);
    }

    Ok(BatchReport {
        created_at: chrono::Utc::now().to_rfc3339(),
        operation: config.operation.clone(),
        directory: store.dir().to_path_buf(),
        dry_run: config.dry_run,
        locales_processed: results.len(),
        locales_changed: results
            .iter()
            .filter(|r| matches!(r.status, LocaleStatus::Updated | LocaleStatus::WouldUpdate))
            .count(),
        locales_skipped: results
            .iter()
            .filter(|r| r.status == LocaleStatus::Skipped)
            .count(),
        locales_failed: results
            .iter()
            .filter(|r| r.status == LocaleStatus::Failed)
            .count(),
        total_changes,
        provider_failures: results.iter().map(|r| r.provider_failures).sum(),
        results,
    })
}

fn process_locale<F>(
    store: &LocaleStore,
    config: &BatchConfig,
    info: &LocaleInfo,
    plan_for: &mut F,
) -> Result<LocaleResult, PatchError>
where
    F: FnMut(&LocaleInfo, &Catalog) -> Result<LocalePlan, PatchError>,
{
    let locale = info.code;
    if !store.exists(locale) {
        warn!(locale, "no document, skipping");
        return Ok(LocaleResult::new(locale, LocaleStatus::Skipped).with_error(format!(
            "{} not found",
            store.path_for(locale).display()
        )));
    }

    let mut catalog = match store.load(locale) {
        Ok(catalog) => catalog,
        Err(err) => {
            warn!(locale, error = %err, "unreadable document, skipping");
            return Ok(LocaleResult::new(locale, LocaleStatus::Failed).with_error(err.to_string()));
        }
    };

    let plan = match plan_for(info, &catalog) {
        Ok(plan) => plan,
        Err(err) if err.is_fatal() => return Err(err),
        Err(err) => {
            warn!(locale, error = %err, "could not prepare edits, skipping");
            return Ok(LocaleResult::new(locale, LocaleStatus::Failed).with_error(err.to_string()));
        }
    };

    let changes = patch::apply(&mut catalog, &plan.entries);
    let status = if changes.is_empty() {
        LocaleStatus::Unchanged
    } else if config.dry_run {
        LocaleStatus::WouldUpdate
    } else {
        match store.save(&catalog) {
            Ok(_) => LocaleStatus::Updated,
            Err(err) => {
                warn!(locale, error = %err, "save failed");
                let mut result =
                    LocaleResult::new(locale, LocaleStatus::Failed).with_error(err.to_string());
                result.notes = plan.notes;
                result.provider_failures = plan.provider_failures;
                return Ok(result);
            }
        }
    };

    Ok(LocaleResult {
        locale: locale.to_string(),
        status,
        changes,
        notes: plan.notes,
        provider_failures: plan.provider_failures,
        error: None,
    })
}

fn print_progress(result: &LocaleResult) {
    match &result.error {
        Some(err) => println!("  {:<8} {} {}", result.locale, result.status.tag(), err),
        None if result.changes.is_empty() => {
            println!("  {:<8} {}", result.locale, result.status.tag())
        }
        None => println!(
            "  {:<8} {} ({})",
            result.locale,
            result.status.tag(),
            result.changes
        ),
    }
    for note in &result.notes {
        println!("           {}", note.dimmed());
    }
}

/// Print a summary table to the terminal
pub fn print_summary(report: &BatchReport, quiet: bool) {
    if quiet {
        return;
    }

    let title = format!("=== {} SUMMARY ===", report.operation.to_uppercase());
    println!("\n{}", title.bold().cyan());
    println!(
        "Directory: {}  |  Locales: {}  |  Changed: {}{}",
        report.directory.display(),
        report.locales_processed,
        report.locales_changed,
        if report.dry_run { " (dry run)" } else { "" }
    );
    println!(
        "Added: {}  |  Updated: {}  |  Removed: {}  |  Renamed: {}",
        report.total_changes.added,
        report.total_changes.updated,
        report.total_changes.removed,
        report.total_changes.renamed
    );
    if report.provider_failures > 0 {
        println!(
            "{}",
            format!(
                "Translation failures: {} (source text kept)",
                report.provider_failures
            )
            .yellow()
        );
    }

    let problems: Vec<&LocaleResult> = report
        .results
        .iter()
        .filter(|r| matches!(r.status, LocaleStatus::Skipped | LocaleStatus::Failed))
        .collect();
    if !problems.is_empty() {
        println!();
        println!(
            "  {:<8} {:<10} {}",
            "Locale", "Status", "Reason"
        );
        println!("  {}", "-".repeat(60));
        for result in problems {
            println!(
                "  {:<8} {:<10} {}",
                result.locale,
                result.status.tag(),
                result.error.as_deref().unwrap_or("")
            );
        }
    }
    println!();
}

/// Write batch report as JSON
pub fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::patch::Edit;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, LocaleStore, LocaleRegistry) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.json"), "{\"a\": \"A\"}").unwrap();
        fs::write(dir.path().join("es.json"), "{\"a\": \"B\"}").unwrap();
        let store = LocaleStore::open(dir.path()).unwrap();
        let registry = LocaleRegistry::from_codes(&["en", "es"], "en").unwrap();
        (dir, store, registry)
    }

    #[test]
    fn reference_can_be_left_out() {
        let (_dir, store, registry) = fixture();
        let mut config = BatchConfig::new("test");
        config.include_reference = false;

        let mut seen = Vec::new();
        let report = run(&store, &registry, &config, |info, _| {
            seen.push(info.code);
            Ok(LocalePlan::default())
        })
        .unwrap();

        assert_eq!(seen, vec!["es"]);
        assert_eq!(report.locales_processed, 1);
        assert_eq!(report.result("es").unwrap().status, LocaleStatus::Unchanged);
    }

    #[test]
    fn non_fatal_plan_error_fails_only_that_locale() {
        let (_dir, store, registry) = fixture();
        let report = run(&store, &registry, &BatchConfig::new("test"), |info, _| {
            if info.code == "en" {
                return Err(DataError::Encoding {
                    path: PathBuf::from("en.json"),
                }
                .into());
            }
            Ok(LocalePlan::from(vec![ResolvedEntry::new(
                "b",
                Edit::UpsertAlways("C".to_string()),
            )]))
        })
        .unwrap();

        assert_eq!(report.result("en").unwrap().status, LocaleStatus::Failed);
        assert_eq!(report.result("es").unwrap().status, LocaleStatus::Updated);
        assert_eq!(report.locales_changed, 1);
        assert_eq!(report.total_changes.added, 1);
    }

    #[test]
    fn report_is_written_as_json() {
        let (dir, store, registry) = fixture();
        let mut config = BatchConfig::new("test");
        config.dry_run = true;
        let report = run(&store, &registry, &config, |_, _| {
            Ok(LocalePlan {
                entries: vec![ResolvedEntry::new("a", Edit::Delete)],
                notes: vec!["note".to_string()],
                provider_failures: 1,
            })
        })
        .unwrap();

        let path = dir.path().join("reports/run.json");
        write_report(&report, &path).unwrap();
        let back: BatchReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(back.dry_run);
        assert_eq!(back.locales_changed, 2);
        assert_eq!(back.provider_failures, 2);
        assert_eq!(back.results[0].status, LocaleStatus::WouldUpdate);
        assert_eq!(back.results[0].notes, vec!["note".to_string()]);
    }
}
