// SPDX-License-Identifier: PMPL-1.0-or-later

//! Report formatting and output

use crate::verify::{IssueKind, LocaleReport, VerificationReport};
use colored::*;
use std::collections::BTreeMap;
use std::fmt::Write;

pub struct ReportFormatter {
    color: bool,
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self { color: true }
    }

    /// Formatter that never emits terminal colors.
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn print(&self, report: &VerificationReport) {
        print!("{}", self.render(report));
    }

    pub fn render(&self, report: &VerificationReport) -> String {
        let mut out = String::new();
        self.render_header(&mut out, report);
        self.render_locales(&mut out, report);
        self.render_totals(&mut out, report);
        out
    }

    fn paint(&self, text: ColoredString) -> ColoredString {
        if self.color {
            text
        } else {
            text.clear()
        }
    }

    fn render_header(&self, out: &mut String, report: &VerificationReport) {
        let _ = writeln!(
            out,
            "\n{}",
            self.paint("=== LOCALE VERIFICATION ===".bold().cyan())
        );
        if let Some(dir) = &report.directory {
            let _ = writeln!(out, "Directory: {}", dir.display());
        }
        let _ = writeln!(
            out,
            "Reference: {} ({} keys)  |  Locales checked: {}  |  Issues: {} ({} structural)",
            report.reference,
            report.reference_keys,
            report.locales.len(),
            report.total_issues(),
            report.structural_issues()
        );
        let _ = writeln!(out);
    }

    fn render_locales(&self, out: &mut String, report: &VerificationReport) {
        let clean: Vec<&str> = report
            .locales
            .iter()
            .filter(|locale| locale.issues.is_empty())
            .map(|locale| locale.locale.as_str())
            .collect();

        for locale in report.locales.iter().filter(|l| !l.issues.is_empty()) {
            self.render_locale(out, locale);
        }

        if !clean.is_empty() {
            let _ = writeln!(
                out,
                "  {} {}",
                self.paint("Consistent:".green().bold()),
                clean.join(", ")
            );
            let _ = writeln!(out);
        }
    }

    fn render_locale(&self, out: &mut String, locale: &LocaleReport) {
        let count = format!("{} issue(s)", locale.issues.len());
        let _ = writeln!(
            out,
            "  {} {} ({} keys)",
            self.paint(locale.locale.as_str().bold()),
            self.paint(count.as_str().yellow()),
            locale.keys
        );
        for issue in &locale.issues {
            let label = format!("{:<21}", issue.kind.label());
            let label = match issue.kind {
                IssueKind::ParseError | IssueKind::MissingDocument | IssueKind::MissingKey => {
                    label.as_str().red()
                }
                IssueKind::ExtraKey | IssueKind::EmptyValue | IssueKind::PlaceholderMismatch => {
                    label.as_str().yellow()
                }
                IssueKind::LikelyUntranslated | IssueKind::UnregisteredLocale => {
                    label.as_str().blue()
                }
            };
            let mut line = format!("    {}", self.paint(label));
            if let Some(key) = &issue.key {
                let _ = write!(line, " {}", key);
            }
            if let Some(detail) = &issue.detail {
                let _ = write!(line, " {}", self.paint(detail.as_str().dimmed()));
            }
            let _ = writeln!(out, "{}", line);
        }
        let _ = writeln!(out);
    }

    fn render_totals(&self, out: &mut String, report: &VerificationReport) {
        if report.is_clean() {
            let _ = writeln!(
                out,
                "{}",
                self.paint(
                    format!("All locale files are consistent with {}", report.reference)
                        .as_str()
                        .green()
                        .bold()
                )
            );
            return;
        }

        let mut by_kind: BTreeMap<IssueKind, usize> = BTreeMap::new();
        for issue in report.issues() {
            *by_kind.entry(issue.kind).or_default() += 1;
        }
        let _ = writeln!(out, "{}", self.paint("ISSUES BY KIND".bold().yellow()));
        for (kind, count) in by_kind {
            let _ = writeln!(out, "  {:<21} {}", kind.label(), count);
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}
