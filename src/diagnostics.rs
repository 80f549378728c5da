// SPDX-License-Identifier: PMPL-1.0-or-later

//! `doctor`: check that a locale directory is ready for patching

use crate::catalog::LocaleStore;
use crate::config::{Settings, EMAIL_ENV, ENDPOINT_ENV};
use crate::registry::LocaleRegistry;
use crate::translate::DEFAULT_ENDPOINT;
use anyhow::{anyhow, Result};
use colored::*;
use std::env;

pub fn run_doctor(settings: &Settings) -> Result<()> {
    println!("locale-patch doctor");

    let checks = collect(settings);

    println!();
    for entry in &checks {
        entry.print();
    }

    if checks
        .iter()
        .any(|entry| matches!(entry.level, Level::Error))
    {
        Err(anyhow!("doctor reported issues"))
    } else {
        Ok(())
    }
}

fn collect(settings: &Settings) -> Vec<Diagnostic> {
    let mut checks = Vec::new();
    checks.push(Diagnostic::ok(
        "version",
        format!("locale-patch {}", env!("CARGO_PKG_VERSION")),
    ));

    let registry = match settings.registry() {
        Ok(registry) => {
            checks.push(Diagnostic::ok(
                "registry",
                format!(
                    "{} locales selected, reference {}",
                    registry.locales().len(),
                    registry.reference().code
                ),
            ));
            Some(registry)
        }
        Err(err) => {
            checks.push(Diagnostic::error("registry", err.to_string()));
            None
        }
    };

    match settings.store() {
        Ok(store) => {
            checks.push(Diagnostic::ok(
                "locale directory",
                format!("{} exists", store.dir().display()),
            ));
            if let Some(registry) = &registry {
                checks.push(check_reference(&store, registry));
                checks.extend(check_documents(&store, registry));
            }
        }
        Err(err) => checks.push(Diagnostic::error("locale directory", err.to_string())),
    }

    checks.push(check_provider());
    checks
}

#[derive(Debug, PartialEq, Eq)]
enum Level {
    Ok,
    Warn,
    Error,
}

struct Diagnostic {
    label: &'static str,
    level: Level,
    detail: String,
}

impl Diagnostic {
    fn new(label: &'static str, level: Level, detail: String) -> Self {
        Self {
            label,
            level,
            detail,
        }
    }

    fn ok(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }

    fn print(&self) {
        println!("  [{}] {:22} {}", self.level.tag(), self.label, self.detail);
    }
}

impl Level {
    fn tag(&self) -> ColoredString {
        match self {
            Level::Ok => "OK".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERR".red(),
        }
    }
}

fn check_reference(store: &LocaleStore, registry: &LocaleRegistry) -> Diagnostic {
    let code = registry.reference().code;
    if !store.exists(code) {
        return Diagnostic::error(
            "reference document",
            format!("{} missing", store.path_for(code).display()),
        );
    }
    match store.load(code) {
        Ok(catalog) => Diagnostic::ok(
            "reference document",
            format!("{}.json parsed ({} keys)", code, catalog.len()),
        ),
        Err(err) => Diagnostic::error("reference document", err.to_string()),
    }
}

fn check_documents(store: &LocaleStore, registry: &LocaleRegistry) -> Vec<Diagnostic> {
    let mut checks = Vec::new();

    let missing: Vec<&str> = registry
        .targets()
        .filter(|info| !store.exists(info.code))
        .map(|info| info.code)
        .collect();
    if missing.is_empty() {
        checks.push(Diagnostic::ok(
            "registry coverage",
            format!("{} locale documents present", registry.targets().count()),
        ));
    } else {
        checks.push(Diagnostic::warning(
            "registry coverage",
            format!("no document for: {}", missing.join(", ")),
        ));
    }

    let unreadable: Vec<&str> = registry
        .targets()
        .filter(|info| store.exists(info.code) && store.load(info.code).is_err())
        .map(|info| info.code)
        .collect();
    if !unreadable.is_empty() {
        checks.push(Diagnostic::warning(
            "document parsing",
            format!("will be skipped: {}", unreadable.join(", ")),
        ));
    }

    let unregistered: Vec<String> = store
        .discover()
        .into_iter()
        .filter(|code| !registry.is_registered(code))
        .collect();
    if !unregistered.is_empty() {
        checks.push(Diagnostic::warning(
            "unregistered documents",
            format!("not in the registry: {}", unregistered.join(", ")),
        ));
    }

    checks
}

fn check_provider() -> Diagnostic {
    let endpoint = env::var(ENDPOINT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    match env::var(EMAIL_ENV) {
        Ok(value) if !value.trim().is_empty() => Diagnostic::ok(
            "translation provider",
            format!("{} (contact set via {})", endpoint, EMAIL_ENV),
        ),
        _ => Diagnostic::warning(
            "translation provider",
            format!(
                "{} anonymous (set {} for a larger daily quota)",
                endpoint, EMAIL_ENV
            ),
        ),
    }
}
