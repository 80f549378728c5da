// SPDX-License-Identifier: PMPL-1.0-or-later

//! Runtime settings shared by every subcommand

use crate::catalog::{LocaleStore, DEFAULT_INDENT};
use crate::error::ConfigurationError;
use crate::registry::LocaleRegistry;
use std::path::PathBuf;

pub const DIR_ENV: &str = "LOCALE_DIR";
pub const REFERENCE_ENV: &str = "LOCALE_REFERENCE";
pub const INDENT_ENV: &str = "LOCALE_INDENT";
pub const ENDPOINT_ENV: &str = "TRANSLATE_ENDPOINT";
pub const EMAIL_ENV: &str = "TRANSLATE_EMAIL";

pub const DEFAULT_DIR: &str = "src/locales";
pub const DEFAULT_REFERENCE: &str = "en";

/// Where the catalogs live and which of them a run touches.
#[derive(Debug, Clone)]
pub struct Settings {
    pub dir: PathBuf,
    pub reference: String,
    pub indent: usize,
    /// Restrict the run to these locales; empty means all registered.
    pub locales: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            reference: DEFAULT_REFERENCE.to_string(),
            indent: DEFAULT_INDENT,
            locales: Vec::new(),
        }
    }
}

impl Settings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn registry(&self) -> Result<LocaleRegistry, ConfigurationError> {
        LocaleRegistry::from_codes(&self.locales, &self.reference)
    }

    pub fn store(&self) -> Result<LocaleStore, ConfigurationError> {
        Ok(LocaleStore::open(&self.dir)?.with_indent(self.indent))
    }
}
