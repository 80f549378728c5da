// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale documents on disk
//!
//! One `<locale>.json` file per locale in a single directory. Saves go
//! through a temporary file in the same directory that is renamed over the
//! target, so a document is either fully rewritten or left untouched.

use super::Catalog;
use crate::error::{ConfigurationError, DataError, PatchError};
use crate::registry::is_locale_tag;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const DEFAULT_EXTENSION: &str = "json";
pub const DEFAULT_INDENT: usize = 4;

/// Directory of locale documents.
#[derive(Debug, Clone)]
pub struct LocaleStore {
    dir: PathBuf,
    indent: usize,
}

impl LocaleStore {
    /// Open an existing directory. A missing directory is fatal.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ConfigurationError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(ConfigurationError::MissingDirectory(dir));
        }
        Ok(Self {
            dir,
            indent: DEFAULT_INDENT,
        })
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", locale, DEFAULT_EXTENSION))
    }

    pub fn exists(&self, locale: &str) -> bool {
        self.path_for(locale).is_file()
    }

    /// Load one locale document.
    pub fn load(&self, locale: &str) -> Result<Catalog, DataError> {
        let path = self.path_for(locale);
        let bytes = fs::read(&path).map_err(|source| DataError::Io {
            path: path.clone(),
            source,
        })?;

        // Documents saved by Windows editors often carry a BOM.
        let (body, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(&bytes);
        if had_errors {
            return Err(DataError::Encoding { path });
        }

        let catalog =
            Catalog::parse(locale, &body).map_err(|source| DataError::Parse { path, source })?;
        debug!(locale, keys = catalog.len(), "loaded locale document");
        Ok(catalog)
    }

    /// Load the reference document. Its absence is a configuration error.
    pub fn load_reference(&self, locale: &str) -> Result<Catalog, PatchError> {
        let path = self.path_for(locale);
        if !path.is_file() {
            return Err(ConfigurationError::MissingReference {
                locale: locale.to_string(),
                path,
            }
            .into());
        }
        Ok(self.load(locale)?)
    }

    /// Atomically replace the document for `catalog.locale()`.
    pub fn save(&self, catalog: &Catalog) -> Result<PathBuf, DataError> {
        let path = self.path_for(catalog.locale());
        let write_err = |source: std::io::Error| DataError::Write {
            path: path.clone(),
            source,
        };

        let body = catalog.render(self.indent).map_err(|source| DataError::Render {
            path: path.clone(),
            source,
        })?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".locale-patch-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(write_err)?;
        tmp.write_all(body.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        // Keep the permissions of the document being replaced.
        if let Ok(metadata) = fs::metadata(&path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_err)?;
        }

        tmp.persist(&path).map_err(|err| write_err(err.error))?;
        debug!(locale = catalog.locale(), path = %path.display(), "saved locale document");
        Ok(path)
    }

    /// Locale identifiers of every document in the directory, sorted.
    ///
    /// Files whose stem is not a locale tag are ignored.
    pub fn discover(&self) -> Vec<String> {
        let mut locales: Vec<String> = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let path = entry.path();
                let is_json = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case(DEFAULT_EXTENSION))
                    .unwrap_or(false);
                if !is_json {
                    return None;
                }
                let stem = path.file_stem()?.to_str()?;
                if is_locale_tag(stem) {
                    Some(stem.to_string())
                } else {
                    debug!(file = %path.display(), "ignoring non-locale document");
                    None
                }
            })
            .collect();
        locales.sort();
        locales
    }
}
