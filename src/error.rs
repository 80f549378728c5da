// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error kinds for locale catalog operations
//!
//! Configuration problems are fatal for a whole run. Data and provider
//! problems are scoped to a single locale (or a single key) and the batch
//! runner records them and moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Missing or inconsistent global inputs. Aborts the run.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("locale directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("reference document for '{locale}' not found at {}", .path.display())]
    MissingReference { locale: String, path: PathBuf },

    #[error("unknown locale '{0}' (not in the locale registry)")]
    UnknownLocale(String),

    #[error("key '{key}': fallback locale '{fallback}' has no value in the table")]
    MissingFallback { key: String, fallback: String },

    #[error("key '{key}': fallback locale '{fallback}' maps to an empty value")]
    EmptyFallback { key: String, fallback: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid patch plan {}: {reason}", .path.display())]
    InvalidPlan { path: PathBuf, reason: String },
}

/// A locale document that could not be read or is not a flat string mapping.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a flat key/string mapping: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is not valid UTF-8", .path.display())]
    Encoding { path: PathBuf },

    #[error("serializing {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    pub fn path(&self) -> &PathBuf {
        match self {
            DataError::Io { path, .. }
            | DataError::Parse { path, .. }
            | DataError::Encoding { path }
            | DataError::Render { path, .. }
            | DataError::Write { path, .. } => path,
        }
    }
}

/// A failed machine-translation call. Callers substitute the source text.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("provider quota exhausted: {0}")]
    Quota(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("translation dropped placeholder {0}")]
    PlaceholderLost(String),
}

/// Failure while preparing or applying a patch to one locale.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Data(#[from] DataError),
}

impl PatchError {
    /// Configuration failures abort the batch; data failures skip one locale.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PatchError::Configuration(_))
    }
}
