// SPDX-License-Identifier: PMPL-1.0-or-later

//! locale-patch: batch editing and consistency checking for JSON locale catalogs.
//!
//! An application ships one flat `<locale>.json` document per language. This
//! crate applies key-level patch operations across every document at once and
//! verifies that all of them stay aligned with the reference locale.
//!
//! - [`catalog`]: ordered catalogs and the on-disk store
//! - [`patch`]: patch operations, per-locale value resolution, plan files
//! - [`verify`]: the consistency verifier
//! - [`translate`]: placeholder-safe machine translation
//! - [`batch`]: the per-locale run loop shared by every mutating command

pub mod batch;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod patch;
pub mod placeholder;
pub mod registry;
pub mod report;
pub mod translate;
pub mod verify;

pub use catalog::{Catalog, LocaleStore};
pub use error::{ConfigurationError, DataError, PatchError, ProviderError};
pub use registry::{LocaleInfo, LocaleRegistry};
