// SPDX-License-Identifier: PMPL-1.0-or-later

//! Machine translation of locale entries
//!
//! Reference text is sent to a [`Translator`] once per target language with
//! its `{{token}}` placeholders masked. A failed call never stops the run:
//! the source text is written instead and the failure is noted in the
//! batch report.
//!
//! Three modes:
//!
//! - default: every key whose value is missing, blank, or still identical
//!   to the reference text
//! - `keys`: the named keys, retranslated unconditionally
//! - `keys` + `text`: one key whose source text is given directly; the
//!   reference locale receives that text verbatim

mod mymemory;

pub use mymemory::{MyMemoryConfig, MyMemoryTranslator, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

use crate::batch::{self, BatchConfig, BatchReport, LocalePlan};
use crate::catalog::LocaleStore;
use crate::commands::untranslated_keys;
use crate::error::{ConfigurationError, PatchError, ProviderError};
use crate::patch::{Edit, ResolvedEntry};
use crate::placeholder;
use crate::registry::LocaleRegistry;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A machine-translation service.
pub trait Translator {
    fn name(&self) -> &str;

    /// Translate `text` from `source` to `target` (provider language codes).
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError>;
}

/// Translate with placeholders masked, failing if any token is lost.
pub fn translate_preserving(
    translator: &dyn Translator,
    text: &str,
    source: &str,
    target: &str,
) -> Result<String, ProviderError> {
    let masked = placeholder::mask(text);
    let translated = translator.translate(&masked.text, source, target)?;
    let restored = if masked.has_placeholders() {
        masked.restore(&translated)?
    } else {
        translated
    };
    if restored.trim().is_empty() {
        return Err(ProviderError::Malformed("empty translation".to_string()));
    }
    Ok(restored)
}

/// Which keys to translate.
#[derive(Debug, Clone, Default)]
pub struct TranslateRequest {
    pub keys: Vec<String>,
    /// Source text for a single key, instead of the reference value
    pub text: Option<String>,
}

impl TranslateRequest {
    fn validate(&self, reference: &crate::catalog::Catalog) -> Result<(), ConfigurationError> {
        if self.text.is_some() {
            if self.keys.len() != 1 {
                return Err(ConfigurationError::InvalidRequest(
                    "--text needs exactly one --key".to_string(),
                ));
            }
            return Ok(());
        }
        if let Some(key) = self.keys.iter().find(|key| !reference.contains_key(key)) {
            return Err(ConfigurationError::InvalidRequest(format!(
                "key '{}' is not in the reference catalog (use --text to supply its source text)",
                key
            )));
        }
        Ok(())
    }
}

/// Fill locales with machine translations of the reference text.
pub fn translate_locales(
    store: &LocaleStore,
    registry: &LocaleRegistry,
    translator: &dyn Translator,
    request: &TranslateRequest,
    config: &BatchConfig,
) -> Result<BatchReport, PatchError> {
    let reference = store.load_reference(registry.reference().code)?;
    request.validate(&reference)?;

    let source_language = registry.reference().provider_code;
    let config = BatchConfig {
        operation: config.operation.clone(),
        dry_run: config.dry_run,
        include_reference: request.text.is_some(),
        quiet: config.quiet,
    };

    // A new key from --text must land in the reference even when the
    // locale filter leaves it out.
    let widened;
    let registry = if request.text.is_some() {
        widened = registry.including_reference();
        &widened
    } else {
        registry
    };

    // wuu and yue share a provider language; translate once per text.
    // Only successes are kept, so a failed call is retried for the next locale.
    let mut cache: HashMap<(String, String), String> = HashMap::new();

    batch::run(store, registry, &config, |info, catalog| {
        let pending: Vec<(String, String)> = match (&request.text, request.keys.as_slice()) {
            (Some(text), [key]) => {
                if registry.is_reference(info.code) {
                    let entry = ResolvedEntry::new(key.as_str(), Edit::UpsertAlways(text.clone()));
                    return Ok(LocalePlan::from(vec![entry]));
                }
                vec![(key.clone(), text.clone())]
            }
            (_, []) => untranslated_keys(
                &reference,
                catalog,
                registry.shares_reference_language(info.code),
            )
            .into_iter()
            .map(|(key, text)| (key.to_string(), text.to_string()))
            .collect(),
            (_, keys) => keys
                .iter()
                .filter_map(|key| {
                    reference
                        .get(key)
                        .map(|text| (key.clone(), text.to_string()))
                })
                .collect(),
        };

        let target = registry.provider_code(info.code);
        let same_language = registry.shares_reference_language(info.code);
        let mut plan = LocalePlan::default();

        for (key, source_text) in pending {
            let value = if same_language {
                source_text
            } else {
                let cache_key = (target.to_string(), source_text.clone());
                let outcome = match cache.get(&cache_key) {
                    Some(translated) => Ok(translated.clone()),
                    None => {
                        debug!(key = key.as_str(), lang = target, "translating");
                        translate_preserving(translator, &source_text, source_language, target)
                    }
                };
                match outcome {
                    Ok(translated) => {
                        cache.insert(cache_key, translated.clone());
                        translated
                    }
                    Err(err) => {
                        warn!(
                            locale = info.code,
                            key = key.as_str(),
                            provider = translator.name(),
                            error = %err,
                            "translation failed, keeping source text"
                        );
                        plan.provider_failures += 1;
                        plan.notes
                            .push(format!("{}: {} (source text kept)", key, err));
                        source_text
                    }
                }
            };
            plan.entries
                .push(ResolvedEntry::new(key, Edit::UpsertAlways(value)));
        }

        Ok(plan)
    })
}
