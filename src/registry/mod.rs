// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale registry.
//!
//! The single table of locales the application ships, shared by every
//! command. Each entry records the locale identifier (which is also the
//! document stem), an English display name, and the language code the
//! translation provider expects for it.
//!
//! ## Provider codes
//!
//! | Locale  | Provider code | Why                                        |
//! |---------|---------------|--------------------------------------------|
//! | `jv`    | `jw`          | provider still uses the retired code       |
//! | `pcm`   | `en`          | Nigerian Pidgin is written from English     |
//! | `wuu`   | `zh`          | no Wu model, Simplified Chinese is closest |
//! | `yue`   | `zh`          | no Cantonese model                         |
//! | `zh-tw` | `zh-TW`       | provider wants the uppercase region        |
//!
//! A locale whose provider code equals the reference locale's provider code
//! is expected to share text with the reference; the verifier and the
//! translator both consult [`LocaleRegistry::shares_reference_language`].

mod tags;

pub use tags::{is_locale_tag, is_valid_iso639_1};

use crate::error::ConfigurationError;
use serde::Serialize;

/// One supported locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocaleInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub provider_code: &'static str,
}

const fn locale(code: &'static str, name: &'static str, provider_code: &'static str) -> LocaleInfo {
    LocaleInfo {
        code,
        name,
        provider_code,
    }
}

/// Locales shipped by default, in document order.
pub const DEFAULT_LOCALES: &[LocaleInfo] = &[
    locale("ar", "Arabic", "ar"),
    locale("bn", "Bengali", "bn"),
    locale("cs", "Czech", "cs"),
    locale("de", "German", "de"),
    locale("el", "Greek", "el"),
    locale("en", "English", "en"),
    locale("es", "Spanish", "es"),
    locale("fa", "Persian", "fa"),
    locale("fi", "Finnish", "fi"),
    locale("fr", "French", "fr"),
    locale("gu", "Gujarati", "gu"),
    locale("ha", "Hausa", "ha"),
    locale("he", "Hebrew", "he"),
    locale("hi", "Hindi", "hi"),
    locale("hu", "Hungarian", "hu"),
    locale("id", "Indonesian", "id"),
    locale("it", "Italian", "it"),
    locale("ja", "Japanese", "ja"),
    locale("jv", "Javanese", "jw"),
    locale("kn", "Kannada", "kn"),
    locale("ko", "Korean", "ko"),
    locale("ml", "Malayalam", "ml"),
    locale("mr", "Marathi", "mr"),
    locale("ms", "Malay", "ms"),
    locale("nl", "Dutch", "nl"),
    locale("pa", "Punjabi", "pa"),
    locale("pcm", "Nigerian Pidgin", "en"),
    locale("pl", "Polish", "pl"),
    locale("pt", "Portuguese", "pt"),
    locale("ro", "Romanian", "ro"),
    locale("ru", "Russian", "ru"),
    locale("sr", "Serbian", "sr"),
    locale("sv", "Swedish", "sv"),
    locale("sw", "Swahili", "sw"),
    locale("ta", "Tamil", "ta"),
    locale("te", "Telugu", "te"),
    locale("th", "Thai", "th"),
    locale("tl", "Tagalog", "tl"),
    locale("tr", "Turkish", "tr"),
    locale("uk", "Ukrainian", "uk"),
    locale("ur", "Urdu", "ur"),
    locale("vi", "Vietnamese", "vi"),
    locale("wuu", "Wu Chinese", "zh"),
    locale("yue", "Cantonese", "zh"),
    locale("zh-tw", "Traditional Chinese", "zh-TW"),
    locale("zh", "Simplified Chinese", "zh"),
];

/// The set of locales a run operates on, plus the reference locale.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    locales: Vec<LocaleInfo>,
    reference: LocaleInfo,
}

impl LocaleRegistry {
    /// Registry over [`DEFAULT_LOCALES`] with `reference` as the canonical locale.
    pub fn new(reference: &str) -> Result<Self, ConfigurationError> {
        let reference = find(reference)?;
        Ok(Self {
            locales: DEFAULT_LOCALES.to_vec(),
            reference,
        })
    }

    /// Registry limited to `codes`. The reference does not need to be listed.
    pub fn from_codes<S: AsRef<str>>(codes: &[S], reference: &str) -> Result<Self, ConfigurationError> {
        let mut registry = Self::new(reference)?;
        registry.restrict(codes)?;
        Ok(registry)
    }

    /// Keep only the listed locales. An empty list keeps everything.
    pub fn restrict<S: AsRef<str>>(&mut self, codes: &[S]) -> Result<(), ConfigurationError> {
        if codes.is_empty() {
            return Ok(());
        }
        let mut kept = Vec::with_capacity(codes.len());
        for code in codes {
            let info = find(code.as_ref())?;
            if !kept.contains(&info) {
                kept.push(info);
            }
        }
        self.locales = kept;
        Ok(())
    }

    pub fn reference(&self) -> &LocaleInfo {
        &self.reference
    }

    pub fn is_reference(&self, code: &str) -> bool {
        self.reference.code == code
    }

    /// Locales selected for this run, in registry order.
    pub fn locales(&self) -> &[LocaleInfo] {
        &self.locales
    }

    /// Selected locales other than the reference.
    pub fn targets(&self) -> impl Iterator<Item = &LocaleInfo> {
        self.locales
            .iter()
            .filter(move |info| info.code != self.reference.code)
    }

    /// Look up a locale among those shipped, selected or not.
    pub fn get(&self, code: &str) -> Option<&'static LocaleInfo> {
        DEFAULT_LOCALES.iter().find(|info| info.code == code)
    }

    pub fn is_registered(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Provider language for `code`; unregistered locales map to themselves.
    pub fn provider_code<'a>(&self, code: &'a str) -> &'a str {
        match self.get(code) {
            Some(info) => info.provider_code,
            None => code,
        }
    }

    /// Whether `code` is written in the reference locale's provider language.
    ///
    /// Regional variants differ: `zh-TW` is not `zh`.
    pub fn shares_reference_language(&self, code: &str) -> bool {
        self.provider_code(code)
            .eq_ignore_ascii_case(self.reference.provider_code)
    }

    /// This selection with the reference locale added in front if missing.
    pub fn including_reference(&self) -> LocaleRegistry {
        let mut registry = self.clone();
        if !registry.locales.contains(&registry.reference) {
            registry.locales.insert(0, registry.reference);
        }
        registry
    }
}

fn find(code: &str) -> Result<LocaleInfo, ConfigurationError> {
    DEFAULT_LOCALES
        .iter()
        .find(|info| info.code == code)
        .copied()
        .ok_or_else(|| ConfigurationError::UnknownLocale(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_every_shipped_locale() {
        let registry = LocaleRegistry::new("en").expect("en is registered");
        assert_eq!(registry.locales().len(), 46);
        assert_eq!(registry.reference().code, "en");
        assert_eq!(registry.targets().count(), 45);
    }

    #[test]
    fn default_codes_are_unique_locale_tags() {
        let mut seen = std::collections::HashSet::new();
        for info in DEFAULT_LOCALES {
            assert!(is_locale_tag(info.code), "{} should be a locale tag", info.code);
            assert!(seen.insert(info.code), "duplicate locale {}", info.code);
        }
    }

    #[test]
    fn unknown_reference_is_a_configuration_error() {
        let err = LocaleRegistry::new("xx").unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownLocale(code) if code == "xx"));
    }

    #[test]
    fn restrict_keeps_order_given_and_drops_duplicates() {
        let registry = LocaleRegistry::from_codes(&["es", "de", "es"], "en").unwrap();
        let codes: Vec<_> = registry.locales().iter().map(|l| l.code).collect();
        assert_eq!(codes, vec!["es", "de"]);
        assert!(registry.is_reference("en"));
    }

    #[test]
    fn provider_codes_follow_the_table() {
        let registry = LocaleRegistry::new("en").unwrap();
        assert_eq!(registry.provider_code("jv"), "jw");
        assert_eq!(registry.provider_code("zh-tw"), "zh-TW");
        assert_eq!(registry.provider_code("de"), "de");
        assert_eq!(registry.provider_code("tlh"), "tlh");
    }

    #[test]
    fn pidgin_shares_the_english_reference() {
        let registry = LocaleRegistry::new("en").unwrap();
        assert!(registry.shares_reference_language("pcm"));
        assert!(registry.shares_reference_language("en"));
        assert!(!registry.shares_reference_language("es"));
        assert!(!registry.shares_reference_language("zh-tw"));
    }

    #[test]
    fn regional_chinese_differs_from_simplified_reference() {
        let registry = LocaleRegistry::new("zh").unwrap();
        assert!(registry.shares_reference_language("zh"));
        assert!(registry.shares_reference_language("wuu"));
        assert!(registry.shares_reference_language("yue"));
        assert!(!registry.shares_reference_language("zh-tw"));

        let registry = LocaleRegistry::new("zh-tw").unwrap();
        assert!(!registry.shares_reference_language("zh"));
    }

    #[test]
    fn including_reference_puts_it_first_once() {
        let registry = LocaleRegistry::from_codes(&["es"], "en").unwrap();
        let codes: Vec<_> = registry
            .including_reference()
            .locales()
            .iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(codes, vec!["en", "es"]);

        let registry = LocaleRegistry::from_codes(&["es", "en"], "en").unwrap();
        assert_eq!(registry.including_reference().locales().len(), 2);
    }
}
