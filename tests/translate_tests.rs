// SPDX-License-Identifier: PMPL-1.0-or-later

//! Machine translation runs with an in-process provider

use locale_patch::batch::{BatchConfig, LocaleStatus};
use locale_patch::error::{ConfigurationError, PatchError, ProviderError};
use locale_patch::translate::{self, TranslateRequest, Translator};
use locale_patch::{LocaleRegistry, LocaleStore};
use std::cell::{Cell, RefCell};
use std::fs;
use tempfile::TempDir;

/// Prefixes text with the target language; optionally fails or drops tokens.
struct Scripted {
    calls: RefCell<Vec<(String, String)>>,
    fail_for: Option<&'static str>,
    drop_tokens: bool,
}

impl Scripted {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            fail_for: None,
            drop_tokens: false,
        }
    }

    fn failing_for(target: &'static str) -> Self {
        Self {
            fail_for: Some(target),
            ..Self::new()
        }
    }

    fn calls_for(&self, target: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(lang, _)| lang == target)
            .count()
    }
}

impl Translator for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn translate(&self, text: &str, _source: &str, target: &str) -> Result<String, ProviderError> {
        self.calls
            .borrow_mut()
            .push((target.to_string(), text.to_string()));
        if self.fail_for == Some(target) {
            return Err(ProviderError::Quota("daily limit reached".to_string()));
        }
        if self.drop_tokens {
            return Ok("translated".to_string());
        }
        Ok(format!("[{}] {}", target, text))
    }
}

/// Fails its first call, then translates like [`Scripted`].
struct FlakyOnce {
    failed: Cell<bool>,
    inner: Scripted,
}

impl Translator for FlakyOnce {
    fn name(&self) -> &str {
        "flaky"
    }

    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ProviderError> {
        if !self.failed.replace(true) {
            self.inner
                .calls
                .borrow_mut()
                .push((target.to_string(), text.to_string()));
            return Err(ProviderError::Status {
                status: 503,
                detail: "unavailable".to_string(),
            });
        }
        self.inner.translate(text, source, target)
    }
}

fn write_locale(dir: &TempDir, locale: &str, body: &str) {
    fs::write(dir.path().join(format!("{}.json", locale)), body).unwrap();
}

fn setup(codes: &[&str], others: &[(&str, &str)]) -> (TempDir, LocaleStore, LocaleRegistry) {
    let dir = TempDir::new().unwrap();
    write_locale(
        &dir,
        "en",
        r#"{"a": "Apply", "b": "Cancel", "dots": "...", "greet": "Hi {{name}}"}"#,
    );
    for (locale, body) in others {
        write_locale(&dir, locale, body);
    }
    let store = LocaleStore::open(dir.path()).unwrap();
    let registry = LocaleRegistry::from_codes(codes, "en").unwrap();
    (dir, store, registry)
}

#[test]
fn test_default_mode_fills_missing_and_untranslated_values() {
    let (_dir, store, registry) = setup(
        &["en", "es", "pcm"],
        &[
            ("es", r#"{"a": "Apply", "b": "Cancelar", "dots": "..."}"#),
            ("pcm", r#"{}"#),
        ],
    );
    let translator = Scripted::new();

    let report = translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest::default(),
        &BatchConfig::new("translate"),
    )
    .unwrap();

    let es = store.load("es").unwrap();
    assert_eq!(es.get("a"), Some("[es] Apply"));
    assert_eq!(es.get("b"), Some("Cancelar"));
    assert_eq!(es.get("dots"), Some("..."));
    assert_eq!(es.get("greet"), Some("[es] Hi {{name}}"));
    assert_eq!(translator.calls_for("es"), 2);

    // Same language as the reference: copied, never sent to the provider.
    let pcm = store.load("pcm").unwrap();
    assert_eq!(pcm.get("a"), Some("Apply"));
    assert_eq!(pcm.get("greet"), Some("Hi {{name}}"));
    assert_eq!(translator.calls_for("en"), 0);

    assert!(report.result("en").is_none());
    assert_eq!(report.provider_failures, 0);
}

#[test]
fn test_shared_provider_language_is_translated_once() {
    let (_dir, store, registry) =
        setup(&["en", "wuu", "yue"], &[("wuu", "{}"), ("yue", "{}")]);
    let translator = Scripted::new();

    translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest::default(),
        &BatchConfig::new("translate"),
    )
    .unwrap();

    assert_eq!(translator.calls_for("zh"), 4);
    assert_eq!(store.load("wuu").unwrap().get("a"), Some("[zh] Apply"));
    assert_eq!(store.load("yue").unwrap().get("a"), Some("[zh] Apply"));
}

#[test]
fn test_provider_failure_keeps_source_text_and_continues() {
    let (_dir, store, registry) =
        setup(&["en", "de", "es"], &[("de", "{}"), ("es", "{}")]);
    let translator = Scripted::failing_for("de");

    let report = translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest {
            keys: vec!["a".to_string()],
            text: None,
        },
        &BatchConfig::new("translate"),
    )
    .unwrap();

    let de = report.result("de").unwrap();
    assert_eq!(de.status, LocaleStatus::Updated);
    assert_eq!(de.provider_failures, 1);
    assert!(de.notes[0].starts_with("a: "));
    assert!(de.notes[0].ends_with("(source text kept)"));
    assert_eq!(report.provider_failures, 1);

    assert_eq!(store.load("de").unwrap().get("a"), Some("Apply"));
    assert_eq!(store.load("es").unwrap().get("a"), Some("[es] Apply"));
}

#[test]
fn test_lost_placeholder_keeps_source_text() {
    let (_dir, store, registry) = setup(&["en", "fr"], &[("fr", "{}")]);
    let translator = Scripted {
        drop_tokens: true,
        ..Scripted::new()
    };

    let report = translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest {
            keys: vec!["greet".to_string()],
            text: None,
        },
        &BatchConfig::new("translate"),
    )
    .unwrap();

    assert_eq!(report.provider_failures, 1);
    assert_eq!(store.load("fr").unwrap().get("greet"), Some("Hi {{name}}"));
}

#[test]
fn test_named_keys_are_retranslated() {
    let (_dir, store, registry) =
        setup(&["en", "es"], &[("es", r#"{"a": "Aplicar", "b": "Cancelar"}"#)]);
    let translator = Scripted::new();

    translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest {
            keys: vec!["b".to_string()],
            text: None,
        },
        &BatchConfig::new("translate"),
    )
    .unwrap();

    let es = store.load("es").unwrap();
    assert_eq!(es.get("a"), Some("Aplicar"));
    assert_eq!(es.get("b"), Some("[es] Cancel"));
    assert_eq!(translator.calls.borrow().len(), 1);
}

#[test]
fn test_text_mode_writes_reference_verbatim() {
    let (_dir, store, registry) = setup(&["en", "es"], &[("es", "{}")]);
    let translator = Scripted::new();

    let report = translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest {
            keys: vec!["new.key".to_string()],
            text: Some("Export {{format}}".to_string()),
        },
        &BatchConfig::new("translate"),
    )
    .unwrap();

    assert_eq!(report.result("en").unwrap().status, LocaleStatus::Updated);
    assert_eq!(store.load("en").unwrap().get("new.key"), Some("Export {{format}}"));
    assert_eq!(
        store.load("es").unwrap().get("new.key"),
        Some("[es] Export {{format}}")
    );
}

#[test]
fn test_unknown_key_is_rejected_before_any_call() {
    let (_dir, store, registry) = setup(&["en", "es"], &[("es", "{}")]);
    let translator = Scripted::new();

    let err = translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest {
            keys: vec!["nope".to_string()],
            text: None,
        },
        &BatchConfig::new("translate"),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        PatchError::Configuration(ConfigurationError::InvalidRequest(_))
    ));
    assert!(translator.calls.borrow().is_empty());
}

#[test]
fn test_dry_run_translates_but_writes_nothing() {
    let (dir, store, registry) = setup(&["en", "es"], &[("es", "{}")]);
    let translator = Scripted::new();
    let mut config = BatchConfig::new("translate");
    config.dry_run = true;

    let report = translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest::default(),
        &config,
    )
    .unwrap();

    assert_eq!(report.result("es").unwrap().status, LocaleStatus::WouldUpdate);
    assert_eq!(
        fs::read_to_string(dir.path().join("es.json")).unwrap(),
        "{}"
    );
}

#[test]
fn test_failed_translation_is_retried_for_the_next_locale() {
    let (_dir, store, registry) =
        setup(&["en", "wuu", "yue"], &[("wuu", "{}"), ("yue", "{}")]);
    let translator = FlakyOnce {
        failed: Cell::new(false),
        inner: Scripted::new(),
    };

    let report = translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest {
            keys: vec!["a".to_string()],
            text: None,
        },
        &BatchConfig::new("translate"),
    )
    .unwrap();

    assert_eq!(translator.inner.calls_for("zh"), 2);
    assert_eq!(report.result("wuu").unwrap().provider_failures, 1);
    assert_eq!(report.result("yue").unwrap().provider_failures, 0);
    assert_eq!(store.load("wuu").unwrap().get("a"), Some("Apply"));
    assert_eq!(store.load("yue").unwrap().get("a"), Some("[zh] Apply"));
}

#[test]
fn test_text_mode_reaches_reference_outside_the_locale_filter() {
    let (_dir, store, _) = setup(&["en", "es"], &[("es", "{}")]);
    let registry = LocaleRegistry::from_codes(&["es"], "en").unwrap();
    let translator = Scripted::new();

    translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest {
            keys: vec!["new.key".to_string()],
            text: Some("Export".to_string()),
        },
        &BatchConfig::new("translate"),
    )
    .unwrap();

    assert_eq!(store.load("en").unwrap().get("new.key"), Some("Export"));
    assert_eq!(store.load("es").unwrap().get("new.key"), Some("[es] Export"));
}

#[test]
fn test_regional_variant_of_the_reference_is_translated() {
    let dir = TempDir::new().unwrap();
    write_locale(&dir, "zh", r#"{"a": "应用"}"#);
    write_locale(&dir, "zh-tw", "{}");
    write_locale(&dir, "yue", "{}");
    let store = LocaleStore::open(dir.path()).unwrap();
    let registry = LocaleRegistry::from_codes(&["zh", "zh-tw", "yue"], "zh").unwrap();
    let translator = Scripted::new();

    translate::translate_locales(
        &store,
        &registry,
        &translator,
        &TranslateRequest::default(),
        &BatchConfig::new("translate"),
    )
    .unwrap();

    assert_eq!(translator.calls_for("zh-TW"), 1);
    assert_eq!(store.load("zh-tw").unwrap().get("a"), Some("[zh-TW] 应用"));
    // yue shares the zh provider language and gets the text as is.
    assert_eq!(translator.calls_for("zh"), 0);
    assert_eq!(store.load("yue").unwrap().get("a"), Some("应用"));
}
