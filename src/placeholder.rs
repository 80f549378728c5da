// SPDX-License-Identifier: PMPL-1.0-or-later

//! `{{token}}` interpolation placeholders
//!
//! The application substitutes these at runtime, so their literal text must
//! survive every rewrite. Before text goes to a translation provider each
//! token is swapped for an opaque sentinel and swapped back afterwards.

use crate::error::ProviderError;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{[^{}]*\}\}").expect("placeholder pattern compiles"))
}

/// Placeholder tokens in order of appearance, braces included.
pub fn tokens(text: &str) -> Vec<&str> {
    pattern().find_iter(text).map(|m| m.as_str()).collect()
}

/// Distinct tokens with inner whitespace removed (`{{ count }}` == `{{count}}`).
pub fn token_set(text: &str) -> BTreeSet<String> {
    tokens(text)
        .into_iter()
        .map(|token| token.chars().filter(|c| !c.is_whitespace()).collect())
        .collect()
}

fn sentinel(index: usize) -> String {
    format!("__PH{}__", index)
}

/// Text with its placeholders replaced by sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Masked {
    pub text: String,
    tokens: Vec<String>,
}

impl Masked {
    pub fn has_placeholders(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Put the original tokens back into `translated`.
    pub fn restore(&self, translated: &str) -> Result<String, ProviderError> {
        let mut restored = translated.to_string();
        for (index, token) in self.tokens.iter().enumerate() {
            let marker = sentinel(index);
            if !restored.contains(&marker) {
                return Err(ProviderError::PlaceholderLost(token.clone()));
            }
            restored = restored.replace(&marker, token);
        }
        Ok(restored)
    }
}

/// Replace every placeholder in `text` with a numbered sentinel.
pub fn mask(text: &str) -> Masked {
    let mut tokens = Vec::new();
    let masked = pattern().replace_all(text, |caps: &regex::Captures<'_>| {
        let marker = sentinel(tokens.len());
        tokens.push(caps[0].to_string());
        marker
    });
    Masked {
        text: masked.into_owned(),
        tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_tokens_in_order() {
        assert_eq!(
            tokens("{{count}} of {{ total }} words"),
            vec!["{{count}}", "{{ total }}"]
        );
        assert!(tokens("no placeholders { here }").is_empty());
    }

    #[test]
    fn token_set_ignores_inner_whitespace() {
        assert_eq!(token_set("{{ count }}"), token_set("{{count}}"));
    }

    #[test]
    fn mask_and_restore_round_trip() {
        let masked = mask("AI applied: {{count}} words modified in {{file}}.");
        assert_eq!(masked.text, "AI applied: __PH0__ words modified in __PH1__.");
        assert!(masked.has_placeholders());
        let restored = masked
            .restore("IA aplicada: __PH0__ palabras modificadas en __PH1__.")
            .unwrap();
        assert_eq!(restored, "IA aplicada: {{count}} palabras modificadas en {{file}}.");
    }

    #[test]
    fn restore_fails_when_a_sentinel_is_dropped() {
        let masked = mask("{{count}} Paradigms");
        let err = masked.restore("Paradigmas").unwrap_err();
        assert!(matches!(err, ProviderError::PlaceholderLost(token) if token == "{{count}}"));
    }

    #[test]
    fn text_without_tokens_is_unchanged() {
        let masked = mask("Syntax Sandbox");
        assert_eq!(masked.text, "Syntax Sandbox");
        assert_eq!(masked.restore("Bac à sable").unwrap(), "Bac à sable");
    }
}
