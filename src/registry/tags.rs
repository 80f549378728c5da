// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale tag validation.
//!
//! Locale documents are named after a language tag: an ISO 639-1 two-letter
//! code (`de`), an ISO 639-3 three-letter code for languages without one
//! (`pcm`, `wuu`, `yue`), optionally followed by a region subtag (`zh-tw`,
//! `pt_BR`). Anything else in the locale directory is not a locale document.
//!
//! Reference: <https://www.loc.gov/standards/iso639-2/php/code_list.php>

/// Validates whether a string is a known ISO 639-1 two-letter language code.
///
/// # Examples
/// ```
/// assert!(locale_patch::registry::is_valid_iso639_1("en"));
/// assert!(locale_patch::registry::is_valid_iso639_1("jv"));
/// assert!(!locale_patch::registry::is_valid_iso639_1("xx"));
/// ```
pub fn is_valid_iso639_1(code: &str) -> bool {
    matches!(
        code,
        "aa" | "ab" | "af" | "ak" | "am" | "an" | "ar" | "as" | "av" | "ay" | "az"
            | "ba" | "be" | "bg" | "bh" | "bi" | "bm" | "bn" | "bo" | "br" | "bs"
            | "ca" | "ce" | "ch" | "co" | "cr" | "cs" | "cu" | "cv" | "cy"
            | "da" | "de" | "dv" | "dz"
            | "ee" | "el" | "en" | "eo" | "es" | "et" | "eu"
            | "fa" | "ff" | "fi" | "fj" | "fo" | "fr" | "fy"
            | "ga" | "gd" | "gl" | "gn" | "gu" | "gv"
            | "ha" | "he" | "hi" | "ho" | "hr" | "ht" | "hu" | "hy" | "hz"
            | "ia" | "id" | "ie" | "ig" | "ii" | "ik" | "io" | "is" | "it" | "iu"
            | "ja" | "jv"
            | "ka" | "kg" | "ki" | "kj" | "kk" | "kl" | "km" | "kn" | "ko" | "kr" | "ks" | "ku" | "kv" | "kw" | "ky"
            | "la" | "lb" | "lg" | "li" | "ln" | "lo" | "lt" | "lu" | "lv"
            | "mg" | "mh" | "mi" | "mk" | "ml" | "mn" | "mr" | "ms" | "mt" | "my"
            | "na" | "nb" | "nd" | "ne" | "ng" | "nl" | "nn" | "no" | "nr" | "nv" | "ny"
            | "oc" | "oj" | "om" | "or" | "os"
            | "pa" | "pi" | "pl" | "ps" | "pt"
            | "qu"
            | "rm" | "rn" | "ro" | "ru" | "rw"
            | "sa" | "sc" | "sd" | "se" | "sg" | "si" | "sk" | "sl" | "sm" | "sn" | "so" | "sq" | "sr" | "ss" | "st" | "su" | "sv" | "sw"
            | "ta" | "te" | "tg" | "th" | "ti" | "tk" | "tl" | "tn" | "to" | "tr" | "ts" | "tt" | "tw" | "ty"
            | "ug" | "uk" | "ur" | "uz"
            | "ve" | "vi" | "vo"
            | "wa" | "wo"
            | "xh"
            | "yi" | "yo"
            | "za" | "zh" | "zu"
    )
}

/// Whether `tag` looks like a locale document name.
///
/// The primary subtag must be a known ISO 639-1 code or a lowercase
/// three-letter code. An optional region subtag (two letters or three
/// digits) may follow after `-` or `_`. Region case is not significant.
pub fn is_locale_tag(tag: &str) -> bool {
    let mut parts = tag.splitn(2, |c: char| c == '-' || c == '_');
    let primary = parts.next().unwrap_or_default();
    let primary_ok = match primary.len() {
        2 => is_valid_iso639_1(primary),
        3 => primary.bytes().all(|b| b.is_ascii_lowercase()),
        _ => false,
    };
    if !primary_ok {
        return false;
    }

    match parts.next() {
        None => true,
        Some(region) => {
            (region.len() == 2 && region.bytes().all(|b| b.is_ascii_alphabetic()))
                || (region.len() == 3 && region.bytes().all(|b| b.is_ascii_digit()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes_accepted() {
        assert!(is_valid_iso639_1("en"));
        assert!(is_valid_iso639_1("ja"));
        assert!(is_valid_iso639_1("sw"));
        assert!(is_valid_iso639_1("zh"));
    }

    #[test]
    fn invalid_codes_rejected() {
        assert!(!is_valid_iso639_1("xx"));
        assert!(!is_valid_iso639_1(""));
        assert!(!is_valid_iso639_1("eng"));
        assert!(!is_valid_iso639_1("EN"));
    }

    #[test]
    fn locale_tags_with_regions_and_three_letter_codes() {
        assert!(is_locale_tag("zh-tw"));
        assert!(is_locale_tag("zh-TW"));
        assert!(is_locale_tag("pt_BR"));
        assert!(is_locale_tag("es-419"));
        assert!(is_locale_tag("pcm"));
        assert!(is_locale_tag("yue"));
    }

    #[test]
    fn non_locale_names_rejected() {
        assert!(!is_locale_tag("package"));
        assert!(!is_locale_tag("tsconfig"));
        assert!(!is_locale_tag("xx"));
        assert!(!is_locale_tag("en-"));
        assert!(!is_locale_tag("PCM"));
        assert!(!is_locale_tag("zh-hant-tw"));
    }
}
