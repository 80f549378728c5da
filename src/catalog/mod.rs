// SPDX-License-Identifier: PMPL-1.0-or-later

//! In-memory locale catalogs.
//!
//! A [`Catalog`] is one locale's flat key → text mapping. Insertion order is
//! kept so that a load/save round trip rewrites a document with its keys
//! where they were, and new keys land at the end (or after an anchor).

mod store;

pub use store::{LocaleStore, DEFAULT_EXTENSION, DEFAULT_INDENT};

use indexmap::IndexMap;
use serde::Serialize;

/// One locale's key → text mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    locale: String,
    entries: IndexMap<String, String>,
}

impl Catalog {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            entries: IndexMap::new(),
        }
    }

    /// Build a catalog from key/value pairs, keeping their order.
    pub fn from_pairs<K, V, I>(locale: impl Into<String>, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            locale: locale.into(),
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse a document body. The root must be an object of string values.
    pub fn parse(locale: impl Into<String>, body: &str) -> Result<Self, serde_json::Error> {
        let entries: IndexMap<String, String> = serde_json::from_str(body)?;
        Ok(Self {
            locale: locale.into(),
            entries,
        })
    }

    /// Render the document body with `indent` spaces and a trailing newline.
    ///
    /// Non-ASCII text is written as-is, never `\u` escaped.
    pub fn render(&self, indent: usize) -> Result<String, serde_json::Error> {
        let indent = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.entries.serialize(&mut serializer)?;
        buffer.push(b'\n');
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether both catalogs hold the same pairs in the same order.
    pub fn same_layout(&self, other: &Catalog) -> bool {
        self.entries.len() == other.entries.len() && self.iter().eq(other.iter())
    }

    pub(crate) fn index_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    /// Insert or overwrite, returning the previous value.
    pub(crate) fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.entries.insert(key, value)
    }

    /// Insert a new key at `index`, shifting later keys down.
    pub(crate) fn insert_at(&mut self, index: usize, key: String, value: String) {
        let index = index.min(self.entries.len());
        self.entries.shift_insert(index, key, value);
    }

    /// Remove a key, keeping the order of the rest.
    pub(crate) fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }
}
