//! Link reference extraction.
//!
//! Walks arbitrary nested JSON-like data and collects every observed
//! (normalized URL, field name) pair into a set-like index. The counting
//! unit everywhere downstream is that pair, not raw occurrences.

use crate::config::MigrationConfig;
use crate::url::normalize;
use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// Quoted `href` attribute values inside markup fragments.
fn href_attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"href\s*=\s*["']([^"']+)["']"#).expect("href attribute pattern is valid")
    })
}

/// Field name recorded for URLs scanned out of markup text.
const HREF_KEY: &str = "href";

/// Per-source index: normalized URL -> set of originating field names,
/// plus one representative raw string per URL for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct UrlKeyIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
    originals: BTreeMap<String, String>,
}

impl UrlKeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one (url, key) observation. Repeated observations of the
    /// same pair collapse to one.
    pub fn record(&mut self, raw_url: &str, key: &str) {
        let normalized = normalize(raw_url);
        self.originals
            .entry(normalized.clone())
            .or_insert_with(|| raw_url.to_string());
        self.entries
            .entry(normalized)
            .or_default()
            .insert(key.to_string());
    }

    pub fn contains_pair(&self, url: &str, key: &str) -> bool {
        self.entries
            .get(url)
            .is_some_and(|keys| keys.contains(key))
    }

    /// Distinct keys recorded for a URL; zero when the URL is absent.
    pub fn key_count(&self, url: &str) -> usize {
        self.entries.get(url).map_or(0, BTreeSet::len)
    }

    pub fn keys_for(&self, url: &str) -> Vec<String> {
        self.entries
            .get(url)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Representative pre-normalization string for a URL, if recorded.
    pub fn original_for(&self, url: &str) -> Option<&str> {
        self.originals.get(url).map(String::as_str)
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All (url, key) pairs in deterministic order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(url, keys)| {
            keys.iter().map(move |key| (url.as_str(), key.as_str()))
        })
    }

    /// Number of distinct URLs.
    pub fn unique_url_count(&self) -> usize {
        self.entries.len()
    }

    /// Total (url, key) pairs across all URLs.
    pub fn pair_count(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Depth-first extractor over arbitrary nested structured data.
pub struct LinkReferenceExtractor {
    url_keys: BTreeSet<String>,
    noise_placeholder: String,
}

impl LinkReferenceExtractor {
    pub fn new(config: &MigrationConfig) -> Self {
        LinkReferenceExtractor {
            url_keys: config.url_keys.iter().cloned().collect(),
            noise_placeholder: config.noise_placeholder.clone(),
        }
    }

    /// Collect every (url, key) pair observed anywhere in `data`.
    ///
    /// Key visitation order never affects the result: the index is
    /// set-like, so extraction is idempotent regardless of traversal
    /// order.
    pub fn extract(&self, data: &Value) -> UrlKeyIndex {
        let mut index = UrlKeyIndex::new();
        self.walk(data, &mut index);
        index
    }

    fn walk(&self, value: &Value, index: &mut UrlKeyIndex) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.walk(item, index);
                }
            }
            Value::Object(map) => {
                for (key, entry) in map {
                    match entry {
                        Value::String(s) if self.url_keys.contains(key) => {
                            if s != &self.noise_placeholder {
                                index.record(s, key);
                            }
                        }
                        Value::String(s) if key == "text" => {
                            self.scan_markup(s, index);
                        }
                        _ => self.walk(entry, index),
                    }
                }
            }
            // Scalars carry no references.
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    /// Scan a markup string for anchor href values. Only values that look
    /// like absolute paths or http(s) URLs are kept.
    fn scan_markup(&self, markup: &str, index: &mut UrlKeyIndex) {
        for capture in href_attribute_re().captures_iter(markup) {
            let value = &capture[1];
            if value.starts_with('/') || value.starts_with("http") {
                index.record(value, HREF_KEY);
            }
        }
    }
}
