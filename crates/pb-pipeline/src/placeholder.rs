//! `@key@` placeholder table.
//!
//! All tokens are replaced in a single left-to-right scan, so a value that
//! itself contains a token is never expanded again. Where two tokens could
//! match at the same position the longer one wins.

use pb_core::{PackError, PlaceholderValue, Result};
use regex::bytes::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DELIMITER: char = '@';

#[derive(Debug, Clone)]
struct Entry {
    value: PlaceholderValue,
    rendered: String,
}

#[derive(Debug, Clone, Default)]
pub struct PlaceholderTable {
    /// Keyed by wrapped token.
    entries: BTreeMap<String, Entry>,
    pattern: Option<Regex>,
}

/// Wrap a raw key into its token form.
pub fn wrap(key: &str) -> String {
    format!("{DELIMITER}{key}{DELIMITER}")
}

fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "key must not be empty"
    } else if key.contains(DELIMITER) {
        "key must not contain '@'"
    } else {
        return Ok(());
    };
    Err(PackError::InvalidKey { key: key.to_string(), reason: reason.to_string() })
}

impl PlaceholderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole table. Nothing changes if any key or value is rejected.
    pub fn configure<I, K, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PlaceholderValue>,
    {
        let mut checked = Vec::new();
        for (key, value) in values {
            let key = key.into();
            let value = value.into();
            validate_key(&key)?;
            value.validate(&key)?;
            checked.push((key, value));
        }
        self.install(checked)
    }

    /// Replace the whole table from JSON, rejecting `null`, arrays and objects.
    pub fn configure_json(&mut self, values: &Map<String, Value>) -> Result<()> {
        let mut checked = Vec::with_capacity(values.len());
        for (key, value) in values {
            validate_key(key)?;
            checked.push((key.clone(), PlaceholderValue::from_json(key, value)?));
        }
        self.install(checked)
    }

    fn install(&mut self, checked: Vec<(String, PlaceholderValue)>) -> Result<()> {
        let entries: BTreeMap<String, Entry> = checked
            .into_iter()
            .map(|(key, value)| {
                let rendered = value.render();
                (wrap(&key), Entry { value, rendered })
            })
            .collect();
        let pattern = build_pattern(entries.keys())?;
        self.entries = entries;
        self.pattern = pattern;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered value for a raw key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&wrap(key)).map(|e| e.rendered.as_str())
    }

    /// Original value for a raw key.
    pub fn value(&self, key: &str) -> Option<&PlaceholderValue> {
        self.entries.get(&wrap(key)).map(|e| &e.value)
    }

    /// Wrapped tokens, sorted.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    /// Substitute every known token in `contents`.
    pub fn render(&self, contents: &[u8]) -> Vec<u8> {
        let Some(pattern) = &self.pattern else {
            return contents.to_vec();
        };
        pattern
            .replace_all(contents, |caps: &Captures<'_>| {
                let token = &caps[0];
                std::str::from_utf8(token)
                    .ok()
                    .and_then(|t| self.entries.get(t))
                    .map(|e| e.rendered.as_bytes().to_vec())
                    .unwrap_or_else(|| token.to_vec())
            })
            .into_owned()
    }

    pub fn render_str(&self, contents: &str) -> String {
        String::from_utf8_lossy(&self.render(contents.as_bytes())).into_owned()
    }
}

/// Alternation of all tokens, longest first so it wins at equal start.
fn build_pattern<'a>(tokens: impl Iterator<Item = &'a String>) -> Result<Option<Regex>> {
    let mut sorted: Vec<&String> = tokens.collect();
    if sorted.is_empty() {
        return Ok(None);
    }
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = sorted
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation)
        .map(Some)
        .map_err(|e| PackError::Config(format!("placeholder pattern: {e}")))
}
