//! JSON minifier: drops insignificant whitespace from valid documents.
//!
//! Works on the token stream, so numbers keep their exact spelling and
//! duplicate keys survive.

use crate::traits::{Compactor, ExtensionFilter};
use anyhow::{Context, Result};
use serde::de::IgnoredAny;

pub const DEFAULT_EXTENSIONS: &[&str] = &["json"];

/// Minify JSON files. Keys and values are kept exactly as written.
#[derive(Debug, Clone)]
pub struct JsonCompactor {
    filter: ExtensionFilter,
}

impl JsonCompactor {
    pub fn new() -> Self {
        Self::with_extensions(DEFAULT_EXTENSIONS)
    }

    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { filter: ExtensionFilter::new(extensions) }
    }

    pub fn extensions(&self) -> &[String] {
        self.filter.extensions()
    }
}

impl Default for JsonCompactor {
    fn default() -> Self {
        Self::new()
    }
}

/// Minify a JSON document. Blank input stays blank.
pub fn minify(text: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Ok(String::new());
    }
    serde_json::from_str::<IgnoredAny>(text).context("invalid JSON document")?;

    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for ch in text.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            ' ' | '\t' | '\n' | '\r' => {}
            '"' => {
                in_string = true;
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    Ok(out)
}

impl Compactor for JsonCompactor {
    fn name(&self) -> &str {
        "json"
    }

    fn supports(&self, file: &str) -> bool {
        self.filter.matches(file)
    }

    fn compact(&self, contents: &[u8]) -> Result<Vec<u8>> {
        let text = std::str::from_utf8(contents).context("contents are not valid UTF-8")?;
        Ok(minify(text)?.into_bytes())
    }
}
