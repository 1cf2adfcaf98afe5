//! Whitespace cleanup for text files.

use crate::traits::{Compactor, ExtensionFilter};
use anyhow::{Context, Result};
use regex::Regex;
use std::sync::LazyLock;

static RE_MULTI_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip trailing whitespace and excessive blank lines (3+ newlines → 2).
pub fn strip_redundant_whitespace(text: &str) -> String {
    let lines = text.lines()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    RE_MULTI_NEWLINE.replace_all(&lines, "\n\n").trim().to_string()
}

/// Whitespace cleanup for the configured extensions.
#[derive(Debug, Clone)]
pub struct WhitespaceCompactor {
    filter: ExtensionFilter,
}

impl WhitespaceCompactor {
    pub fn new<I, S>(extensions: I) -> Self
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

impl Compactor for WhitespaceCompactor {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn supports(&self, file: &str) -> bool {
        self.filter.matches(file)
    }

    fn compact(&self, contents: &[u8]) -> Result<Vec<u8>> {
        let text = std::str::from_utf8(contents).context("contents are not valid UTF-8")?;
        Ok(strip_redundant_whitespace(text).into_bytes())
    }
}
