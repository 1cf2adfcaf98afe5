//! Whole-line comment stripping.
//!
//! Only lines whose first non-blank characters are a comment marker are
//! removed. Trailing comments after code are kept, as are marker sequences
//! inside string literals that do not start a line.
//!
//! Markers depend on the file type: PHP accepts both `//` and `#`, other
//! languages only `//`. Rust attributes and JavaScript private fields start
//! with `#`, so hash comments are never stripped from those.

use crate::traits::{Compactor, ExtensionFilter};
use anyhow::{bail, Result};
use regex::bytes::Regex;

pub const DEFAULT_EXTENSIONS: &[&str] = &["php", "js", "rs"];

/// Comment markers for an extension when none are configured.
pub fn default_markers(extension: &str) -> &'static [&'static str] {
    match extension {
        "php" => &["//", "#"],
        _ => &["//"],
    }
}

#[derive(Debug, Clone)]
struct CommentStyle {
    filter: ExtensionFilter,
    markers: Vec<String>,
    pattern: Regex,
}

impl CommentStyle {
    fn new(filter: ExtensionFilter, markers: Vec<String>) -> Result<Self> {
        let pattern = comment_pattern(&markers)?;
        Ok(Self { filter, markers, pattern })
    }
}

#[derive(Debug, Clone)]
pub struct CommentCompactor {
    filter: ExtensionFilter,
    styles: Vec<CommentStyle>,
    /// Markers every style accepts; used when the file name is unknown.
    shared: Option<Regex>,
}

impl CommentCompactor {
    /// PHP, JavaScript and Rust sources with their default markers.
    pub fn new() -> Result<Self> {
        Self::with_extensions(DEFAULT_EXTENSIONS)
    }

    /// Each extension gets its [`default_markers`].
    pub fn with_extensions<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filter = ExtensionFilter::new(extensions);
        let styles = filter
            .extensions()
            .iter()
            .map(|ext| {
                let markers = default_markers(ext).iter().map(|m| m.to_string()).collect();
                CommentStyle::new(ExtensionFilter::new([ext]), markers)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_styles(filter, styles)
    }

    /// One marker for every listed extension.
    pub fn with_marker<I, S>(marker: &str, extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_markers([marker], extensions)
    }

    /// The same markers for every listed extension.
    pub fn with_markers<M, I, S>(markers: M, extensions: I) -> Result<Self>
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for marker in markers {
            let marker = marker.as_ref();
            if marker.trim().is_empty() {
                bail!("comment marker must not be blank");
            }
            if !list.iter().any(|m| m == marker) {
                list.push(marker.to_string());
            }
        }
        if list.is_empty() {
            bail!("at least one comment marker is required");
        }
        let filter = ExtensionFilter::new(extensions);
        let style = CommentStyle::new(filter.clone(), list)?;
        Self::from_styles(filter, vec![style])
    }

    fn from_styles(filter: ExtensionFilter, styles: Vec<CommentStyle>) -> Result<Self> {
        let shared: Vec<String> = match styles.split_first() {
            Some((first, rest)) => first
                .markers
                .iter()
                .filter(|m| rest.iter().all(|s| s.markers.contains(*m)))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        let shared = if shared.is_empty() { None } else { Some(comment_pattern(&shared)?) };
        Ok(Self { filter, styles, shared })
    }

    pub fn extensions(&self) -> &[String] {
        self.filter.extensions()
    }

    /// Markers applied to `file`, if it is supported.
    pub fn markers_for(&self, file: &str) -> Option<&[String]> {
        self.style_for(file).map(|s| s.markers.as_slice())
    }

    fn style_for(&self, file: &str) -> Option<&CommentStyle> {
        self.styles.iter().find(|s| s.filter.matches(file))
    }

    /// Remove comment lines using only the markers common to every file type.
    pub fn strip(&self, contents: &[u8]) -> Vec<u8> {
        match &self.shared {
            Some(pattern) => pattern.replace_all(contents, &b""[..]).into_owned(),
            None => contents.to_vec(),
        }
    }

    /// Remove comment lines using the markers of `file`'s type.
    pub fn strip_file(&self, file: &str, contents: &[u8]) -> Vec<u8> {
        match self.style_for(file) {
            Some(style) => style.pattern.replace_all(contents, &b""[..]).into_owned(),
            None => contents.to_vec(),
        }
    }
}

// Byte-oriented so non-UTF-8 sources pass through.
fn comment_pattern(markers: &[String]) -> Result<Regex> {
    let alternatives: Vec<String> = markers.iter().map(|m| marker_pattern(m)).collect();
    Ok(Regex::new(&format!(
        r"(?m-u)^[ \t]*(?:{})[^\n]*\n?",
        alternatives.join("|")
    ))?)
}

fn marker_pattern(marker: &str) -> String {
    // `#[` opens a PHP attribute.
    if marker == "#" {
        r"#(?:[^\[\n]|$)".to_string()
    } else {
        regex::escape(marker)
    }
}

impl Compactor for CommentCompactor {
    fn name(&self) -> &str {
        "comments"
    }

    fn supports(&self, file: &str) -> bool {
        self.filter.matches(file)
    }

    fn compact(&self, contents: &[u8]) -> Result<Vec<u8>> {
        Ok(self.strip(contents))
    }

    fn compact_file(&self, file: &str, contents: &[u8]) -> Result<Vec<u8>> {
        Ok(self.strip_file(file, contents))
    }
}
