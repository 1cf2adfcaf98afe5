use anyhow::Result;

/// Trait for file content compactors.
pub trait Compactor: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Check if the compactor applies to a file.
    fn supports(&self, file: &str) -> bool;

    /// Transform file contents.
    fn compact(&self, contents: &[u8]) -> Result<Vec<u8>>;

    /// Transform the contents of a named file. The chain calls this one;
    /// override it when the transform depends on the file type.
    fn compact_file(&self, _file: &str, contents: &[u8]) -> Result<Vec<u8>> {
        self.compact(contents)
    }
}

/// Case-insensitive file extension matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Accepts extensions with or without the leading dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim_start_matches('.').to_lowercase();
            if !ext.is_empty() && !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        Self { extensions: normalized }
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Check a file name's extension against the list.
    pub fn matches(&self, file: &str) -> bool {
        let ext = std::path::Path::new(file)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        if ext.is_empty() {
            return false;
        }
        let ext = ext.to_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

type SupportsFn = dyn Fn(&str) -> bool + Send + Sync;
type CompactFn = dyn Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync;

/// Compactor built from a pair of closures.
pub struct FnCompactor {
    name: String,
    supports: Box<SupportsFn>,
    compact: Box<CompactFn>,
}

impl FnCompactor {
    pub fn new<S, C>(name: impl Into<String>, supports: S, compact: C) -> Self
    where
        S: Fn(&str) -> bool + Send + Sync + 'static,
        C: Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            supports: Box::new(supports),
            compact: Box::new(compact),
        }
    }
}

impl Compactor for FnCompactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, file: &str) -> bool {
        (self.supports)(file)
    }

    fn compact(&self, contents: &[u8]) -> Result<Vec<u8>> {
        (self.compact)(contents)
    }
}
