//! Content pipeline: compactors first, then placeholder substitution.

use crate::config::PackConfig;
use crate::placeholder::PlaceholderTable;
use crate::sink::ArchiveSink;
use pb_compactor::{Compactor, CompactorChain};
use pb_core::{PlaceholderValue, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Owns the compactor chain, the placeholder table and the archive sink.
///
/// `process` never touches the sink; callers write its output themselves
/// (or use [`crate::batch::package`]).
pub struct Pipeline<S> {
    compactors: CompactorChain,
    placeholders: PlaceholderTable,
    sink: S,
}

/// Both stages, in order.
pub(crate) fn run_stages(
    compactors: &CompactorChain,
    placeholders: &PlaceholderTable,
    file: &str,
    contents: &[u8],
) -> Result<Vec<u8>> {
    let compacted = compactors.apply(file, contents)?;
    let rendered = placeholders.render(&compacted);
    debug!(file, original = contents.len(), processed = rendered.len(), "processed");
    Ok(rendered)
}

impl<S: ArchiveSink> Pipeline<S> {
    pub fn new(sink: S) -> Self {
        Self {
            compactors: CompactorChain::new(),
            placeholders: PlaceholderTable::new(),
            sink,
        }
    }

    /// Build from configuration: compactors in listed order, then values.
    pub fn from_config(config: &PackConfig, sink: S) -> Result<Self> {
        let mut pipeline = Self::new(sink);
        for spec in &config.compactors {
            pipeline.add_compactor(spec.build()?);
        }
        pipeline.configure_json(&config.values)?;
        Ok(pipeline)
    }

    /// Returns `false` if this compactor instance is already registered.
    pub fn add_compactor(&mut self, compactor: Arc<dyn Compactor>) -> bool {
        self.compactors.add(compactor)
    }

    /// Replace all placeholder values. The old table survives a failed call.
    pub fn configure_values<I, K, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PlaceholderValue>,
    {
        self.placeholders.configure(values)
    }

    pub fn configure_json(&mut self, values: &Map<String, Value>) -> Result<()> {
        self.placeholders.configure_json(values)
    }

    pub fn compactors(&self) -> &CompactorChain {
        &self.compactors
    }

    pub fn placeholders(&self) -> &PlaceholderTable {
        &self.placeholders
    }

    pub fn compact_contents(&self, file: &str, contents: &[u8]) -> Result<Vec<u8>> {
        self.compactors.apply(file, contents)
    }

    pub fn replace_values(&self, contents: &[u8]) -> Vec<u8> {
        self.placeholders.render(contents)
    }

    /// Compact, then substitute placeholders.
    pub fn process(&self, file: &str, contents: &[u8]) -> Result<Vec<u8>> {
        run_stages(&self.compactors, &self.placeholders, file, contents)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn metadata(&self) -> &S::Metadata {
        self.sink.metadata()
    }

    pub fn metadata_mut(&mut self) -> &mut S::Metadata {
        self.sink.metadata_mut()
    }
}
