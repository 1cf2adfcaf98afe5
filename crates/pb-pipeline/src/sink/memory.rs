use super::ArchiveSink;
use pb_core::{PackError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// In-memory archive. Re-adding a name replaces the entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryArchive {
    entries: BTreeMap<String, Vec<u8>>,
    metadata: Value,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(metadata: Value) -> Self {
        Self { entries: BTreeMap::new(), metadata }
    }

    pub fn entry(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(|b| b.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> BTreeMap<String, Vec<u8>> {
        self.entries
    }
}

impl ArchiveSink for MemoryArchive {
    type Metadata = Value;

    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        if name.is_empty() {
            return Err(PackError::Sink("entry name must not be empty".into()));
        }
        self.entries.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn metadata(&self) -> &Value {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Value {
        &mut self.metadata
    }
}
