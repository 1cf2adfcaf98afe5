//! Ordered compactor chain with identity-based dedup.

use crate::traits::Compactor;
use pb_core::{PackError, Result};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Compactors in application order.
///
/// Identity is the `Arc` allocation: two separately constructed compactors
/// of the same kind are distinct, two clones of one `Arc` are the same.
#[derive(Clone, Default)]
pub struct CompactorChain {
    compactors: Vec<Arc<dyn Compactor>>,
}

impl CompactorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a compactor. Returns `false` if this instance is already registered.
    pub fn add(&mut self, compactor: Arc<dyn Compactor>) -> bool {
        if self.contains(&compactor) {
            debug!(compactor = compactor.name(), "compactor already registered");
            return false;
        }
        self.compactors.push(compactor);
        true
    }

    pub fn contains(&self, compactor: &Arc<dyn Compactor>) -> bool {
        self.compactors.iter().any(|c| Arc::ptr_eq(c, compactor))
    }

    pub fn len(&self) -> usize {
        self.compactors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compactors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Compactor>> {
        self.compactors.iter()
    }

    /// Compactor names in application order.
    pub fn names(&self) -> Vec<&str> {
        self.compactors.iter().map(|c| c.name()).collect()
    }

    /// Run every supporting compactor over `contents`, each feeding the next.
    ///
    /// The first failure aborts the whole call.
    pub fn apply(&self, file: &str, contents: &[u8]) -> Result<Vec<u8>> {
        let mut current: Cow<'_, [u8]> = Cow::Borrowed(contents);
        for (position, compactor) in self.compactors.iter().enumerate() {
            if !compactor.supports(file) {
                continue;
            }
            debug!(compactor = compactor.name(), position, file, "compacting");
            let next = compactor
                .compact_file(file, &current)
                .map_err(|e| PackError::Transform {
                    compactor: compactor.name().to_string(),
                    position,
                    file: file.to_string(),
                    source: e,
                })?;
            current = Cow::Owned(next);
        }
        Ok(current.into_owned())
    }
}

impl fmt::Debug for CompactorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
