//! Archive packaging pipeline.
//!
//! Stages, in order:
//! 1. Compaction: registered compactors that support the file, in registration order
//! 2. Placeholder substitution: `@key@` tokens replaced by configured scalars
//!
//! The result is handed to an [`ArchiveSink`] by the caller or by the
//! [`batch`] driver.

pub mod batch;
pub mod config;
pub mod pipeline;
pub mod placeholder;
pub mod sink;

pub use batch::{package, process_batch, PackageReport, ProcessedFile, SourceFile};
pub use config::{FailurePolicy, PackConfig};
pub use pipeline::Pipeline;
pub use placeholder::PlaceholderTable;
pub use sink::{ArchiveSink, MemoryArchive, ZipArchiveSink};

pub use pb_compactor::{Compactor, CompactorChain, CompactorSpec, FnCompactor};
pub use pb_core::{PackError, PlaceholderValue, Result};

#[cfg(test)]
mod tests;
