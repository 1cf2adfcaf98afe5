//! Archive writers the pipeline output is handed to.

pub mod memory;
pub mod zipfile;

use pb_core::Result;

pub use memory::MemoryArchive;
pub use zipfile::ZipArchiveSink;

/// Trait for archive writers.
///
/// Archive-level metadata, compression and signing belong to the sink; the
/// pipeline only exposes the metadata handle.
pub trait ArchiveSink {
    type Metadata;

    /// Store `bytes` under entry `name`.
    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()>;

    fn metadata(&self) -> &Self::Metadata;

    fn metadata_mut(&mut self) -> &mut Self::Metadata;
}
