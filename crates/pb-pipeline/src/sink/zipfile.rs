//! ZIP archive sink backed by the `zip` crate.

use super::ArchiveSink;
use pb_core::{PackError, Result};
use std::collections::HashSet;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn zip_error(e: zip::result::ZipError) -> PackError {
    PackError::Sink(format!("zip: {e}"))
}

/// Writes entries into a ZIP stream. The metadata handle is the archive
/// comment, written by [`ZipArchiveSink::finish`].
pub struct ZipArchiveSink<W: Write + Seek> {
    writer: ZipWriter<W>,
    options: SimpleFileOptions,
    names: HashSet<String>,
    comment: String,
}

impl<W: Write + Seek> ZipArchiveSink<W> {
    pub fn new(inner: W) -> Self {
        Self::with_compression(inner, CompressionMethod::Deflated)
    }

    pub fn with_compression(inner: W, method: CompressionMethod) -> Self {
        Self {
            writer: ZipWriter::new(inner),
            options: SimpleFileOptions::default().compression_method(method),
            names: HashSet::new(),
            comment: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Write the central directory and return the inner writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.set_comment(self.comment.clone());
        self.writer.finish().map_err(zip_error)
    }
}

impl<W: Write + Seek> ArchiveSink for ZipArchiveSink<W> {
    type Metadata = String;

    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        if name.is_empty() {
            return Err(PackError::Sink("entry name must not be empty".into()));
        }
        if self.names.contains(name) {
            return Err(PackError::Sink(format!("duplicate entry '{name}'")));
        }
        self.writer.start_file(name, self.options).map_err(zip_error)?;
        self.writer.write_all(bytes)?;
        self.names.insert(name.to_string());
        Ok(())
    }

    fn metadata(&self) -> &String {
        &self.comment
    }

    fn metadata_mut(&mut self) -> &mut String {
        &mut self.comment
    }
}
