//! Parallel packaging driver.
//!
//! Files are processed in parallel on a fully configured pipeline and then
//! written to its sink sequentially, in input order.

use crate::config::FailurePolicy;
use crate::pipeline::{run_stages, Pipeline};
use crate::sink::ArchiveSink;
use pb_core::Result;
use rayon::prelude::*;
use tracing::{debug, warn};

/// A file to package: archive entry name plus raw contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub contents: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), contents: contents.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub name: String,
    pub contents: Vec<u8>,
    pub original_len: usize,
}

/// Outcome of [`package`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReport {
    /// Entry names in write order.
    pub written: Vec<String>,
    /// (entry name, error message) for files left out.
    pub skipped: Vec<(String, String)>,
    pub bytes_in: usize,
    pub bytes_out: usize,
}

impl PackageReport {
    pub fn reduction_pct(&self) -> f64 {
        if self.bytes_in == 0 { return 0.0; }
        (self.bytes_in as f64 - self.bytes_out as f64) / self.bytes_in as f64 * 100.0
    }
}

/// Run `process` over every file in parallel. Results keep input order.
pub fn process_batch<S: ArchiveSink>(pipeline: &Pipeline<S>, files: &[SourceFile]) -> Vec<Result<ProcessedFile>> {
    let compactors = pipeline.compactors();
    let placeholders = pipeline.placeholders();
    files
        .par_iter()
        .map(|file| {
            run_stages(compactors, placeholders, &file.name, &file.contents).map(|contents| ProcessedFile {
                name: file.name.clone(),
                contents,
                original_len: file.contents.len(),
            })
        })
        .collect()
}

/// Process `files` and write the results into the pipeline's sink.
///
/// With [`FailurePolicy::Abort`] the first failing file (in input order) is
/// returned and nothing is written. With [`FailurePolicy::Skip`] failing
/// files are reported and the rest are written.
///
/// Sink errors abort under either policy. Entries written before the failing
/// one stay in the sink, so the archive is left partially written; the
/// failing entry name and the count already written are logged at `warn`.
pub fn package<S: ArchiveSink>(
    pipeline: &mut Pipeline<S>,
    files: &[SourceFile],
    policy: FailurePolicy,
) -> Result<PackageReport> {
    let results = process_batch(pipeline, files);
    let mut report = PackageReport::default();
    let mut ready = Vec::with_capacity(results.len());

    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(processed) => ready.push(processed),
            Err(e) => match policy {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Skip => {
                    warn!(file = %file.name, error = %e, "skipping file");
                    report.skipped.push((file.name.clone(), e.to_string()));
                }
            },
        }
    }

    let sink = pipeline.sink_mut();
    for processed in ready {
        if let Err(e) = sink.add_entry(&processed.name, &processed.contents) {
            warn!(
                file = %processed.name,
                written = report.written.len(),
                error = %e,
                "sink failed, archive left partially written"
            );
            return Err(e);
        }
        report.bytes_in += processed.original_len;
        report.bytes_out += processed.contents.len();
        report.written.push(processed.name);
    }

    debug!(
        written = report.written.len(),
        skipped = report.skipped.len(),
        bytes_in = report.bytes_in,
        bytes_out = report.bytes_out,
        "package complete"
    );
    Ok(report)
}
