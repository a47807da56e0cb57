//! Result types returned by a batch run.

use crate::error::FileError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one successfully processed source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Source PDF.
    pub source: PathBuf,
    /// Pages in the source document.
    pub pages: usize,
    /// Pages classified as separator markers.
    pub marker_pages: usize,
    /// Files written to the output directory, in ordinal order.
    pub outputs: Vec<String>,
    /// `true` when the source was copied unchanged instead of split.
    pub copied: bool,
    /// Report rows contributed by this file.
    pub rows: usize,
}

/// A source file skipped because of a [`FileError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFile {
    pub source: PathBuf,
    pub error: FileError,
}

/// Summary of a whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Files processed, in processing order.
    pub files: Vec<FileReport>,
    /// Files skipped after a per-file failure, in processing order.
    pub failed: Vec<FailedFile>,
    /// Path of the written spreadsheet.
    pub report_path: PathBuf,
    /// Total rows in the spreadsheet, header excluded.
    pub total_rows: usize,
    /// Wall-clock duration of the batch.
    pub duration_ms: u64,
}

impl BatchSummary {
    /// Number of documents written by splitting.
    pub fn documents_written(&self) -> usize {
        self.files
            .iter()
            .filter(|f| !f.copied)
            .map(|f| f.outputs.len())
            .sum()
    }

    /// Number of sources copied unchanged.
    pub fn files_copied(&self) -> usize {
        self.files.iter().filter(|f| f.copied).count()
    }
}
