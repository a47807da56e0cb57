//! Error types for the pdf-scan-split library.
//!
//! Three error types map onto the three places a batch can fail:
//!
//! * [`SplitError`] — **Fatal**: the batch cannot start or cannot be
//!   finalised (missing input directory, no PDFs, pdfium not loadable,
//!   report not writable). Returned as `Err(SplitError)` from
//!   [`crate::batch::run_batch`] and [`crate::batch::split_directory`].
//!
//! * [`FileError`] — **Per-file**: one source PDF could not be rendered or
//!   one of its outputs could not be written. The driver records it in
//!   [`crate::output::BatchSummary::failed`] and moves on to the next file.
//!
//! * [`OcrError`] — **Per-page**: the OCR engine failed on one page. The
//!   driver substitutes empty text, which always classifies as content.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-scan-split library.
#[derive(Debug, Error)]
pub enum SplitError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// The input directory does not exist.
    #[error("Input directory not found: '{path}'\nPlease use a valid input directory path.")]
    InputDirNotFound { path: PathBuf },

    /// The input path exists but is a file, not a directory.
    #[error("Input path is not a directory: '{path}'")]
    InputNotADirectory { path: PathBuf },

    /// The input directory holds no file with a `.pdf` extension.
    #[error("No PDF files in the input directory '{path}'")]
    NoPdfFiles { path: PathBuf },

    /// The output directory is missing and could not be created.
    #[error("Cannot create output directory '{path}': {source}\nPlease use a valid output directory path.")]
    OutputDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Engine errors ─────────────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium or install pdfium system-wide."
    )]
    PdfiumBindingFailed(String),

    /// Tesseract could not be initialised with the requested languages.
    #[error(
        "Failed to initialise Tesseract with languages '{languages}': {detail}\n\
Make sure the traineddata files are installed (e.g. tesseract-ocr-ara)."
    )]
    OcrInitFailed { languages: String, detail: String },

    // ── Report errors ─────────────────────────────────────────────────────
    /// The spreadsheet report could not be saved.
    #[error("Failed to write report '{path}': {detail}")]
    ReportWriteFailed { path: PathBuf, detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A failure confined to one source file.
///
/// Any documents written for the file before the failure stay on disk.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// pdfium could not open the source document.
    #[error("cannot open '{path}': {detail}")]
    OpenFailed { path: PathBuf, detail: String },

    /// A single page failed to rasterise.
    #[error("page {page}: rasterisation failed: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// An output document could not be written.
    #[error("failed to write '{path}': {detail}")]
    WriteFailed { path: PathBuf, detail: String },

    /// The unsplit source could not be copied to the output directory.
    #[error("failed to copy '{from}' to '{to}': {detail}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        detail: String,
    },
}

/// OCR failure on a single page.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The rasterised page could not be handed to the engine.
    #[error("image hand-off failed: {0}")]
    Image(String),

    /// The engine ran but produced no usable text.
    #[error("recognition failed: {0}")]
    Recognition(String),
}
