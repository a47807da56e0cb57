//! # pdf-scan-split
//!
//! Split batches of scanned PDFs on printed separator sheets and collect the
//! OCR text of every page into one spreadsheet.
//!
//! ## How it works
//!
//! Scanning a stack of paper documents in one pass produces one long PDF.
//! Slipping a divider sheet printed with a short code between the documents
//! lets this crate recover the boundaries afterwards: every page is rendered
//! and OCR'd, pages whose text looks like the code become split points, and
//! each run of pages between them is written as its own PDF.
//!
//! ```text
//! scans/batch.pdf  (6 pages, divider on page 4)
//!  │
//!  ├─ render + OCR every page (pdfium, Tesseract)
//!  ├─ classify    content content content MARKER content content
//!  ├─ segment     [0,2]                          [4,5]
//!  ├─ assemble    out/batch-1.pdf                out/batch-2.pdf
//!  └─ report      out/extracted_data.xlsx  (one row per content page)
//! ```
//!
//! A scan without any divider is copied to the output directory unchanged.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_scan_split::{split_directory, SplitConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SplitConfig::builder("scans/", "out/").build()?;
//!     let summary = split_directory(&config).await?;
//!     eprintln!(
//!         "{} documents, {} rows → {}",
//!         summary.documents_written(),
//!         summary.total_rows,
//!         summary.report_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `scansplit` binary (clap + anyhow + tracing-subscriber) |
//!
//! ## Runtime requirements
//!
//! - a pdfium shared library (`PDFIUM_LIB_PATH`, current directory, or system path)
//! - Tesseract with traineddata for every configured language (default `eng+ara`)

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod report;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{run_batch, split_directory, split_directory_sync, BatchDriver};
pub use config::{MarkerSpec, ReportLayout, SplitConfig, SplitConfigBuilder};
pub use error::{FileError, OcrError, SplitError};
pub use output::{BatchSummary, FailedFile, FileReport};
pub use pipeline::assemble::DocumentWriter;
pub use pipeline::classify::{MarkerDetector, Page};
pub use pipeline::ocr::OcrEngine;
pub use pipeline::render::Rasterizer;
pub use pipeline::segment::{segment, Run, Segmentation};
pub use report::{ReportRow, ReportWriter};
