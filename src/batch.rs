//! Batch entry points: split every PDF in a directory.
//!
//! Files are processed strictly one after another, in listing order, and
//! each file's report rows are appended only after the whole file has
//! succeeded. Row order in the report is therefore file order, then run
//! ordinal, then page order, and a failed file leaves no rows behind.
//!
//! ```text
//! for each PDF:
//!   render ──▶ OCR ──▶ classify ──▶ segment ──┬─▶ assemble runs (split)
//!                                             └─▶ copy original (no split)
//!   └── rows ──▶ ReportWriter
//! ReportWriter::finish ──▶ extracted_data.xlsx
//! ```

use crate::config::SplitConfig;
use crate::error::{FileError, SplitError};
use crate::output::{BatchSummary, FailedFile, FileReport};
use crate::pipeline::assemble::{assemble, copy_original, DocumentWriter};
use crate::pipeline::classify::{MarkerDetector, Page};
use crate::pipeline::ocr::{recognize_or_empty, OcrEngine, TesseractEngine};
use crate::pipeline::render::{PdfiumBackend, Rasterizer};
use crate::pipeline::segment::{segment, Segmentation};
use crate::pipeline::input;
use crate::report::{ReportRow, ReportWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// Drives the per-file pipeline over injected collaborators.
pub struct BatchDriver<'a> {
    config: &'a SplitConfig,
    detector: MarkerDetector,
    rasterizer: &'a dyn Rasterizer,
    ocr: &'a mut dyn OcrEngine,
    writer: &'a dyn DocumentWriter,
}

impl<'a> BatchDriver<'a> {
    pub fn new(
        config: &'a SplitConfig,
        rasterizer: &'a dyn Rasterizer,
        ocr: &'a mut dyn OcrEngine,
        writer: &'a dyn DocumentWriter,
    ) -> Self {
        Self {
            config,
            detector: MarkerDetector::new(&config.marker),
            rasterizer,
            ocr,
            writer,
        }
    }

    /// Process `files` in order, appending each successful file's rows to
    /// `report`. Per-file failures are logged and collected, never returned.
    pub fn run(
        &mut self,
        files: &[PathBuf],
        report: &mut ReportWriter,
    ) -> (Vec<FileReport>, Vec<FailedFile>) {
        let mut done = Vec::with_capacity(files.len());
        let mut failed = Vec::new();

        for (i, source) in files.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, files.len(), source.display());
            match self.process_file(source) {
                Ok((file_report, rows)) => {
                    let cursor = report.append_rows(rows);
                    debug!("Report cursor at row {}", cursor);
                    done.push(file_report);
                }
                Err(e) => {
                    error!("Reading or writing {} has failed: {}", source.display(), e);
                    failed.push(FailedFile {
                        source: source.clone(),
                        error: e,
                    });
                }
            }
        }

        (done, failed)
    }

    /// Split one source file. Returns its summary and its report rows.
    pub fn process_file(
        &mut self,
        source: &Path,
    ) -> Result<(FileReport, Vec<ReportRow>), FileError> {
        let pages = self.read_pages(source)?;
        let flags: Vec<bool> = pages.iter().map(|p| p.is_marker).collect();
        let segmentation = segment(&flags);

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output_dir = &self.config.output_dir;

        let mut outputs = Vec::new();
        let mut rows = Vec::new();

        match &segmentation {
            Segmentation::Empty => {
                info!("{}: every page is a marker, nothing to write", stem);
            }
            Segmentation::Whole(run) => {
                let assembly = copy_original(run, &pages, source, output_dir)?;
                outputs.extend(assembly.file_name);
                rows.extend(assembly.rows);
            }
            Segmentation::Split(runs) => {
                debug!("{}: {} runs", stem, runs.len());
                for run in runs {
                    let assembly =
                        assemble(run, &pages, &stem, output_dir, self.config.dpi, self.writer)?;
                    outputs.extend(assembly.file_name);
                    rows.extend(assembly.rows);
                }
            }
        }

        let file_report = FileReport {
            source: source.to_path_buf(),
            pages: pages.len(),
            marker_pages: flags.iter().filter(|&&m| m).count(),
            outputs,
            copied: matches!(segmentation, Segmentation::Whole(_)),
            rows: rows.len(),
        };
        Ok((file_report, rows))
    }

    /// Render, OCR and classify every page of `source`.
    fn read_pages(&mut self, source: &Path) -> Result<Vec<Page>, FileError> {
        let images = self.rasterizer.render_pages(source, self.config.dpi)?;

        let mut pages = Vec::with_capacity(images.len());
        for (index, image) in images.into_iter().enumerate() {
            let raw = recognize_or_empty(&mut *self.ocr, &image, index + 1);
            pages.push(Page::classify(index, image, &raw, &self.detector));
        }
        Ok(pages)
    }
}

/// Run a whole batch with the given collaborators.
///
/// Validates the directories first; configuration problems are returned
/// before any file is touched. After that only a failure to write the
/// report can make this return `Err`.
pub fn run_batch(
    config: &SplitConfig,
    rasterizer: &dyn Rasterizer,
    ocr: &mut dyn OcrEngine,
    writer: &dyn DocumentWriter,
) -> Result<BatchSummary, SplitError> {
    let start = Instant::now();
    let files = input::prepare(config)?;
    drive(config, &files, rasterizer, ocr, writer, start)
}

/// Split every PDF in `config.input_dir` using pdfium and Tesseract.
///
/// Runs inside `spawn_blocking`: both engines are blocking C libraries.
pub async fn split_directory(config: &SplitConfig) -> Result<BatchSummary, SplitError> {
    let start = Instant::now();
    info!("Validating {}", config.input_dir.display());
    let files = input::prepare(config)?;
    let config = config.clone();

    tokio::task::spawn_blocking(move || {
        let backend = PdfiumBackend::bind()?;
        let mut ocr = TesseractEngine::new(&config)?;
        drive(&config, &files, &backend, &mut ocr, &backend, start)
    })
    .await
    .map_err(|e| SplitError::Internal(format!("Batch task panicked: {}", e)))?
}

/// Synchronous wrapper around [`split_directory`].
///
/// Creates a temporary tokio runtime internally.
pub fn split_directory_sync(config: &SplitConfig) -> Result<BatchSummary, SplitError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SplitError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(split_directory(config))
}

fn drive(
    config: &SplitConfig,
    files: &[PathBuf],
    rasterizer: &dyn Rasterizer,
    ocr: &mut dyn OcrEngine,
    writer: &dyn DocumentWriter,
    start: Instant,
) -> Result<BatchSummary, SplitError> {
    info!("Running the OCR on {} files", files.len());
    let mut report = ReportWriter::new(config.report_path(), config.report_layout.clone());
    let (done, failed) = BatchDriver::new(config, rasterizer, ocr, writer).run(files, &mut report);

    let total_rows = report.rows().len();
    let report_path = report.finish()?;

    let summary = BatchSummary {
        files: done,
        failed,
        report_path,
        total_rows,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Batch complete: {}/{} files, {} rows, {}ms",
        summary.files.len(),
        files.len(),
        summary.total_rows,
        summary.duration_ms
    );
    Ok(summary)
}
