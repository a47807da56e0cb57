//! Document assembly: turn one run into an output PDF plus report rows.
//!
//! Split documents are rebuilt from the page rasters, one image per page.
//! A document that is not split at all is copied byte-for-byte instead, so
//! an unsplit scan loses no fidelity. Both paths report the same rows: one
//! per content page, in page order.

use crate::error::FileError;
use crate::pipeline::classify::Page;
use crate::pipeline::render::PdfiumBackend;
use crate::pipeline::segment::Run;
use crate::report::ReportRow;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Writes an ordered set of page images as one PDF.
pub trait DocumentWriter {
    /// Write `images` as consecutive pages of `target`. Each page is sized so
    /// the image renders at `dpi`.
    fn write_document(
        &self,
        images: &[&DynamicImage],
        dpi: u32,
        target: &Path,
    ) -> Result<(), FileError>;
}

/// What one run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    /// File written to the output directory, if any.
    pub file_name: Option<String>,
    /// Report rows for the run, in page order.
    pub rows: Vec<ReportRow>,
}

/// Output file name for a run: `{stem}-{ordinal}.pdf`.
pub fn output_name(stem: &str, ordinal: usize) -> String {
    format!("{stem}-{ordinal}.pdf")
}

/// Build the output document for `run`.
///
/// Marker pages inside the run (a trimmed first or last page) are skipped.
/// A run without content pages writes nothing and yields no rows.
pub fn assemble(
    run: &Run,
    pages: &[Page],
    stem: &str,
    output_dir: &Path,
    dpi: u32,
    writer: &dyn DocumentWriter,
) -> Result<Assembly, FileError> {
    let content: Vec<&Page> = content_pages(run, pages);
    if content.is_empty() {
        debug!("Run {} of '{}' is empty, nothing written", run.ordinal, stem);
        return Ok(Assembly::default());
    }

    let name = output_name(stem, run.ordinal);
    let images: Vec<&DynamicImage> = content.iter().filter_map(|p| p.image.as_ref()).collect();
    writer.write_document(&images, dpi, &output_dir.join(&name))?;
    info!("Wrote {} ({} pages)", name, images.len());

    Ok(Assembly {
        rows: rows_for(&name, &content),
        file_name: Some(name),
    })
}

/// Copy an unsplit source verbatim into `output_dir` under its own name.
///
/// Rows carry the original file name and cover the content pages of `run`.
pub fn copy_original(
    run: &Run,
    pages: &[Page],
    source: &Path,
    output_dir: &Path,
) -> Result<Assembly, FileError> {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let target = output_dir.join(&file_name);

    if !same_file(source, &target) {
        std::fs::copy(source, &target).map_err(|e| FileError::CopyFailed {
            from: source.to_path_buf(),
            to: target.clone(),
            detail: e.to_string(),
        })?;
    }
    info!("Copied {} unchanged", file_name);

    let content = content_pages(run, pages);
    Ok(Assembly {
        rows: rows_for(&file_name, &content),
        file_name: Some(file_name),
    })
}

fn content_pages<'p>(run: &Run, pages: &'p [Page]) -> Vec<&'p Page> {
    pages
        .iter()
        .filter(|p| run.contains(p.index) && !p.is_marker)
        .collect()
}

fn rows_for(name: &str, pages: &[&Page]) -> Vec<ReportRow> {
    pages
        .iter()
        .map(|p| ReportRow::new(name, p.text.clone()))
        .collect()
}

/// Copying a file onto itself truncates it on some platforms.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl DocumentWriter for PdfiumBackend {
    fn write_document(
        &self,
        images: &[&DynamicImage],
        dpi: u32,
        target: &Path,
    ) -> Result<(), FileError> {
        let write_err = |e: PdfiumError| FileError::WriteFailed {
            path: target.to_path_buf(),
            detail: format!("{:?}", e),
        };

        let mut document = self.pdfium.create_new_pdf().map_err(write_err)?;
        let scale = 72.0 / dpi as f32;

        for image in images {
            let width = PdfPoints::new(image.width() as f32 * scale);
            let height = PdfPoints::new(image.height() as f32 * scale);

            let mut page = document
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::Custom(width, height))
                .map_err(write_err)?;

            page.objects_mut()
                .create_image_object(PdfPoints::ZERO, PdfPoints::ZERO, image, Some(width), Some(height))
                .map_err(write_err)?;
        }

        document.save_to_file(target).map_err(write_err)
    }
}
