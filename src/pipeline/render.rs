//! PDF rasterisation: render every page of a source scan via pdfium.
//!
//! Scans are image-only PDFs, so the only way to get at their text is to
//! render each page back to a bitmap and run OCR on it. Rendering is
//! driven by DPI (not a pixel cap) because Tesseract accuracy depends on the
//! physical resolution of the glyphs.

use crate::error::{FileError, SplitError};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Renders the pages of a source document.
pub trait Rasterizer {
    /// Render every page of `source` at `dpi`, in page order.
    fn render_pages(&self, source: &Path, dpi: u32) -> Result<Vec<DynamicImage>, FileError>;
}

/// pdfium-backed rasteriser and document writer.
///
/// One instance is bound per batch and reused for every file.
pub struct PdfiumBackend {
    pub(crate) pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind to pdfium.
    ///
    /// Resolution order: `PDFIUM_LIB_PATH` (file or directory), the current
    /// directory, then the system library search path.
    pub fn bind() -> Result<Self, SplitError> {
        let bindings = match std::env::var("PDFIUM_LIB_PATH") {
            Ok(p) if !p.is_empty() => {
                let path = PathBuf::from(p);
                let lib = if path.is_dir() {
                    Pdfium::pdfium_platform_library_name_at_path(&path)
                } else {
                    path
                };
                Pdfium::bind_to_library(lib)
            }
            _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| SplitError::PdfiumBindingFailed(format!("{:?}", e)))?;

        debug!("pdfium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl Rasterizer for PdfiumBackend {
    fn render_pages(&self, source: &Path, dpi: u32) -> Result<Vec<DynamicImage>, FileError> {
        let document =
            self.pdfium
                .load_pdf_from_file(source, None)
                .map_err(|e| FileError::OpenFailed {
                    path: source.to_path_buf(),
                    detail: format!("{:?}", e),
                })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("{}: {} pages", source.display(), total_pages);

        let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

        let mut images = Vec::with_capacity(total_pages);
        for (idx, page) in pages.iter().enumerate() {
            let bitmap =
                page.render_with_config(&render_config)
                    .map_err(|e| FileError::RenderFailed {
                        page: idx + 1,
                        detail: format!("{:?}", e),
                    })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );
            images.push(image);
        }

        Ok(images)
    }
}
