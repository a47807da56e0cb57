//! OCR: rasterised page → recognised text via Tesseract.
//!
//! The engine is held for the whole batch: initialising Tesseract loads the
//! traineddata for every configured language, which costs far more than
//! recognising a page.

use crate::config::SplitConfig;
use crate::error::{OcrError, SplitError};
use image::DynamicImage;
use leptess::LepTess;
use std::io::Cursor;
use tracing::{debug, warn};

/// Recognises the text on one rendered page.
pub trait OcrEngine {
    fn recognize(&mut self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// Run `engine` on `image`, substituting empty text on failure.
///
/// Empty text never satisfies the marker length window, so a failed page is
/// always treated as content.
pub fn recognize_or_empty(engine: &mut dyn OcrEngine, image: &DynamicImage, page: usize) -> String {
    match engine.recognize(image) {
        Ok(text) => {
            debug!("OCR page {} → {} chars", page, text.chars().count());
            text
        }
        Err(e) => {
            warn!("OCR failed on page {}: {}; using empty text", page, e);
            String::new()
        }
    }
}

/// Tesseract engine via leptess.
pub struct TesseractEngine {
    tess: LepTess,
    dpi: i32,
}

impl TesseractEngine {
    /// Initialise Tesseract with the configured languages and data path.
    pub fn new(config: &SplitConfig) -> Result<Self, SplitError> {
        let datapath = config
            .tessdata_dir
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let tess = LepTess::new(datapath.as_deref(), &config.languages).map_err(|e| {
            SplitError::OcrInitFailed {
                languages: config.languages.clone(),
                detail: format!("{:?}", e),
            }
        })?;

        debug!("Tesseract ready ({})", config.languages);
        Ok(Self {
            tess,
            dpi: config.dpi as i32,
        })
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&mut self, image: &DynamicImage) -> Result<String, OcrError> {
        // leptess decodes from an encoded buffer
        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|e| OcrError::Image(e.to_string()))?;

        self.tess
            .set_image_from_mem(png.get_ref())
            .map_err(|e| OcrError::Image(format!("{:?}", e)))?;
        self.tess.set_source_resolution(self.dpi);

        self.tess
            .get_utf8_text()
            .map_err(|e| OcrError::Recognition(e.to_string()))
    }
}
