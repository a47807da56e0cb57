//! Page classification: decide whether a page is a separator marker.
//!
//! Divider sheets carry a short printed code and nothing else. Matching any
//! overlapping fragment of the code, instead of the full string, survives
//! the odd misread character, while the tight length window keeps ordinary
//! text pages from matching by accident.

use crate::config::MarkerSpec;
use image::DynamicImage;
use std::collections::HashSet;
use tracing::debug;

/// One page of a source document after OCR and classification.
///
/// Marker pages keep their text for diagnostics but drop the raster: they
/// never reach an output document.
#[derive(Debug, Clone)]
pub struct Page {
    /// 0-based position in the source document.
    pub index: usize,
    /// Rendered raster; `None` for marker pages.
    pub image: Option<DynamicImage>,
    /// Recognised text as reported (trailing page break removed).
    pub text: String,
    /// Classification result.
    pub is_marker: bool,
}

impl Page {
    /// Classify a rendered page from its raw OCR output.
    pub fn classify(
        index: usize,
        image: DynamicImage,
        raw_text: &str,
        detector: &MarkerDetector,
    ) -> Self {
        let is_marker = detector.is_marker(raw_text);
        debug!(
            "Page {} → {} ({} chars)",
            index + 1,
            if is_marker { "marker" } else { "content" },
            raw_text.chars().count()
        );
        Self {
            index,
            image: if is_marker { None } else { Some(image) },
            text: strip_page_break(raw_text).to_string(),
            is_marker,
        }
    }
}

/// Tesseract terminates each page with a form feed; it is not page content.
fn strip_page_break(text: &str) -> &str {
    text.strip_suffix('\u{c}').unwrap_or(text)
}

/// Classifies recognised page text as marker or content.
#[derive(Debug, Clone)]
pub struct MarkerDetector {
    fragments: Vec<String>,
    min_len_exclusive: usize,
    max_len_exclusive: usize,
}

impl MarkerDetector {
    /// Precompute every `window`-character slice of the marker code.
    pub fn new(spec: &MarkerSpec) -> Self {
        let chars: Vec<char> = spec.code.chars().collect();
        let mut fragments: Vec<String> = if spec.window == 0 {
            Vec::new()
        } else {
            chars
                .windows(spec.window)
                .map(|w| w.iter().collect())
                .collect()
        };
        let mut seen = HashSet::new();
        fragments.retain(|f| seen.insert(f.clone()));

        Self {
            fragments,
            min_len_exclusive: spec.min_len_exclusive,
            max_len_exclusive: spec.max_len_exclusive,
        }
    }

    /// `true` if `text` is the OCR output of a marker page.
    ///
    /// Length is counted in characters, not bytes. Empty text is never a
    /// marker.
    pub fn is_marker(&self, text: &str) -> bool {
        let len = text.chars().count();
        len > self.min_len_exclusive
            && len < self.max_len_exclusive
            && self.fragments.iter().any(|f| text.contains(f.as_str()))
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }
}

impl Default for MarkerDetector {
    fn default() -> Self {
        Self::new(&MarkerSpec::default())
    }
}
