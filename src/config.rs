//! Configuration types for a scan-splitting batch.
//!
//! All batch behaviour is controlled through [`SplitConfig`], built via its
//! [`SplitConfigBuilder`]. The marker definition and the cosmetic report
//! layout live in their own small structs so they can be tuned without
//! touching the directory settings.

use crate::error::SplitError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for one batch run.
///
/// # Example
/// ```rust
/// use pdf_scan_split::SplitConfig;
///
/// let config = SplitConfig::builder("scans/", "out/")
///     .dpi(300)
///     .languages("eng")
///     .build()
///     .unwrap();
/// assert_eq!(config.report_path(), std::path::Path::new("out/extracted_data.xlsx"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Directory holding the scanned source PDFs.
    pub input_dir: PathBuf,

    /// Directory receiving split documents, copied originals and the report.
    /// Created if absent.
    pub output_dir: PathBuf,

    /// Rasterisation resolution. Range: 72–600. Default: 200.
    ///
    /// Tesseract is tuned for 200–300 DPI scans; below that the marker code
    /// is often misread.
    pub dpi: u32,

    /// Tesseract language hints joined with `+`. Default: `eng+ara`.
    pub languages: String,

    /// Directory containing Tesseract `.traineddata` files.
    /// If None, Tesseract uses its compiled-in default (`TESSDATA_PREFIX`).
    pub tessdata_dir: Option<PathBuf>,

    /// Separator marker definition.
    pub marker: MarkerSpec,

    /// File name of the spreadsheet written into `output_dir`.
    pub report_name: String,

    /// Column widths and row heights of the report.
    pub report_layout: ReportLayout,
}

impl SplitConfig {
    /// Create a new builder for the given input and output directories.
    pub fn builder(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> SplitConfigBuilder {
        SplitConfigBuilder {
            config: Self {
                input_dir: input_dir.into(),
                output_dir: output_dir.into(),
                dpi: 200,
                languages: "eng+ara".to_string(),
                tessdata_dir: None,
                marker: MarkerSpec::default(),
                report_name: "extracted_data.xlsx".to_string(),
                report_layout: ReportLayout::default(),
            },
        }
    }

    /// Full path of the spreadsheet report.
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_name)
    }

    /// Whether split output lands next to the sources.
    pub fn writes_into_input(&self) -> bool {
        same_dir(&self.input_dir, &self.output_dir)
    }
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Builder for [`SplitConfig`].
#[derive(Debug)]
pub struct SplitConfigBuilder {
    config: SplitConfig,
}

impl SplitConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn languages(mut self, languages: impl Into<String>) -> Self {
        self.config.languages = languages.into();
        self
    }

    pub fn tessdata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.tessdata_dir = Some(dir.into());
        self
    }

    pub fn marker(mut self, marker: MarkerSpec) -> Self {
        self.config.marker = marker;
        self
    }

    pub fn marker_code(mut self, code: impl Into<String>) -> Self {
        self.config.marker.code = code.into();
        self
    }

    pub fn report_name(mut self, name: impl Into<String>) -> Self {
        self.config.report_name = name.into();
        self
    }

    pub fn report_layout(mut self, layout: ReportLayout) -> Self {
        self.config.report_layout = layout;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SplitConfig, SplitError> {
        let c = &self.config;
        if c.languages.trim().is_empty() {
            return Err(SplitError::InvalidConfig(
                "At least one OCR language is required".into(),
            ));
        }
        if c.report_name.trim().is_empty() {
            return Err(SplitError::InvalidConfig("Report name is empty".into()));
        }
        c.marker.validate()?;
        Ok(self.config)
    }
}

/// Definition of the separator marker printed on divider sheets.
///
/// A page is a marker when its recognised text length lies strictly between
/// `min_len_exclusive` and `max_len_exclusive` characters and it contains at
/// least one `window`-character slice of `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSpec {
    /// The full code printed on marker sheets.
    pub code: String,
    /// Length of the overlapping fragments matched against page text.
    pub window: usize,
    /// Page text must be longer than this many characters.
    pub min_len_exclusive: usize,
    /// Page text must be shorter than this many characters.
    pub max_len_exclusive: usize,
}

impl Default for MarkerSpec {
    fn default() -> Self {
        Self {
            code: "4444XUJY76TFG543ED67".to_string(),
            window: 6,
            min_len_exclusive: 10,
            max_len_exclusive: 25,
        }
    }
}

impl MarkerSpec {
    fn validate(&self) -> Result<(), SplitError> {
        let code_len = self.code.chars().count();
        if self.window == 0 || self.window > code_len {
            return Err(SplitError::InvalidConfig(format!(
                "Marker window must be 1–{}, got {}",
                code_len, self.window
            )));
        }
        if self.min_len_exclusive >= self.max_len_exclusive {
            return Err(SplitError::InvalidConfig(format!(
                "Marker length bounds are empty: ({}, {})",
                self.min_len_exclusive, self.max_len_exclusive
            )));
        }
        Ok(())
    }
}

/// Cosmetic sizing of the spreadsheet report. Has no effect on content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLayout {
    /// Width of both columns in pixels. Default: 300.
    pub column_width_px: u16,
    /// Height of every data row in points. Default: 200.
    pub row_height: f64,
    /// Height of the header row in points. Default: 25.
    pub header_height: f64,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            column_width_px: 300,
            row_height: 200.0,
            header_height: 25.0,
        }
    }
}
