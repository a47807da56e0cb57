//! Batch report: one spreadsheet row per content page, across all files.
//!
//! Row order is the only link between a document name and its page texts
//! (a three-page document yields three rows with the same name), so rows are
//! kept exactly in insertion order and never deduplicated. The workbook is
//! written once, when the writer is consumed by [`ReportWriter::finish`].

use crate::config::ReportLayout;
use crate::error::SplitError;
use rust_xlsxwriter::{Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Header cells of the two report columns.
pub const HEADER: [&str; 2] = ["File Name", "Content"];

/// Largest string an xlsx cell accepts.
const MAX_CELL_CHARS: usize = 32_767;

/// One report line: an output document name and the text of one of its pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub document: String,
    pub text: String,
}

impl ReportRow {
    pub fn new(document: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            text: text.into(),
        }
    }
}

/// Accumulates report rows and writes them as an xlsx workbook.
#[derive(Debug)]
pub struct ReportWriter {
    path: PathBuf,
    layout: ReportLayout,
    rows: Vec<ReportRow>,
    /// Next free worksheet row; row 0 is the header.
    cursor: u32,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>, layout: ReportLayout) -> Self {
        Self {
            path: path.into(),
            layout,
            rows: Vec::new(),
            cursor: 1,
        }
    }

    /// Append rows in order and return the new cursor.
    pub fn append_rows(&mut self, rows: impl IntoIterator<Item = ReportRow>) -> u32 {
        for row in rows {
            self.rows.push(row);
            self.cursor += 1;
        }
        self.cursor
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the workbook and return its path.
    ///
    /// The workbook goes to a sibling temp file first and is renamed into
    /// place, so an interrupted save never leaves a truncated report behind.
    pub fn finish(self) -> Result<PathBuf, SplitError> {
        let report_err = |detail: String| SplitError::ReportWriteFailed {
            path: self.path.clone(),
            detail,
        };

        let mut workbook = self.build_workbook().map_err(|e| report_err(e.to_string()))?;

        let tmp_path = self.path.with_extension("xlsx.tmp");
        workbook
            .save(&tmp_path)
            .map_err(|e| report_err(e.to_string()))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| report_err(e.to_string()))?;

        info!(
            "Report written: {} ({} rows)",
            self.path.display(),
            self.rows.len()
        );
        Ok(self.path)
    }

    fn build_workbook(&self) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        sheet.set_column_width_pixels(0, self.layout.column_width_px)?;
        sheet.set_column_width_pixels(1, self.layout.column_width_px)?;
        sheet.set_row_height(0, self.layout.header_height)?;
        sheet.write_string(0, 0, HEADER[0])?;
        sheet.write_string(0, 1, HEADER[1])?;

        for (row, entry) in (1u32..).zip(&self.rows) {
            sheet.set_row_height(row, self.layout.row_height)?;
            sheet.write_string(row, 0, &entry.document)?;
            sheet.write_string(row, 1, cell_text(&entry.text, row))?;
        }

        Ok(workbook)
    }
}

fn cell_text(text: &str, row: u32) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((cut, _)) => {
            warn!("Report row {} truncated to {} chars", row, MAX_CELL_CHARS);
            &text[..cut]
        }
        None => text,
    }
}
