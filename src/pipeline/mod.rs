//! Pipeline stages for splitting one scanned PDF.
//!
//! Each submodule implements exactly one step. The three stages that touch
//! a C library (render, OCR, document writing) sit behind a trait so the
//! pure stages in between can be tested without pdfium or Tesseract.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ ocr ──▶ classify ──▶ segment ──▶ assemble
//! (dir)     (pdfium)  (tess)   (marker?)    (runs)      (pdf / copy)
//! ```
//!
//! 1. [`input`]    — validate directories and list the source PDFs
//! 2. [`render`]   — rasterise every page at the configured DPI
//! 3. [`ocr`]      — recognise page text; failures become empty text
//! 4. [`classify`] — flag separator pages by their printed code
//! 5. [`segment`]  — split the page sequence into contiguous runs
//! 6. [`assemble`] — write one PDF per run, or copy an unsplit source

pub mod assemble;
pub mod classify;
pub mod input;
pub mod ocr;
pub mod render;
pub mod segment;
