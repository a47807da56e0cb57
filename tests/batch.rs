//! Batch-level integration tests.
//!
//! The collaborators that wrap C libraries (pdfium, Tesseract) are replaced
//! by fakes: the rasteriser knows each file's page count, the OCR engine
//! replays a script of page texts in processing order, and the writer drops
//! a small placeholder file per document. The report is the real xlsx and
//! is read back with calamine.
//!
//! The engine-backed smoke test at the bottom is gated behind
//! `SCANSPLIT_E2E` like the other pdfium/Tesseract tests.

use calamine::{open_workbook, Reader, Xlsx};
use image::DynamicImage;
use pdf_scan_split::{
    run_batch, split_directory, DocumentWriter, FileError, OcrEngine, OcrError, Rasterizer,
    SplitConfig, SplitError,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

const MARK: &str = "4444XUJY76TFG543ED67\n";

/// Page counts per file name; a missing name fails like a corrupt PDF.
struct FakeRasterizer {
    pages: HashMap<&'static str, usize>,
}

impl Rasterizer for FakeRasterizer {
    fn render_pages(&self, source: &Path, _dpi: u32) -> Result<Vec<DynamicImage>, FileError> {
        let name = source.file_name().unwrap().to_string_lossy();
        match self.pages.get(name.as_ref()) {
            Some(&n) => Ok((0..n)
                .map(|i| DynamicImage::new_rgb8(i as u32 + 1, 1))
                .collect()),
            None => Err(FileError::OpenFailed {
                path: source.to_path_buf(),
                detail: "not a PDF".into(),
            }),
        }
    }
}

/// Replays page texts in order, with Tesseract's trailing form feed;
/// `None` simulates an engine failure.
struct ScriptedOcr {
    script: VecDeque<Option<String>>,
}

impl ScriptedOcr {
    fn new(pages: &[Option<&str>]) -> Self {
        Self {
            script: pages.iter().map(|p| p.map(|t| format!("{t}\u{c}"))).collect(),
        }
    }
}

impl OcrEngine for ScriptedOcr {
    fn recognize(&mut self, _image: &DynamicImage) -> Result<String, OcrError> {
        match self.script.pop_front() {
            Some(Some(text)) => Ok(text),
            _ => Err(OcrError::Recognition("scripted failure".into())),
        }
    }
}

/// Writes a placeholder and remembers which page widths went where.
#[derive(Default)]
struct FileWriter {
    written: RefCell<Vec<(String, Vec<u32>)>>,
    fail_on: Option<&'static str>,
}

impl DocumentWriter for FileWriter {
    fn write_document(
        &self,
        images: &[&DynamicImage],
        _dpi: u32,
        target: &Path,
    ) -> Result<(), FileError> {
        let name = target.file_name().unwrap().to_string_lossy().into_owned();
        if self.fail_on == Some(name.as_str()) {
            return Err(FileError::WriteFailed {
                path: target.to_path_buf(),
                detail: "disk full".into(),
            });
        }
        std::fs::write(target, format!("{} pages", images.len())).unwrap();
        self.written
            .borrow_mut()
            .push((name, images.iter().map(|i| i.width()).collect()));
        Ok(())
    }
}

struct Fixture {
    input: TempDir,
    output: TempDir,
}

impl Fixture {
    fn new(files: &[&str]) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("pdf_scan_split=debug")
            .with_test_writer()
            .try_init();
        let input = TempDir::new().unwrap();
        for name in files {
            std::fs::write(input.path().join(name), format!("%PDF-1.4 {name}")).unwrap();
        }
        Self {
            input,
            output: TempDir::new().unwrap(),
        }
    }

    fn config(&self) -> SplitConfig {
        SplitConfig::builder(self.input.path(), self.output.path())
            .build()
            .unwrap()
    }

    fn out(&self, name: &str) -> PathBuf {
        self.output.path().join(name)
    }
}

fn read_report(path: &Path) -> Vec<(String, String)> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("report readable");
    let sheet = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range(&sheet).expect("first sheet");
    range
        .rows()
        .map(|r| (r[0].to_string(), r[1].to_string()))
        .collect()
}

fn pages(texts: &[&'static str]) -> Vec<Option<&'static str>> {
    texts.iter().map(|&t| Some(t)).collect()
}

// ── Splitting ────────────────────────────────────────────────────────────────

#[test]
fn splits_on_interior_marker() {
    let fx = Fixture::new(&["doc.pdf"]);
    let raster = FakeRasterizer {
        pages: HashMap::from([("doc.pdf", 6)]),
    };
    let mut ocr = ScriptedOcr::new(&pages(&["p0", "p1", "p2", MARK, "p4", "p5"]));
    let writer = FileWriter::default();

    let summary = run_batch(&fx.config(), &raster, &mut ocr, &writer).unwrap();

    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.files[0].outputs, vec!["doc-1.pdf", "doc-2.pdf"]);
    assert_eq!(summary.documents_written(), 2);
    assert_eq!(summary.total_rows, 5);

    let written = writer.written.borrow();
    assert_eq!(written[0], ("doc-1.pdf".to_string(), vec![1, 2, 3]));
    assert_eq!(written[1], ("doc-2.pdf".to_string(), vec![5, 6]));
    assert!(!fx.out("doc.pdf").exists(), "split source must not be copied");

    let rows = read_report(&summary.report_path);
    assert_eq!(
        rows,
        vec![
            ("File Name".into(), "Content".into()),
            ("doc-1.pdf".into(), "p0".into()),
            ("doc-1.pdf".into(), "p1".into()),
            ("doc-1.pdf".into(), "p2".into()),
            ("doc-2.pdf".into(), "p4".into()),
            ("doc-2.pdf".into(), "p5".into()),
        ]
    );
}

#[test]
fn adjacent_markers_skip_an_ordinal() {
    let fx = Fixture::new(&["a.pdf"]);
    let raster = FakeRasterizer {
        pages: HashMap::from([("a.pdf", 8)]),
    };
    let mut ocr = ScriptedOcr::new(&pages(&["0", "1", MARK, MARK, "4", "5", "6", "7"]));
    let writer = FileWriter::default();

    let summary = run_batch(&fx.config(), &raster, &mut ocr, &writer).unwrap();

    assert_eq!(summary.files[0].outputs, vec!["a-1.pdf", "a-3.pdf"]);
    assert!(fx.out("a-1.pdf").exists());
    assert!(!fx.out("a-2.pdf").exists());
    assert!(fx.out("a-3.pdf").exists());
    assert_eq!(summary.total_rows, 6);
}

// ── No-split policy ──────────────────────────────────────────────────────────

#[test]
fn unsplit_document_is_copied_verbatim() {
    let fx = Fixture::new(&["whole.pdf"]);
    let raster = FakeRasterizer {
        pages: HashMap::from([("whole.pdf", 3)]),
    };
    let mut ocr = ScriptedOcr::new(&pages(&["one", "two", "three"]));
    let writer = FileWriter::default();

    let summary = run_batch(&fx.config(), &raster, &mut ocr, &writer).unwrap();

    assert!(summary.files[0].copied);
    assert_eq!(summary.files_copied(), 1);
    assert!(writer.written.borrow().is_empty(), "no image rebuild");
    assert_eq!(
        std::fs::read(fx.out("whole.pdf")).unwrap(),
        std::fs::read(fx.input.path().join("whole.pdf")).unwrap()
    );

    let rows = read_report(&summary.report_path);
    let names: Vec<&str> = rows[1..].iter().map(|r| r.0.as_str()).collect();
    assert_eq!(names, vec!["whole.pdf"; 3]);
}

#[test]
fn edge_markers_only_copies_and_reports_content_pages() {
    let fx = Fixture::new(&["edges.pdf"]);
    let raster = FakeRasterizer {
        pages: HashMap::from([("edges.pdf", 6)]),
    };
    let mut ocr = ScriptedOcr::new(&pages(&[MARK, "a", "b", "c", "d", MARK]));
    let writer = FileWriter::default();

    let summary = run_batch(&fx.config(), &raster, &mut ocr, &writer).unwrap();

    assert!(summary.files[0].copied);
    assert_eq!(summary.files[0].marker_pages, 2);
    assert!(fx.out("edges.pdf").exists());
    let texts: Vec<String> = read_report(&summary.report_path)[1..]
        .iter()
        .map(|r| r.1.clone())
        .collect();
    assert_eq!(texts, vec!["a", "b", "c", "d"]);
}

#[test]
fn all_marker_document_produces_nothing() {
    let fx = Fixture::new(&["blank.pdf"]);
    let raster = FakeRasterizer {
        pages: HashMap::from([("blank.pdf", 3)]),
    };
    let mut ocr = ScriptedOcr::new(&pages(&[MARK, MARK, MARK]));
    let writer = FileWriter::default();

    let summary = run_batch(&fx.config(), &raster, &mut ocr, &writer).unwrap();

    assert!(summary.failed.is_empty());
    assert!(summary.files[0].outputs.is_empty());
    assert_eq!(summary.total_rows, 0);
    assert!(!fx.out("blank.pdf").exists());
    assert_eq!(read_report(&summary.report_path).len(), 1, "header only");
}

// ── Resilience ───────────────────────────────────────────────────────────────

#[test]
fn ocr_failure_becomes_empty_content_row() {
    let fx = Fixture::new(&["x.pdf"]);
    let raster = FakeRasterizer {
        pages: HashMap::from([("x.pdf", 4)]),
    };
    let mut ocr = ScriptedOcr::new(&[Some("a"), None, Some(MARK), Some("d")]);
    let writer = FileWriter::default();

    let summary = run_batch(&fx.config(), &raster, &mut ocr, &writer).unwrap();

    assert_eq!(summary.files[0].outputs, vec!["x-1.pdf", "x-2.pdf"]);
    assert_eq!(writer.written.borrow()[0].1, vec![1, 2]);
    let rows = read_report(&summary.report_path);
    assert_eq!(rows[2], ("x-1.pdf".into(), "".into()));
}

#[test]
fn failed_file_is_skipped_and_batch_continues() {
    let fx = Fixture::new(&["a.pdf", "broken.pdf", "c.pdf"]);
    let raster = FakeRasterizer {
        pages: HashMap::from([("a.pdf", 1), ("c.pdf", 2)]),
    };
    let mut ocr = ScriptedOcr::new(&pages(&["a0", "c0", "c1"]));
    let writer = FileWriter::default();

    let summary = run_batch(&fx.config(), &raster, &mut ocr, &writer).unwrap();

    assert_eq!(summary.files.len(), 2);
    assert_eq!(summary.failed.len(), 1);
    assert!(summary.failed[0].source.ends_with("broken.pdf"));
    assert!(matches!(summary.failed[0].error, FileError::OpenFailed { .. }));

    let names: Vec<String> = read_report(&summary.report_path)[1..]
        .iter()
        .map(|r| r.0.clone())
        .collect();
    assert_eq!(names, vec!["a.pdf", "c.pdf", "c.pdf"]);
}

#[test]
fn write_failure_drops_rows_but_keeps_earlier_documents() {
    let fx = Fixture::new(&["a.pdf", "b.pdf"]);
    let raster = FakeRasterizer {
        pages: HashMap::from([("a.pdf", 5), ("b.pdf", 1)]),
    };
    let mut ocr = ScriptedOcr::new(&pages(&["a0", MARK, "a2", MARK, "a4", "b0"]));
    let writer = FileWriter {
        fail_on: Some("a-2.pdf"),
        ..FileWriter::default()
    };

    let summary = run_batch(&fx.config(), &raster, &mut ocr, &writer).unwrap();

    assert_eq!(summary.failed.len(), 1);
    assert!(matches!(summary.failed[0].error, FileError::WriteFailed { .. }));
    assert!(fx.out("a-1.pdf").exists(), "earlier output stays on disk");
    let rows = read_report(&summary.report_path);
    assert_eq!(rows[1..].to_vec(), vec![("b.pdf".into(), "b0".into())]);
}

// ── Ordering across files ────────────────────────────────────────────────────

#[test]
fn rows_follow_file_then_ordinal_then_page_order() {
    let fx = Fixture::new(&["b.pdf", "a.pdf"]);
    let raster = FakeRasterizer {
        pages: HashMap::from([("a.pdf", 4), ("b.pdf", 3)]),
    };
    // a.pdf is processed first (name order)
    let mut ocr = ScriptedOcr::new(&pages(&["a0", MARK, "a2", "a3", "b0", MARK, "b2"]));
    let writer = FileWriter::default();

    let summary = run_batch(&fx.config(), &raster, &mut ocr, &writer).unwrap();

    let rows: Vec<(String, String)> = read_report(&summary.report_path)[1..].to_vec();
    let expected: Vec<(String, String)> = [
        ("a-1.pdf", "a0"),
        ("a-2.pdf", "a2"),
        ("a-2.pdf", "a3"),
        ("b-1.pdf", "b0"),
        ("b-2.pdf", "b2"),
    ]
    .iter()
    .map(|(n, t)| (n.to_string(), t.to_string()))
    .collect();
    assert_eq!(rows, expected);
}

// ── Configuration errors ─────────────────────────────────────────────────────

#[test]
fn empty_input_dir_is_fatal() {
    let fx = Fixture::new(&["notes.txt"]);
    let raster = FakeRasterizer {
        pages: HashMap::new(),
    };
    let mut ocr = ScriptedOcr::new(&[]);
    let writer = FileWriter::default();

    let err = run_batch(&fx.config(), &raster, &mut ocr, &writer).unwrap_err();
    assert!(matches!(err, SplitError::NoPdfFiles { .. }));
    assert!(!fx.out("extracted_data.xlsx").exists());
}

#[test]
fn split_directory_validates_before_binding_engines() {
    let out = TempDir::new().unwrap();
    let config = SplitConfig::builder("/definitely/not/a/dir", out.path())
        .build()
        .unwrap();
    let err = tokio_test::block_on(split_directory(&config)).unwrap_err();
    assert!(matches!(err, SplitError::InputDirNotFound { .. }), "got: {err}");
}

// ── Engine-backed smoke test ─────────────────────────────────────────────────

/// Runs the real pipeline over `SCANSPLIT_E2E_DIR` (default `./test_cases`).
#[tokio::test]
async fn e2e_real_engines() {
    if std::env::var("SCANSPLIT_E2E").is_err() {
        println!("SKIP — set SCANSPLIT_E2E=1 to run e2e tests");
        return;
    }
    let input = std::env::var("SCANSPLIT_E2E_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases"));
    if !input.is_dir() {
        println!("SKIP — no input directory at {}", input.display());
        return;
    }
    let out = TempDir::new().unwrap();
    let config = SplitConfig::builder(&input, out.path()).build().unwrap();

    let summary = split_directory(&config).await.expect("batch should run");
    assert!(summary.report_path.exists());
    println!("{}", serde_json::to_string_pretty(&summary).unwrap());
}
