//! CLI binary for pdf-scan-split.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `SplitConfig` and prints the batch summary.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_scan_split::{split_directory, BatchSummary, MarkerSpec, ReportLayout, SplitConfig};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Split every scan in ./scans into ./out
  scansplit scans out

  # English only, higher resolution
  scansplit --lang eng --dpi 300 scans out

  # Custom divider code and report name
  scansplit --marker-code 9911ABCD22EF --report-name batch.xlsx scans out

  # Machine-readable summary
  scansplit --json scans out > summary.json

OUTPUT:
  out/<name>-<n>.pdf        one file per document found in <name>.pdf
  out/<name>.pdf            scans without a divider page, copied unchanged
  out/extracted_data.xlsx   "File Name" / "Content" row for every page

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory)
  TESSDATA_PREFIX   Tesseract traineddata directory
  RUST_LOG          Override log filter (e.g. pdf_scan_split=debug)
"#;

/// Split scanned PDFs on separator pages and export their OCR text.
#[derive(Parser, Debug)]
#[command(
    name = "scansplit",
    version,
    about = "Split scanned PDFs on separator pages and export their OCR text",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the scanned PDF files.
    input: PathBuf,

    /// Directory for split documents and the report (created if missing).
    output: PathBuf,

    /// Rendering DPI (72–600).
    #[arg(long, env = "SCANSPLIT_DPI", default_value_t = 200,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Tesseract languages, joined with '+'.
    #[arg(long = "lang", env = "SCANSPLIT_LANG", default_value = "eng+ara")]
    languages: String,

    /// Tesseract traineddata directory.
    #[arg(long, env = "SCANSPLIT_TESSDATA")]
    tessdata: Option<PathBuf>,

    /// Code printed on separator sheets.
    #[arg(long, env = "SCANSPLIT_MARKER_CODE")]
    marker_code: Option<String>,

    /// Length of the code fragments matched against page text.
    #[arg(long, env = "SCANSPLIT_MARKER_WINDOW", default_value_t = 6)]
    marker_window: usize,

    /// Marker pages have more OCR characters than this.
    #[arg(long, env = "SCANSPLIT_MARKER_MIN_LEN", default_value_t = 10)]
    marker_min_len: usize,

    /// Marker pages have fewer OCR characters than this.
    #[arg(long, env = "SCANSPLIT_MARKER_MAX_LEN", default_value_t = 25)]
    marker_max_len: usize,

    /// Report file name inside the output directory.
    #[arg(long, env = "SCANSPLIT_REPORT", default_value = "extracted_data.xlsx")]
    report_name: String,

    /// Report column width in pixels.
    #[arg(long, env = "SCANSPLIT_COLUMN_WIDTH", default_value_t = 300)]
    column_width: u16,

    /// Report data row height in points.
    #[arg(long, env = "SCANSPLIT_ROW_HEIGHT", default_value_t = 200.0)]
    row_height: f64,

    /// Report header row height in points.
    #[arg(long, env = "SCANSPLIT_HEADER_HEIGHT", default_value_t = 25.0)]
    header_height: f64,

    /// Print the batch summary as JSON.
    #[arg(long, env = "SCANSPLIT_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SCANSPLIT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SCANSPLIT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || cli.json {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;

    // ── Run batch ────────────────────────────────────────────────────────
    let summary = split_directory(&config).await.context("Batch failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        print_summary(&summary);
        println!("Your data is ready in {}", cli.output.display());
    }

    Ok(())
}

/// Map CLI args to `SplitConfig`.
fn build_config(cli: &Cli) -> Result<SplitConfig> {
    let marker = MarkerSpec {
        code: cli
            .marker_code
            .clone()
            .unwrap_or_else(|| MarkerSpec::default().code),
        window: cli.marker_window,
        min_len_exclusive: cli.marker_min_len,
        max_len_exclusive: cli.marker_max_len,
    };

    let mut builder = SplitConfig::builder(&cli.input, &cli.output)
        .dpi(cli.dpi)
        .languages(&cli.languages)
        .marker(marker)
        .report_name(&cli.report_name)
        .report_layout(ReportLayout {
            column_width_px: cli.column_width,
            row_height: cli.row_height,
            header_height: cli.header_height,
        });

    if let Some(ref dir) = cli.tessdata {
        builder = builder.tessdata_dir(dir);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(summary: &BatchSummary) {
    for file in &summary.files {
        let name = file
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let detail = if file.copied {
            "copied unchanged".to_string()
        } else {
            format!("{} documents", file.outputs.len())
        };
        eprintln!(
            "  {} {:<32} {:>3} pages  {}",
            green("✓"),
            name,
            file.pages,
            detail
        );
    }
    for failed in &summary.failed {
        eprintln!(
            "  {} {}  {}",
            red("✗"),
            failed.source.display(),
            red(&failed.error.to_string())
        );
    }
    eprintln!(
        "{} {} files, {} split documents, {} copied, {} rows  →  {}",
        if summary.failed.is_empty() {
            green("✔")
        } else {
            red("⚠")
        },
        summary.files.len() + summary.failed.len(),
        summary.documents_written(),
        summary.files_copied(),
        summary.total_rows,
        bold(&summary.report_path.display().to_string()),
    );
}
