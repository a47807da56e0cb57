//! Input discovery: validate the directories and list the source PDFs.
//!
//! Everything here runs before the first page is rendered, so every error
//! it returns is fatal and leaves the output directory untouched (apart
//! from creating it).

use crate::config::SplitConfig;
use crate::error::SplitError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Validate `config`'s directories and return the PDFs to process.
///
/// Creates the output directory if absent. Files are returned sorted by
/// name so a batch is reproducible across platforms.
pub fn prepare(config: &SplitConfig) -> Result<Vec<PathBuf>, SplitError> {
    let input = &config.input_dir;
    if !input.exists() {
        return Err(SplitError::InputDirNotFound {
            path: input.clone(),
        });
    }
    if !input.is_dir() {
        return Err(SplitError::InputNotADirectory {
            path: input.clone(),
        });
    }

    ensure_output_dir(&config.output_dir)?;

    if config.writes_into_input() {
        warn!(
            "Input and output directory are the same: '{}'",
            input.display()
        );
    }

    let files = list_pdfs(input)?;
    if files.is_empty() {
        return Err(SplitError::NoPdfFiles {
            path: input.clone(),
        });
    }

    info!("Found {} PDF files in {}", files.len(), input.display());
    Ok(files)
}

/// `true` for a `.pdf` extension in any letter case.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn ensure_output_dir(path: &Path) -> Result<(), SplitError> {
    if path.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|e| SplitError::OutputDirCreate {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!("Created output directory {}", path.display());
    Ok(())
}

fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, SplitError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        SplitError::Internal(format!("Cannot list '{}': {}", dir.display(), e))
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry_path(entry, dir))
        .filter(|p| p.is_file() && is_pdf(p))
        .collect();
    files.sort();
    Ok(files)
}

fn entry_path(entry: std::io::Result<std::fs::DirEntry>, dir: &Path) -> Option<PathBuf> {
    match entry {
        Ok(e) => Some(e.path()),
        Err(e) => {
            warn!("Skipping unreadable entry in '{}': {}", dir.display(), e);
            None
        }
    }
}
