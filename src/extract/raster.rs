//! PDF page rasterization through the Poppler `pdftoppm` binary.

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;
use tracing::debug;

use crate::config::ExtractionSettings;

use super::error::ExtractError;

/// Render every page of a PDF into PNG files inside a scratch directory.
///
/// Returns the directory guard together with the page files in page order;
/// the files disappear when the guard is dropped. `pdftoppm` pads page
/// numbers in its output names, so a lexicographic sort is page order.
pub fn rasterize_pdf(
    pdf_bytes: &[u8],
    settings: &ExtractionSettings,
) -> Result<(TempDir, Vec<PathBuf>), ExtractError> {
    let scratch = tempfile::tempdir()?;
    let pdf_path = scratch.path().join("input.pdf");
    std::fs::write(&pdf_path, pdf_bytes)?;
    let prefix = scratch.path().join("page");

    let output = Command::new(&settings.pdftoppm_path)
        .arg("-r")
        .arg(settings.ocr_dpi.to_string())
        .arg("-png")
        .arg(&pdf_path)
        .arg(&prefix)
        .output()
        .map_err(|e| ExtractError::ToolMissing {
            tool: settings.pdftoppm_path.clone(),
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ExtractError::ToolFailed {
            tool: settings.pdftoppm_path.clone(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let mut pages: Vec<PathBuf> = std::fs::read_dir(scratch.path())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    pages.sort();

    if pages.is_empty() {
        return Err(ExtractError::ToolFailed {
            tool: settings.pdftoppm_path.clone(),
            detail: "no pages rendered".to_string(),
        });
    }

    debug!(pages = pages.len(), dpi = settings.ocr_dpi, "rasterized PDF for OCR");
    Ok((scratch, pages))
}
