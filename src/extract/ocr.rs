//! Character recognition through the external `tesseract` binary.

use image::DynamicImage;
use std::process::Command;
use tracing::debug;

use crate::config::ExtractionSettings;

use super::error::ExtractError;
use super::preprocess;

/// Page segmentation mode 6: assume a single uniform block of text.
const PSM_UNIFORM_BLOCK: &str = "6";

/// Run OCR over one image and return the raw recognized text.
///
/// The image is conditioned first (see [`preprocess::prepare_for_ocr`]) and
/// written to a scratch PNG, since the engine reads files. In
/// preserve-layout mode the engine is asked to keep inter-word spacing.
pub fn recognize(img: &DynamicImage, settings: &ExtractionSettings) -> Result<String, ExtractError> {
    let conditioned = preprocess::prepare_for_ocr(img);

    let scratch = tempfile::tempdir()?;
    let png_path = scratch.path().join("ocr_input.png");
    conditioned.save(&png_path)?;

    let mut cmd = Command::new(&settings.tesseract_path);
    cmd.arg(&png_path)
        .arg("stdout")
        .arg("-l")
        .arg(&settings.ocr_language)
        .arg("--oem")
        .arg("3")
        .arg("--psm")
        .arg(PSM_UNIFORM_BLOCK);
    if settings.preserve_layout {
        cmd.arg("-c").arg("preserve_interword_spaces=1");
    }

    let output = cmd.output().map_err(|e| ExtractError::ToolMissing {
        tool: settings.tesseract_path.clone(),
        detail: e.to_string(),
    })?;

    if !output.status.success() {
        return Err(ExtractError::ToolFailed {
            tool: settings.tesseract_path.clone(),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    debug!(chars = text.len(), "OCR pass finished");
    Ok(text)
}
