//! Text extraction for uploaded images: a single OCR pass.
//!
//! Unlike PDFs there is no digital text layer to prefer, so the image goes
//! straight through conditioning and recognition.

use crate::config::ExtractionSettings;

use super::error::ExtractError;
use super::normalize::normalize;
use super::{ExtractionOutcome, ocr};

pub fn extract(
    bytes: &[u8],
    settings: &ExtractionSettings,
) -> Result<ExtractionOutcome, ExtractError> {
    let img = image::load_from_memory(bytes)?;
    let text = ocr::recognize(&img, settings)?;
    let normalized = normalize(text.trim(), settings.preserve_layout);

    if normalized.is_empty() {
        Ok(ExtractionOutcome::NoText)
    } else {
        Ok(ExtractionOutcome::Extracted { text: normalized })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
