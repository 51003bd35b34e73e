//! The text-extraction pipeline: accepted upload kinds, the per-file
//! outcome type, and the `Extractor` entry point that dispatches to the
//! PDF and image strategies.

mod error;
mod image;
mod normalize;
mod ocr;
mod pdf;
mod preprocess;
mod raster;

use tracing::warn;

use crate::config::ExtractionSettings;

pub use error::ExtractError;

/// Returned when every method, including OCR, came back empty.
pub const NO_TEXT_SENTINEL: &str = "No text found (even with OCR).";

/// Upload kinds the pipeline accepts, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    /// Map a filename to its declared kind. `None` means the extension is
    /// unsupported (or missing) and the file must be rejected.
    pub fn from_filename(filename: &str) -> Option<DocumentKind> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "png" | "jpg" | "jpeg" => Some(DocumentKind::Image),
            _ => None,
        }
    }

    fn noun(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Image => "image",
        }
    }
}

/// What extraction produced for one file.
///
/// `NoText` is not a failure: every method ran and the document simply has
/// no recognizable text. `Failed` carries the reason a tool or library
/// broke. Callers that want the old plain-string contract use
/// [`render_text`](ExtractionOutcome::render_text), which is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    Extracted { text: String },
    NoText,
    Failed { reason: String },
}

impl ExtractionOutcome {
    pub fn is_extracted(&self) -> bool {
        matches!(self, ExtractionOutcome::Extracted { .. })
    }

    /// The extracted text, when there is any.
    pub fn text(&self) -> Option<&str> {
        match self {
            ExtractionOutcome::Extracted { text } => Some(text),
            _ => None,
        }
    }

    /// Render the outcome as display text: the extracted text itself, the
    /// no-text sentinel, or a descriptive error line.
    pub fn render_text(&self, kind: DocumentKind) -> String {
        match self {
            ExtractionOutcome::Extracted { text } => text.clone(),
            ExtractionOutcome::NoText => NO_TEXT_SENTINEL.to_string(),
            ExtractionOutcome::Failed { reason } => {
                format!("Error extracting {} text: {}", kind.noun(), reason)
            }
        }
    }
}

/// Extraction entry point. Holds the read-only settings shared by every
/// request; construction happens once at startup.
#[derive(Debug, Clone)]
pub struct Extractor {
    settings: ExtractionSettings,
}

impl Extractor {
    pub fn new(settings: ExtractionSettings) -> Self {
        Self { settings }
    }

    /// Extract text from one file. Never fails: pipeline errors become
    /// `ExtractionOutcome::Failed`.
    pub fn extract(&self, kind: DocumentKind, bytes: &[u8]) -> ExtractionOutcome {
        let result = match kind {
            DocumentKind::Pdf => pdf::extract(bytes, &self.settings),
            DocumentKind::Image => image::extract(bytes, &self.settings),
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(kind = kind.noun(), error = %e, "extraction failed");
                ExtractionOutcome::Failed { reason: e.to_string() }
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
