use thiserror::Error;

/// Failures inside the extraction pipeline.
///
/// These never cross the strategy boundary: `Extractor::extract` converts
/// them into `ExtractionOutcome::Failed` so callers always receive data.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("could not open PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF text layer unreadable: {0}")]
    PdfText(String),

    #[error("could not run {tool}: {detail}; is it installed?")]
    ToolMissing { tool: String, detail: String },

    #[error("{tool} failed: {detail}")]
    ToolFailed { tool: String, detail: String },
}
