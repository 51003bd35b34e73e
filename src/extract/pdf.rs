//! Best-effort PDF text extraction.
//!
//! Three methods are tried in order, stopping at the first acceptable
//! result: a layout-aware walk of each page's content stream, a
//! general-purpose whole-document extraction, and finally rasterization
//! plus OCR for scanned documents. Results at or below the configured
//! minimum length are treated as extraction noise (a page number, a stray
//! glyph) and trigger the next method rather than an early return.

use lopdf::content::Content;
use lopdf::{Document, Object};
use tracing::debug;

use crate::config::ExtractionSettings;

use super::error::ExtractError;
use super::normalize::normalize;
use super::{ExtractionOutcome, ocr, raster};

pub fn extract(
    bytes: &[u8],
    settings: &ExtractionSettings,
) -> Result<ExtractionOutcome, ExtractError> {
    let layout_text = extract_page_layout(bytes, settings)?;
    if is_sufficient(&layout_text, settings) {
        return Ok(ExtractionOutcome::Extracted { text: layout_text });
    }
    debug!(chars = layout_text.chars().count(), "layout extraction insufficient, trying whole-document pass");

    let document_text = extract_whole_document(bytes, settings)?;
    if is_sufficient(&document_text, settings) {
        return Ok(ExtractionOutcome::Extracted { text: document_text });
    }
    debug!(chars = document_text.chars().count(), "no usable text layer, falling back to OCR");

    let ocr_text = ocr_scanned_pages(bytes, settings)?;
    if ocr_text.is_empty() {
        Ok(ExtractionOutcome::NoText)
    } else {
        Ok(ExtractionOutcome::Extracted { text: ocr_text })
    }
}

/// Short results are noise, not content.
fn is_sufficient(text: &str, settings: &ExtractionSettings) -> bool {
    text.chars().count() > settings.min_text_len
}

/// Method A: walk each page's content stream in page order, collecting the
/// text-showing operators and starting a new line at each text-positioning
/// operator. Pages that cannot be read are skipped, not fatal.
fn extract_page_layout(bytes: &[u8], settings: &ExtractionSettings) -> Result<String, ExtractError> {
    let mut doc = Document::load_mem(bytes)?;
    if doc.is_encrypted() {
        // An empty user password covers most "protected" documents.
        doc.decrypt("")?;
    }

    let mut page_texts: Vec<String> = Vec::new();
    for (page_num, object_id) in doc.get_pages() {
        let raw = match page_text(&doc, object_id) {
            Ok(text) => text,
            Err(e) => {
                debug!(page = page_num, error = %e, "skipping unreadable page");
                continue;
            }
        };
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            page_texts.push(trimmed.to_string());
        }
    }

    Ok(normalize(&page_texts.join("\n\n"), settings.preserve_layout))
}

fn page_text(doc: &Document, object_id: lopdf::ObjectId) -> Result<String, lopdf::Error> {
    let content_bytes = doc.get_page_content(object_id)?;
    let content = Content::decode(&content_bytes)?;

    let mut out = String::new();
    for op in &content.operations {
        match op.operator.as_ref() {
            "Tj" => {
                if let Some(operand) = op.operands.first() {
                    push_string_operand(operand, &mut out);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        push_string_operand(item, &mut out);
                    }
                }
            }
            // Text positioning starts a new line in reading order.
            "Td" | "TD" | "Tm" | "T*" => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Non-UTF-8 string operands are font-encoded glyph indexes; emitting their
/// bytes produces gibberish, so they are discarded.
fn push_string_operand(object: &Object, out: &mut String) {
    if let Object::String(bytes, _) = object {
        if let Ok(s) = std::str::from_utf8(bytes) {
            out.push_str(s);
        }
    }
}

/// Method B: whole-document extraction through `pdf_extract`.
fn extract_whole_document(
    bytes: &[u8],
    settings: &ExtractionSettings,
) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractError::PdfText(e.to_string()))?;
    Ok(normalize(&text, settings.preserve_layout))
}

/// OCR fallback for scanned documents: rasterize every page, recognize each
/// one, and join the non-empty page texts with a blank line.
fn ocr_scanned_pages(bytes: &[u8], settings: &ExtractionSettings) -> Result<String, ExtractError> {
    let (scratch, pages) = raster::rasterize_pdf(bytes, settings)?;

    let mut page_texts: Vec<String> = Vec::new();
    for page in &pages {
        let img = image::open(page)?;
        let text = ocr::recognize(&img, settings)?;
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            page_texts.push(trimmed.to_string());
        }
    }
    drop(scratch);

    Ok(normalize(&page_texts.join("\n\n"), settings.preserve_layout))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
