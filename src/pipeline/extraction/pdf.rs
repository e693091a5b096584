use std::panic::{self, AssertUnwindSafe};

use super::types::{PageExtraction, PdfExtractor};
use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned pages yield empty text.
pub struct PdfTextExtractor;

impl PdfExtractor for PdfTextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>, ExtractionError> {
        let page_texts = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

        Ok(page_texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PageExtraction {
                page_number: i + 1,
                text,
            })
            .collect())
    }
}

/// Extract the text layer of a PDF with the default extractor.
///
/// Never fails: malformed, encrypted or scanned input comes back as an
/// empty string so callers can still answer the user.
pub fn extract_text(pdf_bytes: &[u8]) -> String {
    extract_text_with(&PdfTextExtractor, pdf_bytes)
}

/// Extract and concatenate all pages in page order, degrading to `""`.
///
/// The decoder call is wrapped in `catch_unwind`: pdf-extract panics on
/// some malformed font and xref tables instead of returning an error.
pub fn extract_text_with(extractor: &dyn PdfExtractor, pdf_bytes: &[u8]) -> String {
    match try_extract(extractor, pdf_bytes) {
        Ok(text) => text,
        Err(ExtractionError::EmptyInput) => String::new(),
        Err(e) => {
            tracing::warn!(
                bytes = pdf_bytes.len(),
                error = %e,
                "PDF extraction failed, continuing with empty text"
            );
            String::new()
        }
    }
}

fn try_extract(extractor: &dyn PdfExtractor, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    if pdf_bytes.is_empty() {
        return Err(ExtractionError::EmptyInput);
    }

    let pages = panic::catch_unwind(AssertUnwindSafe(|| extractor.extract_pages(pdf_bytes)))
        .map_err(|payload| ExtractionError::DecoderPanic(panic_message(payload.as_ref())))??;

    let mut text = String::new();
    for page in &pages {
        text.push_str(&page.text);
    }

    tracing::debug!(pages = pages.len(), chars = text.chars().count(), "PDF text extracted");
    Ok(text)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
