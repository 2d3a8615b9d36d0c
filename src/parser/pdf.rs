// file: src/parser/pdf.rs
// description: raw document bytes to text, one string per document
// reference: https://docs.rs/lopdf

use crate::error::{PipelineError, Result};
use tracing::{debug, warn};

/// Turns an uploaded document into a single text string.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Extracts page text in page order, each page followed by a newline.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let document = lopdf::Document::load_mem(bytes)
            .map_err(|e| PipelineError::Extraction(format!("Failed to load PDF: {}", e)))?;

        let pages = document.get_pages();
        debug!("Extracting text from {} PDF pages", pages.len());

        let mut text = String::new();
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => warn!("Skipping unreadable page {}: {}", page_number, e),
            }
            text.push('\n');
        }

        Ok(text)
    }
}

/// Treats the bytes as already extracted UTF-8 text.
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String> {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| PipelineError::Extraction(format!("Input is not valid UTF-8: {}", e)))
    }
}
