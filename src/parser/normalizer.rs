// file: src/parser/normalizer.rs
// description: whitespace normalization for extracted question paper text
// reference: PDF text extraction artifacts

use crate::extractor::patterns::SPACE_RUN;

pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Produces the canonical single-spaced form used for segmentation and
    /// as the module part of cache keys. Idempotent.
    pub fn normalize(&self, content: &str) -> String {
        let flattened = self.flatten_line_breaks(content);
        let collapsed = SPACE_RUN.replace_all(&flattened, " ");
        collapsed.trim().to_string()
    }

    fn flatten_line_breaks(&self, content: &str) -> String {
        content
            .chars()
            .map(|c| match c {
                '\n' | '\r' | '\t' => ' ',
                c => c,
            })
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
