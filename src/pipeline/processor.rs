// file: src/pipeline/processor.rs
// description: converts extracted question paper text into a segmented document
// reference: normalizes text, extracts the subject code and splits modules

use crate::extractor::SubjectCodeExtractor;
use crate::models::Document;
use crate::parser::{ModuleSegmenter, TextNormalizer};
use tracing::{info, warn};

pub struct DocumentProcessor {
    normalizer: TextNormalizer,
    subject_extractor: SubjectCodeExtractor,
    segmenter: ModuleSegmenter,
}

impl DocumentProcessor {
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            subject_extractor: SubjectCodeExtractor::new(),
            segmenter: ModuleSegmenter::new(),
        }
    }

    pub fn prepare(&self, raw_text: &str) -> Document {
        let normalized = self.normalizer.normalize(raw_text);

        let subject_code = self
            .subject_extractor
            .extract(&normalized)
            .unwrap_or_else(|| {
                warn!("No subject code found, answers share the empty namespace");
                Default::default()
            });

        let modules = self.segmenter.segment_modules(&normalized);

        info!(
            "Prepared document: subject {}, {} modules",
            subject_code,
            modules.len()
        );

        Document::new(raw_text.to_string(), normalized, subject_code, modules)
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_extracts_code_and_modules() {
        let processor = DocumentProcessor::new();
        let raw = "CSE301 Systems Programming\nModule – 1\n1. Define ownership.\n\
                   Module – 2\n2. Explain\tlifetimes.\n";

        let document = processor.prepare(raw);

        assert_eq!(document.subject_code.as_str(), "CSE301");
        assert_eq!(document.module_count(), 2);
        assert_eq!(document.modules[0].body, "1. Define ownership.");
        assert_eq!(document.modules[1].body, "2. Explain lifetimes.");
        assert_eq!(document.raw_text, raw);
    }

    #[test]
    fn test_prepare_without_code_or_modules() {
        let processor = DocumentProcessor::new();
        let document = processor.prepare("Answer all questions.");

        assert!(document.subject_code.is_empty());
        assert!(document.has_no_modules());
    }
}
