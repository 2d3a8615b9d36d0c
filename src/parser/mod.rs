// file: src/parser/mod.rs
// description: text extraction, normalization and module segmentation exports
// reference: internal module structure

pub mod normalizer;
pub mod pdf;
pub mod segmenter;

pub use normalizer::TextNormalizer;
pub use pdf::{PdfTextExtractor, PlainTextExtractor, TextExtractor};
pub use segmenter::ModuleSegmenter;
