// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod database;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod generator;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod utils;

pub use config::{Config, DatabaseConfig, GenerationConfig, PipelineConfig};
pub use database::{
    LanceDbClient, LanceResponseStore, MemoryResponseStore, ResponseStore, SchemaManager,
};
pub use error::{GenerationError, PipelineError, Result, StorageError};
pub use exporter::{ExportManifest, JsonExporter, format_matrices};
pub use extractor::SubjectCodeExtractor;
pub use generator::{AnswerGenerator, AnswerStyle, GroqAnswerClient};
pub use models::{CacheKey, Document, Module, ResponseRecord, SubjectCode};
pub use parser::{
    ModuleSegmenter, PdfTextExtractor, PlainTextExtractor, TextExtractor, TextNormalizer,
};
pub use pipeline::{
    AnswerPipeline, DocumentProcessor, ModuleOutcome, ModuleReport, PipelineRun, PipelineStats,
    ProgressTracker, RetrievalMode,
};
pub use utils::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _stats = PipelineStats::default();
        let _processor = DocumentProcessor::new();
        assert_eq!(RetrievalMode::default(), RetrievalMode::CachedFirst);
    }
}
