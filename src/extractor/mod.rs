// file: src/extractor/mod.rs
// description: entity extraction module exports
// reference: internal module structure

pub mod patterns;
pub mod subject;

pub use subject::SubjectCodeExtractor;
