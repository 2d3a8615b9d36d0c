// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod module;
pub mod response;

pub use document::Document;
pub use module::{CacheKey, Module, SubjectCode};
pub use response::ResponseRecord;
