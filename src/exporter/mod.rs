// file: src/exporter/mod.rs
// description: answer rendering and export module exports
// reference: internal module structure

pub mod json;
pub mod matrix;

pub use json::{ExportManifest, ExportedModule, JsonExporter};
pub use matrix::format_matrices;
