// file: src/models/document.rs
// description: question paper document prepared for answering
// reference: internal data structures

use crate::models::{Module, SubjectCode};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub raw_text: String,
    pub normalized_text: String,
    pub subject_code: SubjectCode,
    pub modules: Vec<Module>,
}

impl Document {
    pub fn new(
        raw_text: String,
        normalized_text: String,
        subject_code: SubjectCode,
        modules: Vec<Module>,
    ) -> Self {
        Self {
            raw_text,
            normalized_text,
            subject_code,
            modules,
        }
    }

    /// True when no module heading was found in the text.
    pub fn has_no_modules(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}
