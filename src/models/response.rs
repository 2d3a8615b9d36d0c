// file: src/models/response.rs
// description: persisted answer record for the response cache
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// One row of the `responses` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: i64,
    pub subject_code: String,
    pub module: String,
    pub response: String,
}

impl ResponseRecord {
    pub fn new(id: i64, subject_code: &str, module: &str, response: &str) -> Self {
        Self {
            id,
            subject_code: subject_code.to_string(),
            module: module.to_string(),
            response: response.to_string(),
        }
    }

    pub fn matches(&self, subject_code: &str, module: &str) -> bool {
        self.subject_code == subject_code && self.module == module
    }
}
