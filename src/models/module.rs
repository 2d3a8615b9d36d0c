// file: src/models/module.rs
// description: question paper modules, subject codes and cache keys
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Subject identifier of a question paper, e.g. `CSE301`.
///
/// An empty code is a valid value: papers without a detectable code share
/// one cache namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectCode(String);

impl SubjectCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "<none>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// 1-based position of the heading in the source text.
    pub index: usize,
    pub heading: String,
    pub body: String,
}

impl Module {
    pub fn new(index: usize, heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            index,
            heading: heading.into(),
            body: body.into(),
        }
    }

    pub fn cache_key(&self, subject_code: &SubjectCode) -> CacheKey {
        CacheKey::new(subject_code.clone(), self.body.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub subject_code: SubjectCode,
    pub module_body: String,
}

impl CacheKey {
    pub fn new(subject_code: SubjectCode, module_body: String) -> Self {
        Self {
            subject_code,
            module_body,
        }
    }

    /// Short digest of the key for log lines.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.subject_code.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.module_body.as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..12].to_string()
    }
}
