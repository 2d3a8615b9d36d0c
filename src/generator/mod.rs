// file: src/generator/mod.rs
// description: answer generation styles and the generator seam
// reference: internal module structure

pub mod groq;

pub use groq::GroqAnswerClient;

use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

const VERBOSE_DIRECTIVE: &str = "You should answer the questions given in the text. \
Exaggerate it enough so that single answer has more than 200-500 words.";

const CONCISE_DIRECTIVE: &str = "You should answer every question given in the text, \
including the optional ones. Keep each answer short and write it as bullet points.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStyle {
    Verbose,
    Concise,
}

impl AnswerStyle {
    /// System instruction sent alongside the module text.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::Verbose => VERBOSE_DIRECTIVE,
            Self::Concise => CONCISE_DIRECTIVE,
        }
    }
}

impl fmt::Display for AnswerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verbose => write!(f, "verbose"),
            Self::Concise => write!(f, "concise"),
        }
    }
}

/// Produces an answer for one module body. A single attempt, no retries.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, module_body: &str, style: AnswerStyle)
    -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_differ_by_style() {
        assert_ne!(
            AnswerStyle::Verbose.directive(),
            AnswerStyle::Concise.directive()
        );
        assert!(AnswerStyle::Verbose.directive().contains("200-500 words"));
        assert!(AnswerStyle::Concise.directive().contains("optional"));
    }
}
