// file: src/pipeline/mod.rs
// description: pipeline module exports and retrieval modes
// reference: pipeline orchestration

mod orchestrator;
mod processor;
mod progress;

pub use orchestrator::{AnswerPipeline, ModuleOutcome, ModuleReport, PipelineRun};
pub use processor::DocumentProcessor;
pub use progress::{PipelineStats, ProgressTracker};

use crate::error::PipelineError;
use crate::generator::AnswerStyle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a run treats the response cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    /// Serve cached answers when present, generate and cache otherwise.
    #[default]
    CachedFirst,
    /// Always generate, and cache the result.
    ForceRefresh,
    /// Always generate a concise answer; the cache is neither read nor written.
    ConciseOverride,
}

impl RetrievalMode {
    pub fn style(&self) -> AnswerStyle {
        match self {
            Self::CachedFirst | Self::ForceRefresh => AnswerStyle::Verbose,
            Self::ConciseOverride => AnswerStyle::Concise,
        }
    }

    pub fn reads_cache(&self) -> bool {
        match self {
            Self::CachedFirst => true,
            Self::ForceRefresh | Self::ConciseOverride => false,
        }
    }

    pub fn writes_cache(&self) -> bool {
        match self {
            Self::CachedFirst | Self::ForceRefresh => true,
            Self::ConciseOverride => false,
        }
    }
}

impl fmt::Display for RetrievalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CachedFirst => write!(f, "cached-first"),
            Self::ForceRefresh => write!(f, "force-refresh"),
            Self::ConciseOverride => write!(f, "concise"),
        }
    }
}

impl FromStr for RetrievalMode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "cached-first" | "cached" => Ok(Self::CachedFirst),
            "force-refresh" | "refresh" => Ok(Self::ForceRefresh),
            "concise" | "concise-override" => Ok(Self::ConciseOverride),
            other => Err(PipelineError::Validation(format!(
                "Unknown retrieval mode: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(
            "cached-first".parse::<RetrievalMode>().unwrap(),
            RetrievalMode::CachedFirst
        );
        assert_eq!(
            "force_refresh".parse::<RetrievalMode>().unwrap(),
            RetrievalMode::ForceRefresh
        );
        assert_eq!(
            "Concise".parse::<RetrievalMode>().unwrap(),
            RetrievalMode::ConciseOverride
        );
        assert!("sometimes".parse::<RetrievalMode>().is_err());
    }

    #[test]
    fn test_mode_cache_policy() {
        assert!(RetrievalMode::CachedFirst.reads_cache());
        assert!(!RetrievalMode::ForceRefresh.reads_cache());
        assert!(RetrievalMode::ForceRefresh.writes_cache());
        assert!(!RetrievalMode::ConciseOverride.reads_cache());
        assert!(!RetrievalMode::ConciseOverride.writes_cache());
        assert_eq!(RetrievalMode::ConciseOverride.style(), AnswerStyle::Concise);
        assert_eq!(RetrievalMode::ForceRefresh.style(), AnswerStyle::Verbose);
    }
}
