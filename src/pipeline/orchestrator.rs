// file: src/pipeline/orchestrator.rs
// description: coordinates cache lookups, answer generation and cache writes per module
// reference: walks a document's modules one at a time in heading order

use crate::database::ResponseStore;
use crate::error::{GenerationError, Result};
use crate::generator::AnswerGenerator;
use crate::models::{Document, Module, SubjectCode};
use crate::parser::{PdfTextExtractor, TextExtractor};
use crate::pipeline::RetrievalMode;
use crate::pipeline::processor::DocumentProcessor;
use crate::pipeline::progress::PipelineStats;
use futures::stream::{self, Stream};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Final state of one module.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleOutcome {
    /// Every answer already cached for the module, oldest first.
    CacheHit(Vec<String>),
    /// Freshly generated and written to the cache.
    Stored(String),
    /// Freshly generated but not in the cache (concise answers, or a failed write).
    Uncached(String),
    Failed(GenerationError),
}

impl ModuleOutcome {
    pub fn answers(&self) -> Vec<&str> {
        match self {
            Self::CacheHit(answers) => answers.iter().map(String::as_str).collect(),
            Self::Stored(answer) | Self::Uncached(answer) => vec![answer.as_str()],
            Self::Failed(_) => Vec::new(),
        }
    }

    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CacheHit(_) => "cache_hit",
            Self::Stored(_) => "stored",
            Self::Uncached(_) => "uncached",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModuleReport {
    pub module: Module,
    pub outcome: ModuleOutcome,
}

#[derive(Debug, Clone, Serialize)]
struct RunSummary<'s> {
    subject_code: &'s SubjectCode,
    mode: String,
    stats: &'s PipelineStats,
}

pub struct AnswerPipeline {
    store: Arc<dyn ResponseStore>,
    generator: Arc<dyn AnswerGenerator>,
    extractor: Arc<dyn TextExtractor>,
    processor: DocumentProcessor,
}

impl AnswerPipeline {
    pub fn new(store: Arc<dyn ResponseStore>, generator: Arc<dyn AnswerGenerator>) -> Self {
        Self {
            store,
            generator,
            extractor: Arc::new(PdfTextExtractor::new()),
            processor: DocumentProcessor::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Extracts text from raw document bytes and starts a run over its modules.
    pub fn process(&self, bytes: &[u8], mode: RetrievalMode) -> Result<PipelineRun<'_>> {
        let raw_text = self.extractor.extract(bytes)?;
        Ok(self.process_text(&raw_text, mode))
    }

    pub fn process_text(&self, raw_text: &str, mode: RetrievalMode) -> PipelineRun<'_> {
        let document = self.processor.prepare(raw_text);
        self.run_document(document, mode)
    }

    pub fn run_document(&self, document: Document, mode: RetrievalMode) -> PipelineRun<'_> {
        if document.has_no_modules() {
            warn!("No modules detected in document");
        } else {
            info!(
                "Starting {} run over {} modules (subject {})",
                mode,
                document.module_count(),
                document.subject_code
            );
        }

        PipelineRun::new(self, document, mode)
    }

    /// Runs the cache check / generate / store sequence for a single module.
    pub async fn answer_module(
        &self,
        subject_code: &SubjectCode,
        module: &Module,
        mode: RetrievalMode,
    ) -> ModuleOutcome {
        let key = module.cache_key(subject_code);
        let fingerprint = key.fingerprint();

        if mode.reads_cache() {
            match self.store.get(subject_code.as_str(), &module.body).await {
                Ok(cached) if !cached.is_empty() => {
                    debug!(
                        "Module {} cache hit [{}]: {} answers",
                        module.index,
                        fingerprint,
                        cached.len()
                    );
                    return ModuleOutcome::CacheHit(cached);
                }
                Ok(_) => debug!("Module {} cache miss [{}]", module.index, fingerprint),
                Err(e) => warn!(
                    "Module {} cache check failed, generating instead: {}",
                    module.index, e
                ),
            }
        }

        debug!("Module {} generating {} answer", module.index, mode.style());
        let content = match self.generator.generate(&module.body, mode.style()).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Module {} generation failed: {}", module.index, e);
                return ModuleOutcome::Failed(e);
            }
        };

        if !mode.writes_cache() {
            return ModuleOutcome::Uncached(content);
        }

        match self
            .store
            .put(subject_code.as_str(), &module.body, &content)
            .await
        {
            Ok(()) => {
                debug!("Module {} answer cached [{}]", module.index, fingerprint);
                ModuleOutcome::Stored(content)
            }
            Err(e) => {
                warn!("Module {} answer could not be cached: {}", module.index, e);
                ModuleOutcome::Uncached(content)
            }
        }
    }
}

/// Single pass over one document's modules.
///
/// Each call to [`PipelineRun::next_report`] finishes one module before the
/// next one starts; a run cannot be restarted.
pub struct PipelineRun<'a> {
    pipeline: &'a AnswerPipeline,
    mode: RetrievalMode,
    subject_code: SubjectCode,
    modules: std::vec::IntoIter<Module>,
    stats: PipelineStats,
    started: Instant,
}

impl<'a> PipelineRun<'a> {
    fn new(pipeline: &'a AnswerPipeline, document: Document, mode: RetrievalMode) -> Self {
        let stats = PipelineStats {
            modules_total: document.module_count(),
            ..PipelineStats::default()
        };

        Self {
            pipeline,
            mode,
            subject_code: document.subject_code,
            modules: document.modules.into_iter(),
            stats,
            started: Instant::now(),
        }
    }

    pub fn mode(&self) -> RetrievalMode {
        self.mode
    }

    pub fn subject_code(&self) -> &SubjectCode {
        &self.subject_code
    }

    pub fn module_count(&self) -> usize {
        self.stats.modules_total
    }

    /// True when the document had no module headings at all.
    pub fn is_empty(&self) -> bool {
        self.stats.modules_total == 0
    }

    pub async fn next_report(&mut self) -> Option<ModuleReport> {
        let module = self.modules.next()?;
        let outcome = self
            .pipeline
            .answer_module(&self.subject_code, &module, self.mode)
            .await;

        self.stats.record(&outcome);
        if self.modules.as_slice().is_empty() {
            self.log_summary();
        }

        Some(ModuleReport { module, outcome })
    }

    /// Drains the remaining modules.
    pub async fn collect_reports(mut self) -> Vec<ModuleReport> {
        let mut reports = Vec::with_capacity(self.modules.len());
        while let Some(report) = self.next_report().await {
            reports.push(report);
        }
        reports
    }

    pub fn into_stream(self) -> impl Stream<Item = ModuleReport> + 'a {
        stream::unfold(self, |mut run| async move {
            run.next_report().await.map(|report| (report, run))
        })
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            duration_secs: self.started.elapsed().as_secs(),
            ..self.stats.clone()
        }
    }

    fn log_summary(&self) {
        let stats = self.stats();
        let summary = RunSummary {
            subject_code: &self.subject_code,
            mode: self.mode.to_string(),
            stats: &stats,
        };

        match serde_json::to_string(&summary) {
            Ok(json) => info!("Run complete: {}", json),
            Err(_) => info!(
                "Run complete: {} modules, {} failed",
                stats.modules_processed(),
                stats.failed
            ),
        }
    }
}
