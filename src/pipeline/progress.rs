// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for answer runs
// reference: uses indicatif for progress bars and tracks per-module outcomes

use crate::pipeline::orchestrator::ModuleOutcome;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineStats {
    pub modules_total: usize,
    pub cache_hits: usize,
    pub stored: usize,
    pub uncached: usize,
    pub failed: usize,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn record(&mut self, outcome: &ModuleOutcome) {
        match outcome {
            ModuleOutcome::CacheHit(_) => self.cache_hits += 1,
            ModuleOutcome::Stored(_) => self.stored += 1,
            ModuleOutcome::Uncached(_) => self.uncached += 1,
            ModuleOutcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn modules_processed(&self) -> usize {
        self.cache_hits + self.stored + self.uncached + self.failed
    }

    pub fn generator_calls(&self) -> usize {
        self.stored + self.uncached + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.modules_processed();
        if total == 0 {
            return 0.0;
        }
        ((total - self.failed) as f64 / total as f64) * 100.0
    }

    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.modules_processed();
        if total == 0 {
            return 0.0;
        }
        (self.cache_hits as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    cache_hits: Arc<AtomicUsize>,
    stored: Arc<AtomicUsize>,
    uncached: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
}

impl ProgressTracker {
    pub fn with_color(total_modules: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_modules as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self {
            main_bar,
            detail_bar,
            cache_hits: Arc::new(AtomicUsize::new(0)),
            stored: Arc::new(AtomicUsize::new(0)),
            uncached: Arc::new(AtomicUsize::new(0)),
            failed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn record_outcome(&self, outcome: &ModuleOutcome) {
        let counter = match outcome {
            ModuleOutcome::CacheHit(_) => &self.cache_hits,
            ModuleOutcome::Stored(_) => &self.stored,
            ModuleOutcome::Uncached(_) => &self.uncached,
            ModuleOutcome::Failed(_) => &self.failed,
        };
        counter.fetch_add(1, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    /// Runs `f` with the bars hidden so it can print to the terminal.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.main_bar.suspend(f)
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Analysis complete");
        self.detail_bar.finish_and_clear();
    }

    fn update_detail_bar(&self) {
        let message = format!(
            "Cached: {} | Generated: {} | Failed: {}",
            self.cache_hits.load(Ordering::SeqCst),
            self.stored.load(Ordering::SeqCst) + self.uncached.load(Ordering::SeqCst),
            self.failed.load(Ordering::SeqCst)
        );

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} modules {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} modules {msg}"
    };

    match ProgressStyle::default_bar().template(template) {
        Ok(style) => bar.set_style(style.progress_chars(if colored { "█▓▒░" } else { "=>-" })),
        Err(_) => bar.set_style(ProgressStyle::default_bar()),
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
