// file: src/exporter/json.rs
// description: json export of answered modules

use crate::error::{PipelineError, Result};
use crate::exporter::matrix::format_matrices;
use crate::models::SubjectCode;
use crate::pipeline::{ModuleReport, PipelineStats, RetrievalMode};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
    render_matrices: bool,
}

#[derive(Debug, Serialize)]
pub struct ExportedModule {
    pub index: usize,
    pub heading: String,
    pub body: String,
    pub status: String,
    pub answers: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub subject_code: SubjectCode,
    pub mode: RetrievalMode,
    pub stats: PipelineStats,
    pub modules: Vec<ExportedModule>,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            render_matrices: true,
        })
    }

    pub fn with_matrix_rendering(mut self, enabled: bool) -> Self {
        self.render_matrices = enabled;
        self
    }

    pub fn build_manifest(
        &self,
        subject_code: &SubjectCode,
        mode: RetrievalMode,
        stats: PipelineStats,
        reports: &[ModuleReport],
    ) -> ExportManifest {
        let modules = reports
            .iter()
            .map(|report| ExportedModule {
                index: report.module.index,
                heading: report.module.heading.clone(),
                body: report.module.body.clone(),
                status: report.outcome.label().to_string(),
                answers: report
                    .outcome
                    .answers()
                    .into_iter()
                    .map(|answer| self.render(answer))
                    .collect(),
                error: report.outcome.error().map(|e| e.to_string()),
            })
            .collect();

        ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            subject_code: subject_code.clone(),
            mode,
            stats,
            modules,
        }
    }

    /// Writes the manifest to `answers_<subject>_<timestamp>.json` and returns the path.
    pub fn export(&self, manifest: &ExportManifest, pretty: bool) -> Result<PathBuf> {
        let subject = if manifest.subject_code.is_empty() {
            "unknown"
        } else {
            manifest.subject_code.as_str()
        };
        let file_name = format!(
            "answers_{}_{}.json",
            subject,
            Utc::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.output_dir.join(file_name);

        let json = if pretty {
            serde_json::to_string_pretty(manifest)
        } else {
            serde_json::to_string(manifest)
        }
        .map_err(|e| PipelineError::Serialization(e.to_string()))?;

        fs::write(&path, json).map_err(|source| PipelineError::FileOperation {
            path: path.clone(),
            source,
        })?;

        info!(
            "Exported {} modules to {}",
            manifest.modules.len(),
            path.display()
        );
        Ok(path)
    }

    fn render(&self, answer: &str) -> String {
        if self.render_matrices {
            format_matrices(answer)
        } else {
            answer.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use crate::models::Module;
    use crate::pipeline::ModuleOutcome;
    use tempfile::TempDir;

    fn sample_reports() -> Vec<ModuleReport> {
        vec![
            ModuleReport {
                module: Module::new(1, "Module – 1", "Invert the matrix."),
                outcome: ModuleOutcome::Stored("Result:\n| 1 0 |\n| 0 1 |".to_string()),
            },
            ModuleReport {
                module: Module::new(2, "Module – 2", "Explain lifetimes."),
                outcome: ModuleOutcome::Failed(GenerationError::Upstream {
                    status: 500,
                    body: "oops".to_string(),
                }),
            },
        ]
    }

    #[test]
    fn test_manifest_renders_matrices_and_errors() {
        let temp = TempDir::new().unwrap();
        let exporter = JsonExporter::new(temp.path()).unwrap();

        let manifest = exporter.build_manifest(
            &SubjectCode::new("MAT101"),
            RetrievalMode::CachedFirst,
            PipelineStats::default(),
            &sample_reports(),
        );

        assert_eq!(manifest.modules.len(), 2);
        assert_eq!(manifest.modules[0].status, "stored");
        assert!(manifest.modules[0].answers[0].contains("\\begin{bmatrix}1 & 0"));
        assert_eq!(manifest.modules[1].status, "failed");
        assert!(manifest.modules[1].answers.is_empty());
        assert!(manifest.modules[1].error.as_deref().unwrap().contains("500"));
    }

    #[test]
    fn test_matrix_rendering_can_be_disabled() {
        let temp = TempDir::new().unwrap();
        let exporter = JsonExporter::new(temp.path())
            .unwrap()
            .with_matrix_rendering(false);

        let manifest = exporter.build_manifest(
            &SubjectCode::new("MAT101"),
            RetrievalMode::CachedFirst,
            PipelineStats::default(),
            &sample_reports(),
        );

        assert_eq!(manifest.modules[0].answers[0], "Result:\n| 1 0 |\n| 0 1 |");
    }

    #[test]
    fn test_export_writes_file() {
        let temp = TempDir::new().unwrap();
        let exporter = JsonExporter::new(temp.path().join("exports")).unwrap();
        let manifest = exporter.build_manifest(
            &SubjectCode::default(),
            RetrievalMode::ConciseOverride,
            PipelineStats::default(),
            &sample_reports(),
        );

        let path = exporter.export(&manifest, true).unwrap();

        assert!(path.exists());
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("answers_unknown_")
        );
        let written = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["mode"], "concise_override");
        assert_eq!(value["modules"][1]["status"], "failed");
    }
}
