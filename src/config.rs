// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::pipeline::RetrievalMode;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

const DEFAULT_DATABASE_URI: &str = "data/lancedb";
const DEFAULT_TABLE_NAME: &str = "responses";
const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama3-8b-8192";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub generation: GenerationConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub table_name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    pub endpoint: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub default_mode: RetrievalMode,
    #[serde(default = "default_render_matrices")]
    pub render_matrices: bool,
}

fn default_render_matrices() -> bool {
    true
}

impl Config {
    /// Loads `path`, or the optional default file, with `PAPER_ANALYZER__*` overrides on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_layered(config::File::from(path)),
            None => Self::load_layered(
                config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false),
            ),
        }
    }

    fn load_layered<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        dotenv().ok();

        let settings = config::Config::builder()
            .set_default("database.uri", DEFAULT_DATABASE_URI)
            .and_then(|b| b.set_default("database.table_name", DEFAULT_TABLE_NAME))
            .and_then(|b| b.set_default("generation.endpoint", DEFAULT_ENDPOINT))
            .and_then(|b| b.set_default("generation.model", DEFAULT_MODEL))
            .map_err(|e| PipelineError::Config(e.to_string()))?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("PAPER_ANALYZER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.apply_env_credential();
        config.validate()?;
        Ok(config)
    }

    /// Fills a missing credential from the process environment.
    fn apply_env_credential(&mut self) {
        let configured = self
            .generation
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty());

        if !configured {
            self.generation.api_key = std::env::var(API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.table_name.trim().is_empty() {
            return Err(PipelineError::Config(
                "table_name must not be empty".to_string(),
            ));
        }

        if !self.generation.endpoint.starts_with("http://")
            && !self.generation.endpoint.starts_with("https://")
        {
            return Err(PipelineError::Config(format!(
                "endpoint must be an http(s) url: {}",
                self.generation.endpoint
            )));
        }

        if self.generation.model.trim().is_empty() {
            return Err(PipelineError::Config("model must not be empty".to_string()));
        }

        if self.generation.timeout_secs == Some(0) {
            return Err(PipelineError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn built_in() -> Config {
        Config::load_layered(config::File::from(Path::new("no/such/settings.toml")).required(false))
            .unwrap()
    }

    #[test]
    fn test_built_in_config_is_valid() {
        let config = built_in();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.table_name, "responses");
        assert_eq!(config.pipeline.default_mode, RetrievalMode::CachedFirst);
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = built_in();
        config.generation.endpoint = "api.groq.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = built_in();
        config.generation.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.toml");
        fs::write(
            &path,
            r#"
[database]
uri = "memory-test/lancedb"
table_name = "cached_answers"

[generation]
endpoint = "http://localhost:8080/v1/chat/completions"
model = "test-model"
api_key = "secret"
timeout_secs = 30

[pipeline]
default_mode = "force_refresh"
render_matrices = false
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.database.table_name, "cached_answers");
        assert_eq!(config.generation.api_key.as_deref(), Some("secret"));
        assert_eq!(config.generation.timeout_secs, Some(30));
        assert_eq!(config.pipeline.default_mode, RetrievalMode::ForceRefresh);
        assert!(!config.pipeline.render_matrices);
    }

    #[test]
    fn test_missing_default_file_falls_back_to_built_in_values() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.toml");

        let config =
            Config::load_layered(config::File::from(missing.as_path()).required(false)).unwrap();
        assert_eq!(config.database.uri, DEFAULT_DATABASE_URI);
        assert_eq!(config.database.table_name, DEFAULT_TABLE_NAME);
        assert_eq!(config.generation.model, DEFAULT_MODEL);
        assert!(config.pipeline.render_matrices);
    }

    #[test]
    fn test_partial_file_is_completed_with_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("partial.toml");
        fs::write(&path, "[database]\ntable_name = \"partial_answers\"\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.database.table_name, "partial_answers");
        assert_eq!(config.database.uri, DEFAULT_DATABASE_URI);
        assert_eq!(config.generation.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.toml");
        assert!(Config::load(Some(missing.as_path())).is_err());
    }
}
