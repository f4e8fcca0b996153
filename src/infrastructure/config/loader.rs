use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration directory.
pub const CONFIG_DIR: &str = ".defect-rca";
/// Primary config file, created by `init`.
pub const CONFIG_FILE: &str = ".defect-rca/config.yaml";
/// Optional local overrides, never created by `init`.
pub const LOCAL_CONFIG_FILE: &str = ".defect-rca/local.yaml";
/// Prefix for environment overrides; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "DEFECT_RCA_";

pub const GENERATION_PROVIDERS: [&str; 3] = ["anthropic", "openai", "mock"];
pub const EMBEDDING_PROVIDERS: [&str; 2] = ["hashed", "openai"];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid similarity_threshold: {0}. Must be between 0.0 and 1.0")]
    InvalidSimilarityThreshold(f64),

    #[error("Invalid required_test_cases: {0}. Must be at least 1")]
    InvalidRequiredTestCases(usize),

    #[error("Invalid rating_threshold: {0}. Must be between 1 and 5")]
    InvalidRatingThreshold(u8),

    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Storage path cannot be empty: {0}")]
    EmptyStoragePath(&'static str),

    #[error("Unknown generation provider: {0}. Must be one of: anthropic, openai, mock")]
    UnknownGenerationProvider(String),

    #[error("Unknown embedding provider: {0}. Must be one of: hashed, openai")]
    UnknownEmbeddingProvider(String),

    #[error("Invalid embedding dimension: {0}. Must be at least 1")]
    InvalidEmbeddingDimension(usize),

    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .defect-rca/config.yaml (project config, created by init)
    /// 3. .defect-rca/local.yaml (project local overrides, optional)
    /// 4. Environment variables (DEFECT_RCA_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(CONFIG_FILE))
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring environment overrides.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let pipeline = &config.pipeline;
        if !(0.0..=1.0).contains(&pipeline.similarity_threshold) {
            return Err(ConfigError::InvalidSimilarityThreshold(
                pipeline.similarity_threshold,
            ));
        }
        if pipeline.required_test_cases == 0 {
            return Err(ConfigError::InvalidRequiredTestCases(
                pipeline.required_test_cases,
            ));
        }
        if !(1..=5).contains(&pipeline.rating_threshold) {
            return Err(ConfigError::InvalidRatingThreshold(pipeline.rating_threshold));
        }
        if pipeline.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(pipeline.max_iterations));
        }

        if config.storage.defects_path.trim().is_empty() {
            return Err(ConfigError::EmptyStoragePath("defects_path"));
        }
        if config.storage.test_cases_path.trim().is_empty() {
            return Err(ConfigError::EmptyStoragePath("test_cases_path"));
        }

        if !GENERATION_PROVIDERS.contains(&config.generation.provider.as_str()) {
            return Err(ConfigError::UnknownGenerationProvider(
                config.generation.provider.clone(),
            ));
        }
        if !EMBEDDING_PROVIDERS.contains(&config.embedding.provider.as_str()) {
            return Err(ConfigError::UnknownEmbeddingProvider(
                config.embedding.provider.clone(),
            ));
        }
        if config.embedding.dimension == 0 {
            return Err(ConfigError::InvalidEmbeddingDimension(0));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config.retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }
        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{LogFormat, ResponseFormat};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!((config.pipeline.similarity_threshold - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.pipeline.required_test_cases, 4);
        assert_eq!(config.pipeline.rating_threshold, 3);
        assert_eq!(config.pipeline.max_iterations, 3);
        assert_eq!(config.pipeline.response_format, ResponseFormat::Markdown);
        assert_eq!(config.storage.defects_path, "defects.csv");
        assert_eq!(config.storage.test_cases_path, "test_cases.csv");
        assert_eq!(config.embedding.provider, "hashed");
        assert!(!config.notification.enabled);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
pipeline:
  similarity_threshold: 0.75
  response_format: html
storage:
  defects_path: data/defects.csv
generation:
  provider: openai
  model: gemma2-9b-it
  base_url: https://api.groq.com/openai/v1
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert!((config.pipeline.similarity_threshold - 0.75).abs() < f64::EPSILON);
        assert_eq!(config.pipeline.response_format, ResponseFormat::Html);
        assert_eq!(config.pipeline.required_test_cases, 4);
        assert_eq!(config.storage.defects_path, "data/defects.csv");
        assert_eq!(config.storage.test_cases_path, "test_cases.csv");
        assert_eq!(config.generation.provider, "openai");
        assert_eq!(
            config.generation.base_url.as_deref(),
            Some("https://api.groq.com/openai/v1")
        );
        assert_eq!(config.logging.format, LogFormat::Json);

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_similarity_threshold_range() {
        let mut config = Config::default();
        config.pipeline.similarity_threshold = 1.5;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidSimilarityThreshold(_))
        ));

        config.pipeline.similarity_threshold = f64::NAN;
        assert!(ConfigLoader::validate(&config).is_err());
    }

    #[test]
    fn test_validate_pipeline_counts() {
        let mut config = Config::default();
        config.pipeline.required_test_cases = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRequiredTestCases(0))
        ));

        let mut config = Config::default();
        config.pipeline.rating_threshold = 6;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRatingThreshold(6))
        ));

        let mut config = Config::default();
        config.pipeline.max_iterations = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxIterations(0))
        ));
    }

    #[test]
    fn test_validate_empty_storage_path() {
        let mut config = Config::default();
        config.storage.test_cases_path = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyStoragePath("test_cases_path"))
        ));
    }

    #[test]
    fn test_validate_providers() {
        let mut config = Config::default();
        config.generation.provider = "groq".to_string();
        match ConfigLoader::validate(&config) {
            Err(ConfigError::UnknownGenerationProvider(name)) => assert_eq!(name, "groq"),
            other => panic!("Expected UnknownGenerationProvider, got {other:?}"),
        }

        let mut config = Config::default();
        config.embedding.provider = "bert".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::UnknownEmbeddingProvider(_))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "verbose"),
            other => panic!("Expected InvalidLogLevel, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_backoff() {
        let mut config = Config::default();
        config.retry.initial_backoff_ms = 30000;
        config.retry.max_backoff_ms = 10000;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBackoff(30000, 10000))
        ));
    }

    #[test]
    fn test_load_from_file_with_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "pipeline:\n  required_test_cases: 6\nlogging:\n  level: warn\n  format: json"
        )
        .unwrap();
        file.flush().unwrap();

        temp_env::with_vars(
            [
                ("DEFECT_RCA_LOGGING__LEVEL", Some("debug")),
                ("DEFECT_RCA_STORAGE__DEFECTS_PATH", Some("/data/defects.csv")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.pipeline.required_test_cases, 6);
                assert_eq!(config.logging.level, "debug", "env should win over file");
                assert_eq!(config.logging.format, LogFormat::Json);
                assert_eq!(config.storage.defects_path, "/data/defects.csv");
            },
        );
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let err = ConfigLoader::load_from_file("/nonexistent/defect-rca.yaml").unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "pipeline:\n  rating_threshold: 0").unwrap();
        file.flush().unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("rating_threshold"));
    }

    #[test]
    fn test_hierarchical_merging() {
        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "pipeline:\n  max_iterations: 5\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "pipeline:\n  max_iterations: 2\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.pipeline.max_iterations, 2, "Override should win");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.format,
            LogFormat::Json,
            "Base value should persist when not overridden"
        );
    }
}
