//! Project initialization and component wiring
//!
//! Handles:
//! - Configuration directory and default config file creation
//! - Building gateways and providers from configuration
//! - Assembling the controller with its defect index and record store

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::adapters::csv::{load_defects, CsvTestCaseStorage};
use crate::adapters::embeddings::{HashedEmbeddingProvider, OpenAiEmbeddingConfig, OpenAiEmbeddingProvider};
use crate::adapters::generation::{
    AnthropicConfig, AnthropicGenerationGateway, OpenAiChatConfig, OpenAiChatGenerationGateway,
};
use crate::adapters::mock::ScriptedGenerationGateway;
use crate::adapters::notification::HtmlReportSink;
use crate::adapters::retrieval::EmbeddingDefectIndex;
use crate::domain::models::config::{
    Config, EmbeddingConfig, GenerationConfig, NotificationConfig, RetryConfig, StorageConfig,
};
use crate::domain::ports::{EmbeddingProvider, GenerationGateway, NotificationSink};
use crate::infrastructure::config::loader::{CONFIG_DIR, CONFIG_FILE};
use crate::infrastructure::http::RetryPolicy;
use crate::services::{AutonomousController, EmbeddingSimilarityScorer, ReconciliationPipeline, RecordStore};

/// Default configuration template content
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Defect RCA Configuration
# Override settings by editing this file, adding .defect-rca/local.yaml,
# or setting environment variables with the DEFECT_RCA_ prefix
#
# Example environment variables:
#   export DEFECT_RCA_PIPELINE__SIMILARITY_THRESHOLD=0.7
#   export DEFECT_RCA_GENERATION__PROVIDER=openai
#   export DEFECT_RCA_LOGGING__LEVEL=debug

pipeline:
  # Minimum similarity between the query and the retrieved defect (0.0-1.0)
  similarity_threshold: 0.6

  # Proper test cases each module must have
  required_test_cases: 4

  # Self-evaluation ratings below this trigger an alternative solution (1-5)
  rating_threshold: 3

  # Upper bound on controller iterations
  max_iterations: 3

  # Response format: markdown, html
  response_format: "markdown"

storage:
  # CSV with Module, Description, Solution columns
  defects_path: "defects.csv"

  # CSV holding persisted test cases
  test_cases_path: "test_cases.csv"

generation:
  # Backend: anthropic, openai (any OpenAI-compatible server), mock
  provider: "anthropic"
  model: "claude-sonnet-4-5"
  temperature: 0.3
  max_tokens: 4096
  timeout_secs: 120
  # API keys are read from ANTHROPIC_API_KEY / OPENAI_API_KEY when unset
  # base_url: "https://api.groq.com/openai/v1"

embedding:
  # Backend: hashed (offline), openai
  provider: "hashed"
  dimension: 256

# Retry policy for transient gateway failures
retry:
  max_retries: 3
  initial_backoff_ms: 1000
  max_backoff_ms: 30000

logging:
  # Log level: trace, debug, info, warn, error
  level: "info"

  # Log format: json, pretty
  format: "pretty"

  # Rolling JSON log files are written here when set
  # log_dir: ".defect-rca/logs"

notification:
  # Write each final response as an HTML report
  enabled: false
  output_dir: ".defect-rca/reports"
  subject: "Defect RCA"
"#;

/// Setup paths and directories
pub struct SetupPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl SetupPaths {
    /// Get setup paths for the current directory
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self::under(&current_dir))
    }

    /// Setup paths rooted at `root`
    pub fn under(root: &Path) -> Self {
        Self {
            config_dir: root.join(CONFIG_DIR),
            config_file: root.join(CONFIG_FILE),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.config_file.exists()
    }
}

/// Create the configuration directory
pub fn create_config_dir(paths: &SetupPaths) -> Result<()> {
    fs::create_dir_all(&paths.config_dir).context("Failed to create config directory")?;
    Ok(())
}

/// Write the default configuration file.
///
/// Returns `false` when a config file already exists and `force` is not set.
pub fn create_config_file(paths: &SetupPaths, force: bool) -> Result<bool> {
    if paths.config_file.exists() && !force {
        return Ok(false);
    }

    fs::write(&paths.config_file, DEFAULT_CONFIG_TEMPLATE).context("Failed to write config file")?;
    Ok(true)
}

pub fn build_embedding_provider(
    config: &EmbeddingConfig,
    retry: &RetryConfig,
) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "hashed" => Ok(Arc::new(HashedEmbeddingProvider::new(config.dimension))),
        "openai" => Ok(Arc::new(OpenAiEmbeddingProvider::new(
            OpenAiEmbeddingConfig::from(config),
            RetryPolicy::from(retry),
        )?)),
        other => anyhow::bail!("Unknown embedding provider: {other}"),
    }
}

pub fn build_generation_gateway(
    config: &GenerationConfig,
    retry: &RetryConfig,
) -> Result<Arc<dyn GenerationGateway>> {
    let retry = RetryPolicy::from(retry);
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicGenerationGateway::new(
            AnthropicConfig::from(config),
            retry,
        )?)),
        "openai" => Ok(Arc::new(OpenAiChatGenerationGateway::new(
            OpenAiChatConfig::from(config),
            retry,
        )?)),
        "mock" => Ok(Arc::new(ScriptedGenerationGateway::new())),
        other => anyhow::bail!("Unknown generation provider: {other}"),
    }
}

/// Sink for final responses, or `None` when delivery is disabled.
pub fn build_notification_sink(config: &NotificationConfig) -> Option<Arc<dyn NotificationSink>> {
    config
        .enabled
        .then(|| Arc::new(HtmlReportSink::new(&config.output_dir)) as Arc<dyn NotificationSink>)
}

/// Open the CSV-backed test case store.
pub fn open_record_store(config: &StorageConfig) -> RecordStore {
    RecordStore::open(Box::new(CsvTestCaseStorage::new(&config.test_cases_path)))
}

/// Assemble a controller from configuration.
///
/// An unreadable defects file leaves the index empty, so every query
/// resolves to the not-found path.
pub async fn build_controller(config: &Config) -> Result<AutonomousController> {
    let embeddings = build_embedding_provider(&config.embedding, &config.retry)?;
    let generation = build_generation_gateway(&config.generation, &config.retry)?;

    let defects = load_defects(Path::new(&config.storage.defects_path)).unwrap_or_else(|err| {
        tracing::warn!(
            path = %config.storage.defects_path,
            error = %err,
            "defects unavailable, continuing with an empty index"
        );
        Vec::new()
    });
    let index = EmbeddingDefectIndex::build(defects, Arc::clone(&embeddings))
        .await
        .context("Failed to build defect index")?;

    let pipeline = ReconciliationPipeline::new(
        Arc::new(index),
        Arc::new(EmbeddingSimilarityScorer::new(embeddings)),
        Arc::clone(&generation),
        config.pipeline.clone(),
    );

    Ok(AutonomousController::new(
        pipeline,
        generation,
        open_record_store(&config.storage),
    ))
}
