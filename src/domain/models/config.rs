use serde::{Deserialize, Serialize};

/// Minimum similarity between a query and the retrieved defect description.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Number of proper test cases a module must have after reconciliation.
pub const DEFAULT_REQUIRED_TEST_CASES: usize = 4;

/// Self-evaluation ratings below this trigger the alternative-solution path.
pub const DEFAULT_RATING_THRESHOLD: u8 = 3;

/// Upper bound on controller iterations.
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Pipeline thresholds and response shape
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Backing files for defects and test cases
    #[serde(default)]
    pub storage: StorageConfig,

    /// Language model backend
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Embedding backend used for retrieval and similarity
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Retry policy for gateway HTTP calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Report delivery
    #[serde(default)]
    pub notification: NotificationConfig,
}

/// Presentation of assembled responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Markdown,
    Html,
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PipelineConfig {
    /// Retrieved defects scoring below this are treated as not found
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Minimum proper test cases per module
    #[serde(default = "default_required_test_cases")]
    pub required_test_cases: usize,

    /// Ratings (1-5) below this fall back to an alternative solution
    #[serde(default = "default_rating_threshold")]
    pub rating_threshold: u8,

    /// Iteration cap for the autonomous controller
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Response markup
    #[serde(default)]
    pub response_format: ResponseFormat,
}

const fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

const fn default_required_test_cases() -> usize {
    DEFAULT_REQUIRED_TEST_CASES
}

const fn default_rating_threshold() -> u8 {
    DEFAULT_RATING_THRESHOLD
}

const fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            required_test_cases: default_required_test_cases(),
            rating_threshold: default_rating_threshold(),
            max_iterations: default_max_iterations(),
            response_format: ResponseFormat::default(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// CSV with `Module, Description, Solution` columns
    #[serde(default = "default_defects_path")]
    pub defects_path: String,

    /// CSV holding persisted test cases
    #[serde(default = "default_test_cases_path")]
    pub test_cases_path: String,
}

fn default_defects_path() -> String {
    "defects.csv".to_string()
}

fn default_test_cases_path() -> String {
    "test_cases.csv".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            defects_path: default_defects_path(),
            test_cases_path: default_test_cases_path(),
        }
    }
}

/// Generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationConfig {
    /// Backend: anthropic or openai
    #[serde(default = "default_generation_provider")]
    pub provider: String,

    /// Model identifier passed to the backend
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// Override for the backend base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key; falls back to the provider's environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_generation_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_generation_provider() -> String {
    "anthropic".to_string()
}

fn default_generation_model() -> String {
    "claude-sonnet-4-5".to_string()
}

const fn default_temperature() -> f32 {
    0.3
}

const fn default_max_tokens() -> u32 {
    4096
}

const fn default_generation_timeout_secs() -> u64 {
    120
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_generation_provider(),
            model: default_generation_model(),
            base_url: None,
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_generation_timeout_secs(),
        }
    }
}

/// Embedding backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// Backend: hashed (offline) or openai
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Embedding model (openai only)
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Override for the backend base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// API key; falls back to `OPENAI_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Vector dimension
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,

    /// Request timeout in seconds
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_provider() -> String {
    "hashed".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

const fn default_embedding_dimension() -> usize {
    256
}

const fn default_embedding_timeout_secs() -> u64 {
    30
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: default_embedding_model(),
            base_url: None,
            api_key: None,
            dimension: default_embedding_dimension(),
            timeout_secs: default_embedding_timeout_secs(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    1000
}

const fn default_max_backoff_ms() -> u64 {
    30_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,

    /// Rotation policy for file output
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

/// Report delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NotificationConfig {
    /// Deliver each final response as an HTML report
    #[serde(default)]
    pub enabled: bool,

    /// Directory receiving HTML reports
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Report subject line
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_output_dir() -> String {
    ".defect-rca/reports".to_string()
}

fn default_subject() -> String {
    "Defect RCA".to_string()
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output_dir: default_output_dir(),
            subject: default_subject(),
        }
    }
}
