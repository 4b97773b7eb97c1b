//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::prompts::PromptCatalog;
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Whether strict validation applies
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion-backend configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Embedding-backend configuration
    #[serde(default)]
    pub embedding: EmbeddingSettings,

    /// Vector-search and retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalSettings,

    /// Prompt and annotation catalog
    #[serde(default)]
    pub prompts: PromptCatalog,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS origin checking
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins; empty means localhost-only
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Completion-backend settings (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// API endpoint
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Maximum tokens to generate per reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Top-p sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Per-request timeout in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_default()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> usize {
    256
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

fn default_llm_timeout_secs() -> u64 {
    30
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: default_api_key(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// Embedding-backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// API endpoint
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Embedding dimension
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_embedding_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dim() -> usize {
    1536
}

fn default_embedding_timeout_secs() -> u64 {
    10
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: default_api_key(),
            model: default_embedding_model(),
            embedding_dim: default_embedding_dim(),
            timeout_secs: default_embedding_timeout_secs(),
        }
    }
}

/// Vector-search and retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Qdrant endpoint
    #[serde(default = "default_qdrant_endpoint")]
    pub endpoint: String,

    /// Qdrant API key (optional)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Collection holding the knowledge base
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Vector dimension; must match the embedding model
    #[serde(default = "default_embedding_dim")]
    pub vector_dim: usize,

    /// Number of candidates to fetch per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum similarity score for a passage to count as a match
    #[serde(default)]
    pub min_score: f32,
}

fn default_qdrant_endpoint() -> String {
    "http://localhost:6334".to_string()
}

fn default_collection() -> String {
    "support_knowledge".to_string()
}

fn default_top_k() -> usize {
    3
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            endpoint: default_qdrant_endpoint(),
            api_key: None,
            collection: default_collection(),
            vector_dim: default_embedding_dim(),
            top_k: default_top_k(),
            min_score: 0.0,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port must be non-zero".into()));
        }
        if self.llm.model.is_empty() {
            return Err(ConfigError::Validation("llm.model must be set".into()));
        }
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::Validation("retrieval.top_k must be at least 1".into()));
        }
        if self.environment.is_strict() && self.llm.api_key.is_empty() {
            return Err(ConfigError::Validation(
                "llm.api_key is required outside development".into(),
            ));
        }
        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder().add_source(File::with_name("config/default").required(false));

    if let Some(env) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env)).required(false));
    }

    let config = builder
        .add_source(Environment::with_prefix("SUPPORT_AGENT").separator("__"))
        .build()?;

    let settings: Settings = config.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}
