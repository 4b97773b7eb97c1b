//! Configuration for the support agent
//!
//! Settings are layered: struct defaults, then `config/default.yaml`, then an
//! environment-specific `config/{env}.yaml`, then `SUPPORT_AGENT__*` variables.

pub mod prompts;
pub mod settings;

pub use prompts::PromptCatalog;
pub use settings::{
    load_settings, EmbeddingSettings, LlmSettings, RetrievalSettings, RuntimeEnvironment,
    ServerConfig, Settings,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
