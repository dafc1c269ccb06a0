//! OpenAI chat-completion client used to generate code reviews.
//!
//! Configuration is read once at startup via [`config_openai`], then a
//! single [`OpenAiService`] is shared by all review tasks.

pub mod config {
    pub mod default_config;
    pub mod llm_model_config;
}
pub mod error_handler;
pub mod services {
    pub mod open_ai_service;
}

pub use config::{default_config::config_openai, llm_model_config::LlmModelConfig};
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use services::open_ai_service::OpenAiService;
