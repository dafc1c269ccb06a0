use std::sync::Arc;

use ai_llm_service::OpenAiService;
use review_target::ReviewTarget;
use webhook_core::FormatConfig;

use crate::{core::app_config::AppConfig, error_handler::AppResult};

/// Shared state for all HTTP handlers and background tasks.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    /// Link base and palette handed to the formatter on every event.
    pub format: FormatConfig,
    /// Client for the configured review tool.
    pub target: ReviewTarget,
    /// Shared LLM client for AI reviews.
    pub llm: OpenAiService,
    /// Client for chat deliveries.
    pub http: reqwest::Client,
}

impl AppState {
    /// Builds every client from a validated configuration. No network I/O.
    pub fn from_config(config: AppConfig) -> AppResult<Arc<Self>> {
        let target = ReviewTarget::from_config(config.target.clone(), config.timeouts)?;
        let llm = OpenAiService::new(config.llm.clone())?;
        let http = reqwest::Client::builder()
            .user_agent("review-bridge/0.1")
            .connect_timeout(config.timeouts.connect)
            .read_timeout(config.timeouts.read)
            .build()
            .map_err(crate::error_handler::AppError::HttpClient)?;

        let format = FormatConfig {
            review_base_url: config.review_base_url.clone(),
            palette: config.palette.clone(),
        };

        Ok(Arc::new(Self {
            config,
            format,
            target,
            llm,
            http,
        }))
    }
}
