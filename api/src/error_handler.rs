use ai_llm_service::AiLlmError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use review_target::ReviewTargetError;
use thiserror::Error;
use webhook_core::{NormalizeError, RenderError};

use crate::core::{
    app_config::ConfigError,
    http::response_envelope::{ApiErrorDetail, ApiResponse},
};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("review tool client: {0}")]
    Target(#[from] ReviewTargetError),

    #[error("llm client: {0}")]
    Llm(#[from] AiLlmError),

    #[error("failed to build http client")]
    HttpClient(#[source] reqwest::Error),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
        path: Option<String>,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Http { status, .. } => *status,

            // startup-only
            AppError::Config(_)
            | AppError::Target(_)
            | AppError::Llm(_)
            | AppError::HttpClient(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Target(_) => "REVIEW_TOOL_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::HttpClient(_) => "HTTP_CLIENT_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            AppError::Http {
                path: Some(path), ..
            } => vec![ApiErrorDetail {
                path: Some(path.clone()),
                hint: None,
            }],
            _ => Vec::new(),
        };
        ApiResponse::<()>::error(self.error_code(), self.to_string(), details)
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Unsupported events never reach this conversion; handlers acknowledge
/// them before mapping errors.
impl From<NormalizeError> for AppError {
    fn from(err: NormalizeError) -> Self {
        let path = match &err {
            NormalizeError::MalformedPayload { field } => Some(field.clone()),
            NormalizeError::UnsupportedEvent(_) => None,
        };
        AppError::Http {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: "MALFORMED_PAYLOAD",
            message: err.to_string(),
            path,
        }
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Http {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: "RENDER_FAILED",
            message: err.to_string(),
            path: None,
        }
    }
}
