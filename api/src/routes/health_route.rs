use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::core::http::response_envelope::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> Response {
    ApiResponse::success(HealthResponse { status: "ok" }).into_response()
}
