use std::sync::Arc;

use axum::{body::Bytes, extract::State, response::Response};
use tracing::instrument;
use webhook_core::ProviderKind;

use crate::{
    core::app_state::AppState, error_handler::AppResult,
    routes::webhooks::webhook_dispatch::handle_webhook,
};

/// POST /webhooks/gitlab
///
/// GitLab merge request and note hooks.
#[instrument(name = "gitlab_webhook_route", skip(state, body), fields(len = body.len()))]
pub async fn gitlab_webhook(State(state): State<Arc<AppState>>, body: Bytes) -> AppResult<Response> {
    handle_webhook(state, ProviderKind::GitLab, body).await
}
