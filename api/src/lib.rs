//! HTTP surface of the review bridge.
//!
//! Receives review-tool webhooks, forwards a chat notification and starts
//! the AI review for newly created reviews.

pub mod core {
    pub mod app_config;
    pub mod app_state;
    pub mod http {
        pub mod response_envelope;
    }
}
pub mod error_handler;
pub mod middleware_layer {
    pub mod body_logger;
}
pub mod notifier;
pub mod review;
pub mod routes {
    pub mod health_route;
    pub mod webhooks {
        pub mod github_webhook_route;
        pub mod gitlab_webhook_route;
        pub mod review_ref;
        pub mod upsource_webhook_route;
        pub mod webhook_dispatch;
        pub mod webhook_response;
    }
}

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tokio::signal;
use tracing::{error, info};

use crate::{
    core::{app_config::AppConfig, app_state::AppState},
    error_handler::{AppError, AppResult},
    middleware_layer::body_logger::log_bodies,
    routes::{
        health_route::health,
        webhooks::{
            github_webhook_route::github_webhook, gitlab_webhook_route::gitlab_webhook,
            upsource_webhook_route::upsource_webhook,
        },
    },
};

/// Builds the application router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhooks/upsource", get(upsource_webhook).post(upsource_webhook))
        .route("/webhooks/gitlab", get(gitlab_webhook).post(gitlab_webhook))
        .route("/webhooks/github", get(github_webhook).post(github_webhook))
        .layer(middleware::from_fn(log_bodies))
        .with_state(state)
}

/// Loads configuration, builds clients and serves until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let config = AppConfig::from_env()?;
    let address = config.api_address.clone();
    info!(
        tool = %config.tool,
        destination = %config.destination,
        model = %config.llm.model,
        "configuration loaded"
    );

    let state = AppState::from_config(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(AppError::Bind)?;
    info!(%address, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::core::app_config::tests::{lookup, with};

    fn gitlab_app() -> Router {
        let config = AppConfig::from_lookup(lookup(&with(&[
            ("CODE_REVIEW_TOOL", "gitlab"),
            ("GITLAB_BASE_URL", "https://gitlab.example.com"),
            ("GITLAB_ACCESS_TOKEN", "glpat"),
        ])))
        .unwrap();
        router(AppState::from_config(config).unwrap())
    }

    async fn call(app: Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        assert!(resp.headers().contains_key("X-Request-Id"));
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn merge_request(action: &str) -> String {
        json!({
            "object_kind": "merge_request",
            "event_type": "merge_request",
            "user": { "name": "alice" },
            "project": { "id": 15, "name": "proj1", "path_with_namespace": "team/proj1" },
            "object_attributes": { "iid": 42, "title": "Add login", "action": action }
        })
        .to_string()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = call(gitlab_app(), "GET", "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "data": { "status": "ok" } }));
    }

    #[tokio::test]
    async fn accepts_merge_request() {
        let (status, body) =
            call(gitlab_app(), "POST", "/webhooks/gitlab", &merge_request("close")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "accepted");
        assert_eq!(body["data"]["event_type"], "created_review");
    }

    #[tokio::test]
    async fn ignores_unsupported_event() {
        let push = json!({ "object_kind": "push", "event_type": "push" }).to_string();
        let (status, body) = call(gitlab_app(), "POST", "/webhooks/gitlab", &push).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!({ "status": "ignored" }));
    }

    #[tokio::test]
    async fn malformed_payload_is_422() {
        let mr = json!({ "event_type": "merge_request", "user": { "name": "alice" } }).to_string();
        let (status, body) = call(gitlab_app(), "POST", "/webhooks/gitlab", &mr).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "MALFORMED_PAYLOAD");
        assert_eq!(body["error"]["details"][0]["path"], "project.name");
    }

    #[tokio::test]
    async fn non_json_body_is_400() {
        let (status, body) = call(gitlab_app(), "POST", "/webhooks/gitlab", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn other_provider_is_409() {
        let (status, body) =
            call(gitlab_app(), "POST", "/webhooks/github", &merge_request("open")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "PROVIDER_NOT_CONFIGURED");
    }
}
