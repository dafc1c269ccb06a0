//! Shared handling for every provider webhook route.

use std::sync::Arc;

use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use review_target::{ReviewDetails, ReviewRef};
use serde_json::Value;
use tracing::{debug, error, info, warn};
use webhook_core::{
    NormalizeError, Participant, ProviderKind, RenderedNotification, SideData, WebhookMessage,
    normalize, render,
};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    notifier,
    review::{self, ReviewSettings},
    routes::webhooks::{review_ref::extract_review_ref, webhook_response::WebhookAck},
};

/// Tools whose payloads lack the title or reviewer names.
fn needs_side_data(provider: ProviderKind) -> bool {
    matches!(provider, ProviderKind::Upsource | ProviderKind::GitHub)
}

fn side_data(details: ReviewDetails) -> SideData {
    SideData {
        title: details.title,
        participants: details.participants.into_iter().map(Participant::new).collect(),
    }
}

/// Side data for `review`, or empty side data when the fetch fails.
async fn fetch_side_data(state: &AppState, review: &ReviewRef) -> SideData {
    match state.target.fetch_review_details(review).await {
        Ok(details) => side_data(details),
        Err(err) => {
            warn!(
                project = %review.project,
                review_id = %review.review_id,
                error = %err,
                "review details unavailable, using payload data only"
            );
            SideData::default()
        }
    }
}

/// Parse, normalize, render, then hand off delivery and the AI review.
pub async fn handle_webhook(
    state: Arc<AppState>,
    provider: ProviderKind,
    body: Bytes,
) -> AppResult<Response> {
    if provider != state.config.tool {
        return Err(AppError::Http {
            status: StatusCode::CONFLICT,
            code: "PROVIDER_NOT_CONFIGURED",
            message: format!("this instance serves {}, not {provider}", state.config.tool),
            path: None,
        });
    }

    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("body is not valid JSON: {e}")))?;

    // Unsupported events are acknowledged before any review tool request.
    let probe = match normalize(provider, &raw, &SideData::default(), &state.format) {
        Ok(msg) => msg,
        Err(NormalizeError::UnsupportedEvent(err)) => {
            info!(%provider, discriminator = %err.discriminator, "event ignored");
            return Ok(ApiResponse::success(WebhookAck::ignored()).into_response());
        }
        Err(err) => {
            warn!(%provider, error = %err, "malformed webhook payload");
            return Err(err.into());
        }
    };

    let review_ref = extract_review_ref(provider, &raw);
    let msg = match (&review_ref, needs_side_data(provider)) {
        (Some(review), true) => {
            let side = fetch_side_data(&state, review).await;
            normalize(provider, &raw, &side, &state.format)?
        }
        _ => probe,
    };

    let rendered = render(&msg, &state.format).inspect_err(|err| {
        warn!(%provider, error = %err, "failed to render notification");
    })?;

    spawn_delivery(state.clone(), rendered);

    if msg.wants_ai_review() {
        match review_ref {
            Some(review) => spawn_ai_review(state.clone(), review),
            None => warn!(%provider, "created review without review coordinates, skipping AI review"),
        }
    }

    info!(
        %provider,
        event_type = msg.event_type.as_str(),
        project = %msg.project_name,
        review_id = %msg.review_id,
        "webhook accepted"
    );

    Ok(ApiResponse::success(accepted(&msg)).into_response())
}

fn accepted(msg: &WebhookMessage) -> WebhookAck {
    WebhookAck::accepted(msg.event_type.as_str())
}

fn spawn_delivery(state: Arc<AppState>, rendered: RenderedNotification) {
    tokio::spawn(async move {
        let cfg = &state.config;
        let sent = notifier::deliver(&state.http, cfg.destination, &cfg.webhook_uri, &rendered);
        if let Err(err) = sent.await {
            error!(error = %err, "chat notification failed");
        }
    });
}

fn spawn_ai_review(state: Arc<AppState>, review: ReviewRef) {
    tokio::spawn(async move {
        let settings = ReviewSettings {
            review_files: &state.config.review_files,
            language: &state.config.review_language,
        };
        match review::run_ai_review(&state.target, &state.llm, &review, settings).await {
            Ok(outcome) => debug!(?outcome, "AI review finished"),
            Err(err) => error!(
                project = %review.project,
                review_id = %review.review_id,
                error = %err,
                "AI review failed"
            ),
        }
    });
}
