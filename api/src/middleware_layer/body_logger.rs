//! Logs inbound webhook bodies and the answers sent back, at `debug`.
//!
//! Every response carries an `X-Request-Id`. The id is taken from the
//! caller when it sends one (including the delivery ids GitLab and GitHub
//! attach), otherwise generated.

use axum::{
    body::{Body, Bytes, to_bytes},
    http::{HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{Level, debug, enabled, warn};

use crate::error_handler::AppError;

/// Webhook bodies above this size are refused.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

const REQUEST_ID_HEADERS: [&str; 3] = ["X-Request-Id", "X-Gitlab-Event-UUID", "X-GitHub-Delivery"];

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    (parts, bytes)
}

fn request_id(headers: &HeaderMap) -> String {
    REQUEST_ID_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|h| h.to_str().ok())
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let nanos = Utc::now()
                .timestamp_nanos_opt()
                .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
            format!("req-{nanos}")
        })
}

pub async fn log_bodies(req: Request<Body>, next: Next) -> Response {
    let id = request_id(req.headers());
    let (parts, body) = req.into_parts();

    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(err) => {
            warn!(request_id = %id, error = %err, "failed to read request body");
            return AppError::Http {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                code: "PAYLOAD_TOO_LARGE",
                message: format!("request body could not be read: {err}"),
                path: None,
            }
            .into_response();
        }
    };

    if enabled!(Level::DEBUG) {
        debug!(
            request_id = %id,
            method = %parts.method,
            uri = %parts.uri,
            body = %String::from_utf8_lossy(&bytes),
            "webhook received"
        );
    }

    let res = next.run(Request::from_parts(parts, Body::from(bytes))).await;
    let (mut parts, bytes) = take_body(res).await;

    if enabled!(Level::DEBUG) {
        debug!(
            request_id = %id,
            status = %parts.status,
            body = %String::from_utf8_lossy(&bytes),
            "webhook answered"
        );
    }

    if let Ok(v) = HeaderValue::from_str(&id) {
        parts.headers.insert("X-Request-Id", v);
    }

    Response::from_parts(parts, Body::from(bytes))
}
