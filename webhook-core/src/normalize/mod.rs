//! Provider-specific payload normalization into `WebhookMessage`.
//!
//! One pure function per provider, selected by an explicit `ProviderKind`
//! tag. No network I/O happens here: side data is fetched by the caller.

mod github;
mod gitlab;
mod payload;
mod upsource;

use serde_json::Value;
use tracing::debug;

use crate::{
    config::FormatConfig,
    errors::NormalizeError,
    message::{SideData, WebhookMessage},
    provider::ProviderKind,
};

/// Builds the canonical message for a raw webhook payload.
///
/// # Errors
/// - [`NormalizeError::UnsupportedEvent`] when the provider's discriminator
///   is not in its table
/// - [`NormalizeError::MalformedPayload`] when a required field is absent
pub fn normalize(
    provider: ProviderKind,
    raw: &Value,
    side: &SideData,
    cfg: &FormatConfig,
) -> Result<WebhookMessage, NormalizeError> {
    let msg = match provider {
        ProviderKind::Upsource => upsource::from_upsource(raw, side, cfg),
        ProviderKind::GitLab => gitlab::from_gitlab(raw, side, cfg),
        ProviderKind::GitHub => github::from_github(raw, side, cfg),
    }?;

    debug!(
        provider = %provider,
        event_type = msg.event_type.as_str(),
        project = %msg.project_name,
        review_id = %msg.review_id,
        "payload normalized"
    );

    Ok(msg)
}
