//! Event normalization and notification formatting for code-review webhooks.
//!
//! Pipeline for one inbound event:
//!
//! 1. [`normalize`] classifies the provider payload and builds a
//!    [`WebhookMessage`].
//! 2. [`render`] turns the message into a channel-agnostic
//!    [`RenderedNotification`].
//! 3. [`to_wire`] encodes it for Google Chat, Slack or Discord.
//!
//! Everything here is synchronous and free of I/O. Configuration is passed
//! in explicitly through [`FormatConfig`].

pub mod config;
pub mod destinations;
pub mod errors;
pub mod event_type;
pub mod message;
pub mod normalize;
pub mod provider;
pub mod render;

pub use config::{FormatConfig, Palette};
pub use destinations::{DestinationKind, to_wire};
pub use errors::{
    NormalizeError, RenderError, UnsupportedEventError, WebhookCoreError, WebhookCoreResult,
};
pub use event_type::{EventType, classify, classify_for};
pub use message::{Participant, SideData, WebhookMessage};
pub use normalize::normalize;
pub use provider::ProviderKind;
pub use render::{RenderedNotification, render};

/// Normalizes and renders in one step.
pub fn prepare(
    provider: ProviderKind,
    raw: &serde_json::Value,
    side: &SideData,
    cfg: &FormatConfig,
) -> WebhookCoreResult<(WebhookMessage, RenderedNotification)> {
    let msg = normalize(provider, raw, side, cfg)?;
    let rendered = render(&msg, cfg)?;
    Ok((msg, rendered))
}
