//! Crate-wide error hierarchy for webhook-core.
//!
//! Every error here is terminal for the single event being processed.
//! Nothing in this crate performs I/O, so none of them are retryable.

use thiserror::Error;

use crate::{event_type::EventType, provider::ProviderKind};

/// Convenient alias for crate-wide results.
pub type WebhookCoreResult<T> = Result<T, WebhookCoreError>;

/// Root error type for the webhook-core crate.
#[derive(Debug, Error)]
pub enum WebhookCoreError {
    /// Payload could not be turned into a `WebhookMessage`.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// Message could not be turned into a chat notification.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// The discriminator is not present in the classification table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported event `{discriminator}`{}", provider_suffix(.provider))]
pub struct UnsupportedEventError {
    /// Provider whose table was consulted, `None` for the union table.
    pub provider: Option<ProviderKind>,
    /// The raw discriminator string as it appeared in the payload.
    pub discriminator: String,
}

fn provider_suffix(provider: &Option<ProviderKind>) -> String {
    provider
        .map(|p| format!(" for {}", p.as_str()))
        .unwrap_or_default()
}

/// Errors raised while extracting a `WebhookMessage` from a raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Event kind is not handled by this bridge.
    #[error(transparent)]
    UnsupportedEvent(#[from] UnsupportedEventError),

    /// A required payload field is missing or has the wrong JSON type.
    #[error("malformed payload: missing or invalid field `{field}`")]
    MalformedPayload {
        /// Dotted path of the offending field, e.g. `data.base.reviewId`.
        field: String,
    },
}

impl NormalizeError {
    pub(crate) fn malformed(field: impl Into<String>) -> Self {
        NormalizeError::MalformedPayload {
            field: field.into(),
        }
    }
}

/// Errors raised while rendering a message into a notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A state-change event arrived without the resulting state.
    #[error("{event_type:?} requires a new state but none was provided")]
    IncompleteStateTransition { event_type: EventType },

    /// A state integer is outside the closed state table for the event.
    #[error("unknown state {state} for {event_type:?}")]
    UnknownState { event_type: EventType, state: i64 },
}
