//! Canonical event kinds and the discriminator tables that map provider
//! vocabulary onto them.
//!
//! Every provider owns its own table. `classify_for` only consults the
//! table of the provider that produced the payload, so two providers can
//! never shadow each other. `classify` searches the union of all tables.

use serde::{Deserialize, Serialize};

use crate::{errors::UnsupportedEventError, provider::ProviderKind};

/// Closed set of events the bridge understands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    CreatedReview,
    ChangedReviewState,
    ChangedReviewerState,
    CreatedComment,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::CreatedReview => "created_review",
            EventType::ChangedReviewState => "changed_review_state",
            EventType::ChangedReviewerState => "changed_reviewer_state",
            EventType::CreatedComment => "created_comment",
        }
    }
}

const UPSOURCE_EVENTS: &[(&str, EventType)] = &[
    ("ReviewCreatedFeedEventBean", EventType::CreatedReview),
    ("ReviewStateChangedFeedEventBean", EventType::ChangedReviewState),
    (
        "ParticipantStateChangedFeedEventBean",
        EventType::ChangedReviewerState,
    ),
    ("DiscussionFeedEventBean", EventType::CreatedComment),
];

const GITLAB_EVENTS: &[(&str, EventType)] = &[
    ("merge_request", EventType::CreatedReview),
    ("note", EventType::CreatedComment),
];

// GitHub has no single discriminator field; the normalizer derives one of
// these keywords from `action` and the objects present in the payload.
const GITHUB_EVENTS: &[(&str, EventType)] = &[
    ("pr", EventType::CreatedReview),
    ("comment", EventType::CreatedComment),
];

/// Discriminator table owned by a single provider.
pub fn table_for(provider: ProviderKind) -> &'static [(&'static str, EventType)] {
    match provider {
        ProviderKind::Upsource => UPSOURCE_EVENTS,
        ProviderKind::GitLab => GITLAB_EVENTS,
        ProviderKind::GitHub => GITHUB_EVENTS,
    }
}

fn lookup(table: &[(&str, EventType)], discriminator: &str) -> Option<EventType> {
    table
        .iter()
        .find(|(key, _)| *key == discriminator)
        .map(|(_, event_type)| *event_type)
}

/// Classifies a discriminator against the union of all provider tables.
pub fn classify(discriminator: &str) -> Result<EventType, UnsupportedEventError> {
    ProviderKind::ALL
        .iter()
        .find_map(|p| lookup(table_for(*p), discriminator))
        .ok_or_else(|| UnsupportedEventError {
            provider: None,
            discriminator: discriminator.to_string(),
        })
}

/// Classifies a discriminator using only `provider`'s own table.
pub fn classify_for(
    provider: ProviderKind,
    discriminator: &str,
) -> Result<EventType, UnsupportedEventError> {
    lookup(table_for(provider), discriminator).ok_or_else(|| UnsupportedEventError {
        provider: Some(provider),
        discriminator: discriminator.to_string(),
    })
}
