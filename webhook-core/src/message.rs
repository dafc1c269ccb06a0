//! Provider-agnostic message model produced by normalization.

use serde::{Deserialize, Serialize};

use crate::{event_type::EventType, provider::ProviderKind};

/// Canonical description of one inbound review event.
///
/// Built once by a provider normalizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub provider: ProviderKind,
    pub title: String,
    pub project_name: String,
    /// Project part of the tool's web paths (`team/proj1`, `octo/proj1`,
    /// Upsource project id).
    pub project_path: String,
    pub event_type: EventType,
    /// User who triggered the event.
    pub actor_name: String,
    /// Display names joined with `", "`, empty when nobody is assigned.
    pub reviewers: String,
    /// Provider-native review identifier. Empty only for comments that
    /// were made outside of a review.
    pub review_id: String,
    pub old_state: Option<i64>,
    pub new_state: Option<i64>,
    /// Provider action keyword (`open`, `update`, `opened`, ...).
    pub action: Option<String>,
    /// Comment body, only set for comment events.
    pub comment: Option<String>,
    /// Deep link to the review or comment.
    pub url: String,
}

impl WebhookMessage {
    /// Whether this event should start an AI review.
    ///
    /// Only new reviews qualify. GitLab reports every merge request change
    /// as `merge_request`, so closing or merging actions are excluded.
    pub fn wants_ai_review(&self) -> bool {
        self.event_type == EventType::CreatedReview
            && !matches!(
                self.action.as_deref(),
                Some("close" | "closed" | "merge" | "merged")
            )
    }
}

/// A participant record fetched by a REST collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub display_name: String,
}

impl Participant {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

/// Review details fetched before normalization.
///
/// Both parts are optional: a failed or slow fetch is passed in as
/// `SideData::default()` and normalizers fall back to payload data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideData {
    pub title: Option<String>,
    pub participants: Vec<Participant>,
}

impl SideData {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            participants: Vec::new(),
        }
    }

    /// Non-blank title, if any.
    pub(crate) fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub(crate) fn joined_participants(&self) -> String {
        self.participants
            .iter()
            .map(|p| p.display_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
