//! Upsource feed-event webhooks.
//!
//! Payload shape (relevant parts):
//! ```json
//! {
//!   "projectId": "proj1",
//!   "dataType": "ReviewCreatedFeedEventBean",
//!   "data": {
//!     "base": {
//!       "reviewId": "PROJ1-CR-42",
//!       "actor": { "userId": "...", "userName": "alice" },
//!       "userIds": [ { "userId": "...", "userName": "bob" } ]
//!     },
//!     "participant": { "userId": "...", "userName": "bob" },
//!     "oldState": 0, "newState": 1,
//!     "commentText": "..."
//!   }
//! }
//! ```
//! Upsource does not send the review title; it comes from side data.

use serde_json::Value;

use crate::{
    config::FormatConfig,
    errors::NormalizeError,
    event_type::{EventType, classify_for},
    message::{SideData, WebhookMessage},
    normalize::payload::Payload,
    provider::ProviderKind,
};

pub(crate) fn from_upsource(
    raw: &Value,
    side: &SideData,
    cfg: &FormatConfig,
) -> Result<WebhookMessage, NormalizeError> {
    let p = Payload::new(raw);

    let event_type = classify_for(ProviderKind::Upsource, p.str("dataType")?)?;
    let project_name = p.str("projectId")?.to_string();

    // A participant state change is attributed to that participant.
    let participant = match event_type {
        EventType::ChangedReviewerState => p
            .opt_str("data.participant.userName")
            .or_else(|| p.opt_str("data.participant.userId")),
        _ => None,
    };
    let actor_name = participant
        .or_else(|| p.opt_str("data.base.actor.userName"))
        .or_else(|| p.opt_str("data.base.actor.userId"))
        .ok_or_else(|| NormalizeError::malformed("data.base.actor.userName"))?
        .to_string();

    // Discussions can be opened on a plain revision, outside any review.
    let review_id = match event_type {
        EventType::CreatedComment => p.opt_id("data.base.reviewId").unwrap_or_default(),
        _ => p.id("data.base.reviewId")?,
    };

    let comment = match event_type {
        EventType::CreatedComment => p.opt_str("data.commentText").map(str::to_string),
        _ => None,
    };

    let title = side
        .title()
        .map(str::to_string)
        .unwrap_or_else(|| review_id.clone());

    let url = ProviderKind::Upsource.review_link(&cfg.review_base_url, &project_name, &review_id);

    Ok(WebhookMessage {
        provider: ProviderKind::Upsource,
        title,
        project_path: project_name.clone(),
        project_name,
        event_type,
        actor_name,
        reviewers: p.joined_names("data.base.userIds", "userName"),
        review_id,
        old_state: p.opt_i64("data.oldState")?,
        new_state: p.opt_i64("data.newState")?,
        action: None,
        comment,
        url,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn cfg() -> FormatConfig {
        FormatConfig::new("https://upsource.example.com")
    }

    #[test]
    fn review_created() {
        let raw = json!({
            "projectId": "proj1",
            "dataType": "ReviewCreatedFeedEventBean",
            "data": {
                "base": {
                    "reviewId": "42",
                    "actor": { "userId": "u-1", "userName": "alice" },
                    "userIds": [
                        { "userId": "u-2", "userName": "bob" },
                        { "userId": "u-3", "userName": "carol" }
                    ]
                },
                "revisions": ["abc"]
            }
        });

        let msg = from_upsource(&raw, &SideData::with_title("Add login"), &cfg()).unwrap();
        assert_eq!(msg.event_type, EventType::CreatedReview);
        assert_eq!(msg.actor_name, "alice");
        assert_eq!(msg.project_name, "proj1");
        assert_eq!(msg.review_id, "42");
        assert_eq!(msg.title, "Add login");
        assert_eq!(msg.reviewers, "bob, carol");
        assert_eq!(msg.url, "https://upsource.example.com/proj1/review/42");
        assert_eq!(msg.comment, None);
        assert_eq!(msg.old_state, None);
    }

    #[test]
    fn missing_side_title_falls_back_to_review_id() {
        let raw = json!({
            "projectId": "proj1",
            "dataType": "ReviewStateChangedFeedEventBean",
            "data": {
                "base": { "reviewId": "PROJ1-CR-7", "actor": { "userName": "alice" } },
                "oldState": 0,
                "newState": 1
            }
        });

        let msg = from_upsource(&raw, &SideData::default(), &cfg()).unwrap();
        assert_eq!(msg.title, "PROJ1-CR-7");
        assert_eq!(msg.old_state, Some(0));
        assert_eq!(msg.new_state, Some(1));
        assert_eq!(msg.reviewers, "");
    }

    #[test]
    fn discussion_outside_review() {
        let raw = json!({
            "projectId": "proj1",
            "dataType": "DiscussionFeedEventBean",
            "data": {
                "base": { "actor": { "userName": "dave" } },
                "commentText": "looks odd"
            }
        });

        let msg = from_upsource(&raw, &SideData::default(), &cfg()).unwrap();
        assert_eq!(msg.event_type, EventType::CreatedComment);
        assert_eq!(msg.review_id, "");
        assert_eq!(msg.comment.as_deref(), Some("looks odd"));
        assert_eq!(msg.url, "https://upsource.example.com/proj1");
    }

    #[test]
    fn missing_review_id_is_malformed() {
        let raw = json!({
            "projectId": "proj1",
            "dataType": "ReviewCreatedFeedEventBean",
            "data": { "base": { "actor": { "userName": "alice" } } }
        });

        let err = from_upsource(&raw, &SideData::default(), &cfg()).unwrap_err();
        assert_eq!(err, NormalizeError::malformed("data.base.reviewId"));
    }

    #[test]
    fn unknown_bean_is_unsupported() {
        let raw = json!({
            "projectId": "proj1",
            "dataType": "RevisionAddedFeedEventBean",
            "data": {}
        });

        let err = from_upsource(&raw, &SideData::default(), &cfg()).unwrap_err();
        assert!(matches!(err, NormalizeError::UnsupportedEvent(_)));
    }

    #[test]
    fn participant_state_names_the_participant() {
        let mut raw = json!({
            "projectId": "proj1",
            "dataType": "ParticipantStateChangedFeedEventBean",
            "data": {
                "base": { "reviewId": "42", "actor": { "userName": "alice" } },
                "participant": { "userId": "u-2", "userName": "bob" },
                "oldState": 1,
                "newState": 2
            }
        });

        let msg = from_upsource(&raw, &SideData::default(), &cfg()).unwrap();
        assert_eq!(msg.event_type, EventType::ChangedReviewerState);
        assert_eq!(msg.actor_name, "bob");

        raw["data"]["participant"] = json!({ "userId": "u-2" });
        let msg = from_upsource(&raw, &SideData::default(), &cfg()).unwrap();
        assert_eq!(msg.actor_name, "u-2");

        raw["data"].as_object_mut().unwrap().remove("participant");
        let msg = from_upsource(&raw, &SideData::default(), &cfg()).unwrap();
        assert_eq!(msg.actor_name, "alice");
    }
}
