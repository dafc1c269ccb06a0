//! Channel-agnostic rendering of a `WebhookMessage`.
//!
//! The output mirrors a Slack-style message (text plus one attachment with
//! ordered fields and a color). Destination adapters in
//! [`crate::destinations`] re-shape it for each chat service.
//!
//! Field order per event type:
//!
//! | event                  | fields                                    |
//! |------------------------|-------------------------------------------|
//! | `CreatedReview`        | Project, Participant(s), link             |
//! | `ChangedReviewState`   | Project, Changed by, link                 |
//! | `ChangedReviewerState` | Project, Participant(s), link             |
//! | `CreatedComment`       | Project, Participant(s), Comment, link    |

pub mod states;

use serde::Serialize;

use crate::{
    config::FormatConfig,
    errors::RenderError,
    event_type::EventType,
    message::WebhookMessage,
};

use self::states::{ParticipantState, ReviewState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<bool>,
}

impl Field {
    fn short(title: &str, value: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short: Some(true),
        }
    }

    fn long(title: &str, value: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short: None,
        }
    }

    fn link(url: &str) -> Self {
        Self::long("link", format!("<{url}>"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub fallback: String,
    pub fields: Vec<Field>,
    pub color: String,
}

/// Rendered notification. `attachments` always holds exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNotification {
    pub text: String,
    pub attachments: Vec<Attachment>,
    /// Review id, used by destinations that group messages into threads.
    #[serde(skip)]
    pub thread_key: String,
}

impl RenderedNotification {
    fn new(text: String, fields: Vec<Field>, color: &str, thread_key: &str) -> Self {
        Self {
            attachments: vec![Attachment {
                fallback: text.clone(),
                fields,
                color: color.to_string(),
            }],
            text,
            thread_key: thread_key.to_string(),
        }
    }

    pub fn fields(&self) -> &[Field] {
        self.attachments
            .first()
            .map(|a| a.fields.as_slice())
            .unwrap_or_default()
    }

    pub fn color(&self) -> &str {
        self.attachments
            .first()
            .map(|a| a.color.as_str())
            .unwrap_or_default()
    }
}

/// Renders a message into the channel-agnostic notification.
///
/// # Errors
/// - [`RenderError::IncompleteStateTransition`] when a state event has no
///   `new_state`
/// - [`RenderError::UnknownState`] when a state code is outside its table
pub fn render(msg: &WebhookMessage, cfg: &FormatConfig) -> Result<RenderedNotification, RenderError> {
    match msg.event_type {
        EventType::CreatedReview => Ok(created_review(msg, cfg)),
        EventType::ChangedReviewState => changed_review_state(msg, cfg),
        EventType::ChangedReviewerState => changed_reviewer_state(msg, cfg),
        EventType::CreatedComment => Ok(created_comment(msg, cfg)),
    }
}

fn created_review(msg: &WebhookMessage, cfg: &FormatConfig) -> RenderedNotification {
    let text = format!(
        "*{}* created a review: *{}* ({})",
        msg.actor_name, msg.title, msg.review_id
    );
    let fields = vec![
        Field::short("Project", &msg.project_name),
        Field::short("Participant(s)", &msg.reviewers),
        Field::link(&msg.url),
    ];
    RenderedNotification::new(text, fields, &cfg.palette.accent, &msg.review_id)
}

/// Resolves `(old, new)` through a state table. `old` is `None` only when
/// the message carries no old state at all.
fn transition<S: Copy>(
    msg: &WebhookMessage,
    from_code: fn(i64) -> Option<S>,
) -> Result<(Option<S>, S), RenderError> {
    let lookup = |code: i64| {
        from_code(code).ok_or(RenderError::UnknownState {
            event_type: msg.event_type,
            state: code,
        })
    };

    let new_code = msg.new_state.ok_or(RenderError::IncompleteStateTransition {
        event_type: msg.event_type,
    })?;
    let new = lookup(new_code)?;
    let old = msg.old_state.map(lookup).transpose()?;
    Ok((old, new))
}

fn changed_review_state(
    msg: &WebhookMessage,
    cfg: &FormatConfig,
) -> Result<RenderedNotification, RenderError> {
    let (old, new) = transition(msg, ReviewState::from_code)?;

    let change = match old {
        Some(old) => format!("from {} to {}", old.label(), new.label()),
        None => format!("to {}", new.label()),
    };
    let text = format!(
        "Review state changed {change}: *{}* ({})",
        msg.title, msg.review_id
    );
    let fields = vec![
        Field::short("Project", &msg.project_name),
        Field::short("Changed by", &msg.actor_name),
        Field::link(&msg.url),
    ];
    let color = match new {
        ReviewState::Closed => &cfg.palette.resolved,
        ReviewState::Open => &cfg.palette.accent,
    };
    Ok(RenderedNotification::new(text, fields, color, &msg.review_id))
}

fn changed_reviewer_state(
    msg: &WebhookMessage,
    cfg: &FormatConfig,
) -> Result<RenderedNotification, RenderError> {
    let (old, new) = transition(msg, ParticipantState::from_code)?;

    let change = match old {
        Some(old) => format!("from {} to {}", old.label(), new.label()),
        None => format!("to {}", new.label()),
    };
    let text = format!(
        "*{}* changed participant state {change}: *{}* ({})",
        msg.actor_name, msg.title, msg.review_id
    );
    let fields = vec![
        Field::short("Project", &msg.project_name),
        Field::short("Participant(s)", &msg.reviewers),
        Field::link(&msg.url),
    ];
    let color = match new {
        ParticipantState::Rejected => &cfg.palette.accent,
        _ => &cfg.palette.resolved,
    };
    Ok(RenderedNotification::new(text, fields, color, &msg.review_id))
}

fn created_comment(msg: &WebhookMessage, cfg: &FormatConfig) -> RenderedNotification {
    // Comments may have no review; link to the project in that case.
    let url = msg
        .provider
        .review_link(&cfg.review_base_url, &msg.project_path, &msg.review_id);

    let text = format!("*{}* commented on *{}*", msg.actor_name, msg.project_name);
    let fields = vec![
        Field::short("Project", &msg.project_name),
        Field::short("Participant(s)", &msg.reviewers),
        Field::long("Comment", msg.comment.clone().unwrap_or_default()),
        Field::link(&url),
    ];
    RenderedNotification::new(text, fields, &cfg.palette.comment, &msg.review_id)
}
