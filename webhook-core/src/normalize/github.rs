//! GitHub pull request, issue comment and review hooks.
//!
//! GitHub carries no single event-kind field in the body, so a
//! discriminator keyword is derived from `action` and the objects present:
//!
//! | action                  | object                      | keyword   |
//! |-------------------------|-----------------------------|-----------|
//! | `opened`                | `pull_request`              | `pr`      |
//! | `created` / `submitted` | `comment` or `review`       | `comment` |
//! | anything else           |                             | `none`    |

use serde_json::Value;

use crate::{
    config::FormatConfig,
    errors::NormalizeError,
    event_type::{EventType, classify_for},
    message::{SideData, WebhookMessage},
    normalize::payload::Payload,
    provider::ProviderKind,
};

fn discriminator(p: &Payload<'_>, action: Option<&str>) -> &'static str {
    match action {
        Some("opened") if p.has("pull_request") => "pr",
        Some("created" | "submitted") if p.has("comment") || p.has("review") => "comment",
        _ => "none",
    }
}

pub(crate) fn from_github(
    raw: &Value,
    side: &SideData,
    cfg: &FormatConfig,
) -> Result<WebhookMessage, NormalizeError> {
    let p = Payload::new(raw);

    let action = p.opt_str("action");
    let event_type = classify_for(ProviderKind::GitHub, discriminator(&p, action))?;

    let project_name = p.str("repository.full_name")?.to_string();
    let actor_name = p.str("sender.login")?.to_string();

    let (review_id, deep_link, comment) = match event_type {
        EventType::CreatedComment => {
            let review_id = p
                .opt_id("pull_request.number")
                .or_else(|| p.opt_id("issue.number"))
                .unwrap_or_default();
            let deep_link = p
                .opt_str("comment.html_url")
                .or_else(|| p.opt_str("review.html_url"));
            let comment = p
                .opt_str("comment.body")
                .or_else(|| p.opt_str("review.body"))
                .map(str::to_string);
            (review_id, deep_link, comment)
        }
        _ => (
            p.id("pull_request.number")?,
            p.opt_str("pull_request.html_url"),
            None,
        ),
    };

    let title = side
        .title()
        .or_else(|| p.opt_str("pull_request.title"))
        .or_else(|| p.opt_str("issue.title"))
        .unwrap_or(project_name.as_str())
        .to_string();

    let url = match deep_link {
        Some(u) => u.to_string(),
        None => ProviderKind::GitHub.review_link(&cfg.review_base_url, &project_name, &review_id),
    };

    let reviewers = if side.participants.is_empty() {
        p.joined_names("pull_request.requested_reviewers", "login")
    } else {
        side.joined_participants()
    };

    Ok(WebhookMessage {
        provider: ProviderKind::GitHub,
        title,
        project_path: project_name.clone(),
        project_name,
        event_type,
        actor_name,
        reviewers,
        review_id,
        old_state: None,
        new_state: None,
        action: action.map(str::to_string),
        comment,
        url,
    })
}
