//! GitLab merge request and note hooks.
//!
//! * Merge request hook: `object_kind`/`event_type` = `merge_request`,
//!   `object_attributes { iid, title, source_branch, target_branch, action, url }`,
//!   `reviewers [ { name } ]`.
//! * Note hook: `event_type` = `note`, `object_attributes { note, url }`,
//!   optional `merge_request { iid, title }`.

use serde_json::Value;

use crate::{
    config::FormatConfig,
    errors::NormalizeError,
    event_type::{EventType, classify_for},
    message::{SideData, WebhookMessage},
    normalize::payload::Payload,
    provider::ProviderKind,
};

pub(crate) fn from_gitlab(
    raw: &Value,
    side: &SideData,
    cfg: &FormatConfig,
) -> Result<WebhookMessage, NormalizeError> {
    let p = Payload::new(raw);

    let discriminator = p
        .opt_str("event_type")
        .or_else(|| p.opt_str("object_kind"))
        .ok_or_else(|| NormalizeError::malformed("event_type"))?;
    let event_type = classify_for(ProviderKind::GitLab, discriminator)?;

    let project_name = p.str("project.name")?.to_string();
    let project_path = p
        .opt_str("project.path_with_namespace")
        .unwrap_or(project_name.as_str())
        .to_string();

    let actor_name = p
        .opt_str("user.name")
        .or_else(|| p.opt_str("user.username"))
        .ok_or_else(|| NormalizeError::malformed("user.name"))?
        .to_string();

    let (review_id, title, action, comment) = match event_type {
        EventType::CreatedComment => {
            let review_id = p.opt_id("merge_request.iid").unwrap_or_default();
            let title = side
                .title()
                .or_else(|| p.opt_str("merge_request.title"))
                .unwrap_or(project_name.as_str())
                .to_string();
            let comment = p.str("object_attributes.note")?.to_string();
            (review_id, title, None, Some(comment))
        }
        _ => {
            let review_id = p.id("object_attributes.iid")?;
            let title = match side.title().or_else(|| p.opt_str("object_attributes.title")) {
                Some(t) => t.to_string(),
                None => format!(
                    "{} into {}",
                    p.str("object_attributes.source_branch")?,
                    p.str("object_attributes.target_branch")?
                ),
            };
            let action = p.opt_str("object_attributes.action").map(str::to_string);
            (review_id, title, action, None)
        }
    };

    let url = match p.opt_str("object_attributes.url") {
        Some(u) => u.to_string(),
        None => ProviderKind::GitLab.review_link(&cfg.review_base_url, &project_path, &review_id),
    };

    let reviewers = if side.participants.is_empty() {
        p.joined_names("reviewers", "name")
    } else {
        side.joined_participants()
    };

    Ok(WebhookMessage {
        provider: ProviderKind::GitLab,
        title,
        project_name,
        project_path,
        event_type,
        actor_name,
        reviewers,
        review_id,
        old_state: None,
        new_state: None,
        action,
        comment,
        url,
    })
}
