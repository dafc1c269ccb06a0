//! Discord incoming webhook.
//!
//! Fields become inline embed fields and the color is sent as an integer.
//! Discord rejects long messages, so the combined length of content, field
//! names and field values is capped at [`DISCORD_MAX_LEN`] characters.

use std::iter;

use serde::Serialize;

use crate::render::RenderedNotification;

pub const DISCORD_MAX_LEN: usize = 2000;
pub const ELLIPSIS: char = '…';
/// Used when the rendered color is not a valid hex triplet.
pub const DEFAULT_DISCORD_COLOR: u32 = 1_127_128;

#[derive(Debug, Serialize)]
pub struct DiscordPayload {
    pub content: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Serialize)]
pub struct Embed {
    pub fields: Vec<EmbedField>,
    pub color: u32,
}

#[derive(Debug, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl DiscordPayload {
    /// Length in characters, as counted against [`DISCORD_MAX_LEN`].
    pub fn len(&self) -> usize {
        self.content.chars().count()
            + self
                .embeds
                .iter()
                .flat_map(|e| &e.fields)
                .map(|f| f.name.chars().count() + f.value.chars().count())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn payload(rendered: &RenderedNotification) -> DiscordPayload {
    let fields = rendered
        .fields()
        .iter()
        .map(|f| EmbedField {
            name: f.title.clone(),
            value: f.value.clone(),
            inline: true,
        })
        .collect();

    let mut out = DiscordPayload {
        content: rendered.text.clone(),
        embeds: vec![Embed {
            fields,
            color: parse_color(rendered.color()),
        }],
    };
    fit_to_limit(&mut out);
    out
}

fn parse_color(hex: &str) -> u32 {
    u32::from_str_radix(hex.trim().trim_start_matches('#'), 16)
        .ok()
        .filter(|c| *c <= 0xFF_FFFF)
        .unwrap_or(DEFAULT_DISCORD_COLOR)
}

/// Truncates the body until the payload fits. The comment is cut first,
/// then the content, then the remaining field values from last to first.
fn fit_to_limit(payload: &mut DiscordPayload) {
    let mut excess = payload.len().saturating_sub(DISCORD_MAX_LEN);
    if excess == 0 {
        return;
    }

    let DiscordPayload { content, embeds } = payload;
    let fields: Vec<&mut EmbedField> = embeds.iter_mut().flat_map(|e| &mut e.fields).collect();

    let (comment, others): (Vec<_>, Vec<_>) =
        fields.into_iter().partition(|f| f.name == "Comment");

    let mut targets: Vec<&mut String> = comment.into_iter().map(|f| &mut f.value).collect();
    targets.push(content);
    targets.extend(others.into_iter().rev().map(|f| &mut f.value));

    for target in targets {
        if excess == 0 {
            break;
        }
        excess = shrink(target, excess);
    }
}

/// Shortens `s` by up to `excess` characters and marks the cut with
/// [`ELLIPSIS`]. Returns the excess that is still left.
fn shrink(s: &mut String, excess: usize) -> usize {
    let len = s.chars().count();
    if len <= 1 {
        return excess;
    }
    let keep = len.saturating_sub(excess + 1);
    let removed = len - (keep + 1);
    *s = s.chars().take(keep).chain(iter::once(ELLIPSIS)).collect();
    excess.saturating_sub(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Attachment, Field};

    fn rendered(text: &str, comment: Option<&str>) -> RenderedNotification {
        let mut fields = vec![
            Field { title: "Project".into(), value: "proj1".into(), short: Some(true) },
            Field { title: "Participant(s)".into(), value: "bob".into(), short: Some(true) },
        ];
        if let Some(c) = comment {
            fields.push(Field { title: "Comment".into(), value: c.into(), short: None });
        }
        fields.push(Field { title: "link".into(), value: "<https://x/proj1/review/1>".into(), short: None });

        RenderedNotification {
            text: text.into(),
            attachments: vec![Attachment {
                fallback: text.into(),
                fields,
                color: "#3AA3E3".into(),
            }],
            thread_key: "1".into(),
        }
    }

    #[test]
    fn maps_fields_to_inline_embed() {
        let out = payload(&rendered("*alice* commented on *proj1*", Some("ok")));
        assert_eq!(out.content, "*alice* commented on *proj1*");
        assert_eq!(out.embeds[0].fields.len(), 4);
        assert!(out.embeds[0].fields.iter().all(|f| f.inline));
        assert_eq!(out.embeds[0].color, 0x3A_A3E3);
    }

    #[test]
    fn long_comment_is_truncated_with_ellipsis() {
        let comment = "x".repeat(5000);
        let out = payload(&rendered("*alice* commented on *proj1*", Some(&comment)));

        let value = &out.embeds[0].fields[2].value;
        assert!(value.ends_with(ELLIPSIS));
        assert!(value.chars().count() < 5000);
        assert!(out.len() <= DISCORD_MAX_LEN);
        assert_eq!(out.content, "*alice* commented on *proj1*");
        assert_eq!(out.embeds[0].fields[3].value, "<https://x/proj1/review/1>");
    }

    #[test]
    fn long_text_without_comment_truncates_content() {
        let text = "t".repeat(3000);
        let out = payload(&rendered(&text, None));
        assert!(out.content.ends_with(ELLIPSIS));
        assert!(out.len() <= DISCORD_MAX_LEN);
    }

    #[test]
    fn short_payload_is_untouched() {
        let out = payload(&rendered("hi", Some("short")));
        assert_eq!(out.embeds[0].fields[2].value, "short");
        assert!(!out.content.ends_with(ELLIPSIS));
    }

    #[test]
    fn invalid_color_falls_back() {
        assert_eq!(parse_color("#F35A00"), 0xF3_5A00);
        assert_eq!(parse_color("orange"), DEFAULT_DISCORD_COLOR);
        assert_eq!(parse_color("#FFFFFFFF"), DEFAULT_DISCORD_COLOR);
    }
}
