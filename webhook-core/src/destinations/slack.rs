//! Slack incoming webhook. Fields pass through as attachment metadata.

use serde::Serialize;

use crate::render::{Attachment, RenderedNotification};

#[derive(Debug, Serialize)]
pub struct SlackPayload<'a> {
    text: &'a str,
    attachments: &'a [Attachment],
}

pub fn payload(rendered: &RenderedNotification) -> SlackPayload<'_> {
    SlackPayload {
        text: &rendered.text,
        attachments: &rendered.attachments,
    }
}
