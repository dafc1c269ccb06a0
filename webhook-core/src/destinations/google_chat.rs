//! Google Chat incoming webhook.
//!
//! Google Chat has no attachment fields, so they are flattened into the
//! text as `Title: value` lines. Messages about the same review share a
//! thread keyed by the review id; messages without a review are unthreaded.

use serde::Serialize;

use crate::render::RenderedNotification;

#[derive(Debug, Serialize)]
pub struct GoogleChatPayload {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thread: Option<Thread>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Thread {
    thread_key: String,
}

pub fn payload(rendered: &RenderedNotification) -> GoogleChatPayload {
    let mut text = rendered.text.clone();
    for field in rendered.fields() {
        text.push('\n');
        text.push_str(&field.title);
        text.push_str(": ");
        text.push_str(&field.value);
    }

    GoogleChatPayload {
        text,
        thread: (!rendered.thread_key.is_empty()).then(|| Thread {
            thread_key: rendered.thread_key.clone(),
        }),
    }
}
