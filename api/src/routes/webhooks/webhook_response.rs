use serde::Serialize;

/// Acknowledgement returned to the review tool.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    /// `accepted` or `ignored`.
    pub status: &'static str,
    /// Classified event, only for accepted deliveries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<&'static str>,
}

impl WebhookAck {
    pub fn accepted(event_type: &'static str) -> Self {
        Self {
            status: "accepted",
            event_type: Some(event_type),
        }
    }

    pub fn ignored() -> Self {
        Self {
            status: "ignored",
            event_type: None,
        }
    }
}
