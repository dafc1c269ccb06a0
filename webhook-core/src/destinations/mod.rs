//! Wire encodings of a `RenderedNotification` for each chat service.
//!
//! All adapters consume the same rendered notification and differ only in
//! envelope shape.

pub mod discord;
pub mod google_chat;
pub mod slack;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::render::RenderedNotification;

/// Supported incoming-webhook destinations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DestinationKind {
    GoogleChat,
    Slack,
    Discord,
}

impl DestinationKind {
    /// Name used by the `WEBHOOK` setting.
    pub fn as_str(self) -> &'static str {
        match self {
            DestinationKind::GoogleChat => "google-chat",
            DestinationKind::Slack => "slack",
            DestinationKind::Discord => "discord",
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown webhook destination `{0}` (expected google-chat, slack or discord)")]
pub struct UnknownDestination(pub String);

impl FromStr for DestinationKind {
    type Err = UnknownDestination;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google-chat" => Ok(DestinationKind::GoogleChat),
            "slack" => Ok(DestinationKind::Slack),
            "discord" => Ok(DestinationKind::Discord),
            other => Err(UnknownDestination(other.to_string())),
        }
    }
}

/// Encodes a rendered notification as the JSON body for `destination`.
pub fn to_wire(
    rendered: &RenderedNotification,
    destination: DestinationKind,
) -> serde_json::Result<Value> {
    match destination {
        DestinationKind::GoogleChat => serde_json::to_value(google_chat::payload(rendered)),
        DestinationKind::Slack => serde_json::to_value(slack::payload(rendered)),
        DestinationKind::Discord => serde_json::to_value(discord::payload(rendered)),
    }
}
