//! Formatting configuration passed explicitly into normalization and
//! rendering. Only used for string building, never for I/O.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCENT_COLOR: &str = "#F35A00";
pub const DEFAULT_RESOLVED_COLOR: &str = "#2AB27B";
pub const DEFAULT_COMMENT_COLOR: &str = "#3AA3E3";

/// Attachment colors used by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// New reviews, reopened reviews and rejections.
    pub accent: String,
    /// Closed reviews and non-rejecting participant changes.
    pub resolved: String,
    /// New comments.
    pub comment: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: DEFAULT_ACCENT_COLOR.into(),
            resolved: DEFAULT_RESOLVED_COLOR.into(),
            comment: DEFAULT_COMMENT_COLOR.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Web base of the review tool, e.g. `https://upsource.example.com`.
    pub review_base_url: String,
    pub palette: Palette,
}

impl FormatConfig {
    pub fn new(review_base_url: impl Into<String>) -> Self {
        Self {
            review_base_url: review_base_url.into(),
            palette: Palette::default(),
        }
    }
}
