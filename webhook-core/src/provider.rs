//! Source-control review tools that can emit webhooks into the bridge.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Supported review tools. Used as the explicit dispatch tag for
/// normalization and for provider-specific link layouts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Upsource,
    GitLab,
    GitHub,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::Upsource,
        ProviderKind::GitLab,
        ProviderKind::GitHub,
    ];

    /// Stable lowercase name, matching the `CODE_REVIEW_TOOL` setting.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Upsource => "upsource",
            ProviderKind::GitLab => "gitlab",
            ProviderKind::GitHub => "github",
        }
    }

    /// Builds a web link to a review, or to the project when `review_id`
    /// is empty.
    ///
    /// * Upsource: `{base}/{project}/review/{id}`
    /// * GitLab:   `{base}/{project}/-/merge_requests/{id}`
    /// * GitHub:   `{base}/{project}/pull/{id}`
    pub fn review_link(self, base_url: &str, project: &str, review_id: &str) -> String {
        let base = base_url.trim_end_matches('/');
        let mut url = format!("{base}/{project}");
        if review_id.is_empty() {
            return url;
        }
        let segment = match self {
            ProviderKind::Upsource => "review",
            ProviderKind::GitLab => "-/merge_requests",
            ProviderKind::GitHub => "pull",
        };
        url.push('/');
        url.push_str(segment);
        url.push('/');
        url.push_str(review_id);
        url
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown provider name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown code review tool `{0}` (expected upsource, gitlab or github)")]
pub struct UnknownProvider(pub String);

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upsource" => Ok(ProviderKind::Upsource),
            "gitlab" => Ok(ProviderKind::GitLab),
            "github" => Ok(ProviderKind::GitHub),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}
