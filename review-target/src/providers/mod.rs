//! Review-tool facade without async-trait or dynamic trait objects.
//!
//! `ReviewTarget` wraps one concrete client per review tool and offers a
//! uniform interface for:
//!   * fetching review details (title, participants)
//!   * listing changed files and fetching their content
//!   * posting a review-level comment.

pub mod github;
pub mod gitlab;
pub mod upsource;

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::{
    errors::{ReviewTargetConfigError, ReviewTargetResult},
    types::{FileChange, FileRevision, ReviewDetails, ReviewRef},
};

/// Connect and read timeouts applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(10),
            read: Duration::from_secs(10),
        }
    }
}

/// Credentials and base URL for the configured review tool.
#[derive(Clone)]
pub enum TargetConfig {
    Upsource {
        /// Web root, e.g. "https://upsource.example.com".
        base_url: String,
        username: String,
        password: String,
    },
    GitLab {
        /// API base, e.g. "https://gitlab.com/api/v4".
        base_api: String,
        token: String,
    },
    GitHub {
        /// API base, e.g. "https://api.github.com".
        base_api: String,
        token: String,
    },
}

impl std::fmt::Debug for TargetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetConfig::Upsource { base_url, username, .. } => f
                .debug_struct("Upsource")
                .field("base_url", base_url)
                .field("username", username)
                .finish_non_exhaustive(),
            TargetConfig::GitLab { base_api, .. } => f
                .debug_struct("GitLab")
                .field("base_api", base_api)
                .finish_non_exhaustive(),
            TargetConfig::GitHub { base_api, .. } => f
                .debug_struct("GitHub")
                .field("base_api", base_api)
                .finish_non_exhaustive(),
        }
    }
}

/// Concrete review-tool client with enum dispatch.
#[derive(Debug, Clone)]
pub enum ReviewTarget {
    Upsource(upsource::UpsourceClient),
    GitLab(gitlab::GitLabClient),
    GitHub(github::GitHubClient),
}

impl ReviewTarget {
    /// Constructs a concrete client from configuration.
    ///
    /// The underlying HTTP client carries the timeouts and a stable user
    /// agent so that review tools can identify the integration.
    pub fn from_config(cfg: TargetConfig, timeouts: HttpTimeouts) -> ReviewTargetResult<Self> {
        debug!(?cfg, ?timeouts, "initializing review target");

        let http = Client::builder()
            .user_agent("review-bridge/0.1")
            .connect_timeout(timeouts.connect)
            .read_timeout(timeouts.read)
            .build()
            .map_err(|e| ReviewTargetConfigError::HttpClient(e.to_string()))?;

        let target = match cfg {
            TargetConfig::Upsource {
                base_url,
                username,
                password,
            } => {
                validate_base(&base_url)?;
                require("UPSOURCE_USERNAME", &username)?;
                ReviewTarget::Upsource(upsource::UpsourceClient::new(
                    http, base_url, username, password,
                ))
            }
            TargetConfig::GitLab { base_api, token } => {
                validate_base(&base_api)?;
                require("GITLAB_ACCESS_TOKEN", &token)?;
                ReviewTarget::GitLab(gitlab::GitLabClient::new(http, base_api, token))
            }
            TargetConfig::GitHub { base_api, token } => {
                validate_base(&base_api)?;
                require("GITHUB_ACCESS_TOKEN", &token)?;
                ReviewTarget::GitHub(github::GitHubClient::new(http, base_api, token))
            }
        };

        Ok(target)
    }

    /// Fetches the review title and participants.
    pub async fn fetch_review_details(&self, review: &ReviewRef) -> ReviewTargetResult<ReviewDetails> {
        debug!(project = %review.project, review_id = %review.review_id, "fetching review details");

        match self {
            Self::Upsource(c) => c.review_details(review).await,
            Self::GitLab(c) => c.review_details(review).await,
            Self::GitHub(c) => c.review_details(review).await,
        }
    }

    /// Lists the files changed by the review.
    pub async fn fetch_file_changes(&self, review: &ReviewRef) -> ReviewTargetResult<Vec<FileChange>> {
        debug!(project = %review.project, review_id = %review.review_id, "fetching file changes");

        match self {
            Self::Upsource(c) => c.file_changes(review).await,
            Self::GitLab(c) => c.file_changes(review).await,
            Self::GitHub(c) => c.file_changes(review).await,
        }
    }

    /// Fetches the text of one file at one revision.
    ///
    /// Returns `Ok(None)` if the file does not exist at that revision.
    pub async fn fetch_file_content(
        &self,
        review: &ReviewRef,
        file: &FileRevision,
    ) -> ReviewTargetResult<Option<String>> {
        debug!(path = %file.path, revision = %file.revision, "fetching file content");

        match self {
            Self::Upsource(c) => c.file_content(file).await,
            Self::GitLab(c) => c.file_content(review, file).await,
            Self::GitHub(c) => c.file_content(review, file).await,
        }
    }

    /// Posts one review-level comment.
    pub async fn post_comment(&self, review: &ReviewRef, body: &str) -> ReviewTargetResult<()> {
        debug!(
            project = %review.project,
            review_id = %review.review_id,
            len = body.len(),
            "posting review comment"
        );

        match self {
            Self::Upsource(c) => c.create_discussion(review, body).await,
            Self::GitLab(c) => c.create_note(review, body).await,
            Self::GitHub(c) => c.create_issue_comment(review, body).await,
        }
    }
}

fn validate_base(url: &str) -> ReviewTargetResult<()> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ReviewTargetConfigError::InvalidBaseUrl(url.to_string()).into())
    }
}

fn require(name: &'static str, value: &str) -> ReviewTargetResult<()> {
    if value.trim().is_empty() {
        return Err(ReviewTargetConfigError::MissingCredential(name).into());
    }
    Ok(())
}

/// Joins a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ReviewTargetError;

    #[test]
    fn joins_without_double_slash() {
        assert_eq!(join_url("https://x/", "/~rpc/a"), "https://x/~rpc/a");
        assert_eq!(join_url("https://x", "projects"), "https://x/projects");
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = ReviewTarget::from_config(
            TargetConfig::GitLab {
                base_api: "gitlab.local".into(),
                token: "t".into(),
            },
            HttpTimeouts::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReviewTargetError::Config(ReviewTargetConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn rejects_missing_token() {
        let err = ReviewTarget::from_config(
            TargetConfig::GitHub {
                base_api: "https://api.github.com".into(),
                token: " ".into(),
            },
            HttpTimeouts::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReviewTargetError::Config(ReviewTargetConfigError::MissingCredential(
                "GITHUB_ACCESS_TOKEN"
            ))
        ));
    }

    #[test]
    fn debug_hides_secrets() {
        let cfg = TargetConfig::Upsource {
            base_url: "https://u".into(),
            username: "bot".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{cfg:?}").contains("hunter2"));
    }
}
