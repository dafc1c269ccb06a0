//! GitHub provider (REST v3) for PR details, files and comments.
//!
//! Endpoints used:
//!   * GET  /repos/{owner}/{repo}/pulls/{number}
//!   * GET  /repos/{owner}/{repo}/pulls/{number}/files
//!   * GET  /repos/{owner}/{repo}/contents/{path}?ref={ref}
//!   * POST /repos/{owner}/{repo}/issues/{number}/comments

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::{ReviewTargetError, ReviewTargetResult},
    types::{FileChange, FileRevision, ReviewDetails, ReviewRef},
};

/// GitHub HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // "https://api.github.com"
    token: String,
}

impl GitHubClient {
    pub fn new(http: Client, base_api: String, token: String) -> Self {
        debug!("Creating GitHubClient with base_api={}", base_api);
        Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn authorized(&self, req: RequestBuilder, accept: &str) -> RequestBuilder {
        req.bearer_auth(&self.token)
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    fn pull_url(&self, review: &ReviewRef, suffix: &str) -> ReviewTargetResult<String> {
        let (owner, repo) = split_owner_repo(&review.project)?;
        let number = parse_number(&review.review_id)?;
        Ok(format!(
            "{}/repos/{}/{}/pulls/{}{}",
            self.base_api, owner, repo, number, suffix
        ))
    }

    async fn get_pull(&self, review: &ReviewRef) -> ReviewTargetResult<GitHubPr> {
        let url = self.pull_url(review, "")?;
        debug!("GitHub get_pull: {}", url);

        let pr = self
            .authorized(self.http.get(url), "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(pr)
    }

    pub async fn review_details(&self, review: &ReviewRef) -> ReviewTargetResult<ReviewDetails> {
        Ok(self.get_pull(review).await?.into())
    }

    /// Lists PR files. Old sides point at the base sha, new sides at the head.
    pub async fn file_changes(&self, review: &ReviewRef) -> ReviewTargetResult<Vec<FileChange>> {
        let pr = self.get_pull(review).await?;

        let url = self.pull_url(review, "/files?per_page=100")?;
        debug!("GitHub file_changes: {}", url);

        let files: Vec<GitHubPrFile> = self
            .authorized(self.http.get(url), "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(files
            .into_iter()
            .map(|f| f.into_change(&review.project, &pr.base.sha, &pr.head.sha))
            .collect())
    }

    /// Returns `Ok(None)` if the file does not exist at the given ref.
    pub async fn file_content(
        &self,
        review: &ReviewRef,
        file: &FileRevision,
    ) -> ReviewTargetResult<Option<String>> {
        let (owner, repo) = split_owner_repo(&review.project)?;
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_api,
            owner,
            repo,
            file.path.trim_start_matches('/')
        );
        debug!("GitHub file_content: url={}, ref={}", url, file.revision);

        let resp = self
            .authorized(
                self.http.get(url).query(&[("ref", file.revision.as_str())]),
                "application/vnd.github.raw+json",
            )
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            debug!("GitHub file not found at given ref");
            return Ok(None);
        }

        Ok(Some(resp.error_for_status()?.text().await?))
    }

    /// Posts a conversation comment (not anchored to a line).
    pub async fn create_issue_comment(
        &self,
        review: &ReviewRef,
        body: &str,
    ) -> ReviewTargetResult<()> {
        let (owner, repo) = split_owner_repo(&review.project)?;
        let number = parse_number(&review.review_id)?;
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.base_api, owner, repo, number
        );
        debug!("GitHub create_issue_comment: {}", url);

        self.authorized(self.http.post(url), "application/vnd.github+json")
            .json(&GitHubCommentCreate { body })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Splits "owner/repo" into components or returns a validation error.
fn split_owner_repo(project: &str) -> ReviewTargetResult<(&str, &str)> {
    let mut parts = project.split('/');
    let owner = parts.next().unwrap_or("").trim();
    let repo = parts.next().unwrap_or("").trim();

    if owner.is_empty() || repo.is_empty() || parts.next().is_some() {
        return Err(ReviewTargetError::Validation(format!(
            "invalid GitHub project id '{project}', expected 'owner/repo'"
        )));
    }

    Ok((owner, repo))
}

fn parse_number(review_id: &str) -> ReviewTargetResult<u64> {
    review_id.trim().parse().map_err(|_| {
        ReviewTargetError::Validation(format!(
            "invalid GitHub pull request number '{review_id}'"
        ))
    })
}

/// GitHub PR response (subset).
#[derive(Debug, Deserialize)]
struct GitHubPr {
    title: String,
    #[serde(default)]
    requested_reviewers: Vec<GitHubUser>,
    base: GitHubRef,
    head: GitHubRef,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    sha: String,
}

impl From<GitHubPr> for ReviewDetails {
    fn from(pr: GitHubPr) -> Self {
        ReviewDetails {
            title: Some(pr.title),
            participants: pr.requested_reviewers.into_iter().map(|u| u.login).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubPrFile {
    filename: String,
    #[serde(default)]
    previous_filename: Option<String>,
    status: String,
    #[serde(default)]
    patch: Option<String>, // absent for binary or very large files
}

impl GitHubPrFile {
    fn into_change(self, project: &str, base: &str, head: &str) -> FileChange {
        let revision = |sha: &str, path: &str| FileRevision {
            project: project.to_string(),
            revision: sha.to_string(),
            path: path.to_string(),
        };

        let old_path = self.previous_filename.as_deref().unwrap_or(&self.filename);
        let old = (self.status != "added").then(|| revision(base, old_path));
        let new = (self.status != "removed").then(|| revision(head, &self.filename));

        FileChange {
            path: self.filename,
            old,
            new,
            diff: self.patch,
        }
    }
}

#[derive(Debug, Serialize)]
struct GitHubCommentCreate<'a> {
    body: &'a str,
}
