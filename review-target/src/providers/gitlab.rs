//! GitLab provider (REST v4) for MR details, diffs and notes.
//!
//! Endpoints used:
//!   * GET  /projects/:id/merge_requests/:iid
//!   * GET  /projects/:id/merge_requests/:iid/diffs
//!   * GET  /projects/:id/repository/files/:path/raw?ref=:ref
//!   * POST /projects/:id/merge_requests/:iid/notes

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::{ReviewTargetError, ReviewTargetResult},
    types::{FileChange, FileRevision, ReviewDetails, ReviewRef},
};

/// GitLab HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    base_api: String, // e.g. "https://gitlab.com/api/v4"
    token: String,    // "PRIVATE-TOKEN"
}

impl GitLabClient {
    pub fn new(http: Client, base_api: String, token: String) -> Self {
        debug!("Creating GitLabClient with base_api={}", base_api);
        Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn mr_url(&self, review: &ReviewRef, suffix: &str) -> ReviewTargetResult<String> {
        let iid = parse_iid(&review.review_id)?;
        Ok(format!(
            "{}/projects/{}/merge_requests/{}{}",
            self.base_api,
            urlencoding::encode(&review.project),
            iid,
            suffix
        ))
    }

    async fn get_mr(&self, review: &ReviewRef) -> ReviewTargetResult<GitLabMr> {
        let url = self.mr_url(review, "")?;
        debug!("GitLab get_mr: {}", url);

        let mr = self
            .http
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(mr)
    }

    pub async fn review_details(&self, review: &ReviewRef) -> ReviewTargetResult<ReviewDetails> {
        Ok(self.get_mr(review).await?.into())
    }

    /// Lists MR diffs. Old sides point at the MR base, new sides at its head.
    pub async fn file_changes(&self, review: &ReviewRef) -> ReviewTargetResult<Vec<FileChange>> {
        let refs = self.get_mr(review).await?.diff_refs;

        let url = self.mr_url(review, "/diffs")?;
        debug!("GitLab file_changes: {}", url);

        let files: Vec<GitLabMrDiffFile> = self
            .http
            .get(url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(files
            .into_iter()
            .map(|f| f.into_change(&review.project, refs.as_ref()))
            .collect())
    }

    /// Returns `Ok(None)` if the file does not exist at the given ref.
    pub async fn file_content(
        &self,
        review: &ReviewRef,
        file: &FileRevision,
    ) -> ReviewTargetResult<Option<String>> {
        let url = format!(
            "{}/projects/{}/repository/files/{}/raw",
            self.base_api,
            urlencoding::encode(&review.project),
            urlencoding::encode(&file.path),
        );
        debug!("GitLab file_content: {}", url);

        let resp = self
            .http
            .get(url)
            .query(&[("ref", file.revision.as_str())])
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?;

        if resp.status().as_u16() == 404 {
            debug!("GitLab file not found at given ref");
            return Ok(None);
        }

        Ok(Some(resp.error_for_status()?.text().await?))
    }

    pub async fn create_note(&self, review: &ReviewRef, body: &str) -> ReviewTargetResult<()> {
        let url = self.mr_url(review, "/notes")?;
        debug!("GitLab create_note: {}", url);

        self.http
            .post(url)
            .header("PRIVATE-TOKEN", &self.token)
            .json(&GitLabNoteCreate { body })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn parse_iid(review_id: &str) -> ReviewTargetResult<u64> {
    review_id.trim().parse().map_err(|_| {
        ReviewTargetError::Validation(format!(
            "invalid GitLab merge request iid '{review_id}', expected a number"
        ))
    })
}

/// GitLab MR response (subset).
#[derive(Debug, Deserialize)]
struct GitLabMr {
    title: String,
    #[serde(default)]
    reviewers: Vec<GitLabUser>,
    #[serde(default)]
    diff_refs: Option<GitLabDiffRefs>,
}

#[derive(Debug, Deserialize)]
struct GitLabDiffRefs {
    base_sha: String,
    head_sha: String,
}

#[derive(Debug, Deserialize)]
struct GitLabUser {
    name: String,
}

impl From<GitLabMr> for ReviewDetails {
    fn from(mr: GitLabMr) -> Self {
        ReviewDetails {
            title: Some(mr.title),
            participants: mr.reviewers.into_iter().map(|u| u.name).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitLabMrDiffFile {
    old_path: String,
    new_path: String,
    #[serde(default)]
    new_file: bool,
    #[serde(default)]
    deleted_file: bool,
    #[serde(default)]
    diff: Option<String>, // None for binary/too large
}

impl GitLabMrDiffFile {
    fn into_change(self, project: &str, refs: Option<&GitLabDiffRefs>) -> FileChange {
        let revision = |sha: &str, path: &str| FileRevision {
            project: project.to_string(),
            revision: sha.to_string(),
            path: path.to_string(),
        };

        let old = refs
            .filter(|_| !self.new_file)
            .map(|r| revision(&r.base_sha, &self.old_path));
        let new = refs
            .filter(|_| !self.deleted_file)
            .map(|r| revision(&r.head_sha, &self.new_path));

        FileChange {
            path: if self.deleted_file {
                self.old_path
            } else {
                self.new_path
            },
            old,
            new,
            diff: self.diff.filter(|d| !d.is_empty()),
        }
    }
}

#[derive(Debug, Serialize)]
struct GitLabNoteCreate<'a> {
    body: &'a str,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn mr_url_encodes_project_path() {
        let client = GitLabClient::new(Client::new(), "https://gitlab.example.com/api/v4/".into(), "t".into());
        let url = client
            .mr_url(&ReviewRef::new("group/app", "7"), "/notes")
            .unwrap();
        assert_eq!(
            url,
            "https://gitlab.example.com/api/v4/projects/group%2Fapp/merge_requests/7/notes"
        );
    }

    #[test]
    fn non_numeric_iid_is_rejected() {
        assert!(matches!(
            parse_iid("PROJ-CR-1"),
            Err(ReviewTargetError::Validation(_))
        ));
        assert_eq!(parse_iid(" 12 ").unwrap(), 12);
    }

    #[test]
    fn details_from_mr() {
        let mr: GitLabMr = serde_json::from_value(json!({
            "iid": 7,
            "title": "Add login",
            "reviewers": [ { "name": "Bob" }, { "name": "Carol" } ],
            "diff_refs": { "base_sha": "b", "head_sha": "h", "start_sha": "s" }
        }))
        .unwrap();
        let details = ReviewDetails::from(mr);
        assert_eq!(details.title.as_deref(), Some("Add login"));
        assert_eq!(details.participants, vec!["Bob", "Carol"]);
    }

    #[test]
    fn diff_files_become_changes() {
        let files: Vec<GitLabMrDiffFile> = serde_json::from_value(json!([
            { "old_path": "a.rs", "new_path": "a.rs", "new_file": false, "deleted_file": false, "diff": "@@ -1 +1 @@\n-a\n+b\n" },
            { "old_path": "gone.rs", "new_path": "gone.rs", "new_file": false, "deleted_file": true, "diff": "" }
        ]))
        .unwrap();

        let refs = GitLabDiffRefs {
            base_sha: "b".into(),
            head_sha: "h".into(),
        };
        let changes: Vec<FileChange> = files
            .into_iter()
            .map(|f| f.into_change("group/app", Some(&refs)))
            .collect();

        assert_eq!(changes[0].path, "a.rs");
        assert_eq!(changes[0].new.as_ref().map(|r| r.revision.as_str()), Some("h"));
        assert_eq!(changes[0].old.as_ref().map(|r| r.revision.as_str()), Some("b"));
        assert!(changes[0].diff.is_some());
        assert!(changes[1].is_deleted());
    }
}
