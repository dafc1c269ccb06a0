//! Upsource provider (JSON-RPC over HTTP) for review details, revisions
//! and discussions.
//!
//! Methods used, all as `POST {base}/~rpc/{method}` with basic auth:
//!   * getReviewDetails
//!   * getReviewSummaryChanges
//!   * getFileContent
//!   * createDiscussion

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    errors::{ReviewTargetProviderError, ReviewTargetResult},
    providers::join_url,
    types::{FileChange, FileRevision, ReviewDetails, ReviewRef},
};

/// Label attached to discussions created by the AI review.
pub const AI_REVIEW_LABEL: &str = "ai-review";

/// Upsource HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct UpsourceClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl UpsourceClient {
    pub fn new(http: Client, base_url: String, username: String, password: String) -> Self {
        debug!("Creating UpsourceClient with base_url={}", base_url);
        Self {
            http,
            base_url,
            username,
            password,
        }
    }

    async fn rpc<B, R>(&self, method: &str, body: &B) -> ReviewTargetResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = join_url(&self.base_url, &format!("~rpc/{method}"));
        debug!("Upsource rpc: {}", url);

        let envelope: RpcEnvelope<R> = self
            .http
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(envelope.into_result(method)?)
    }

    pub async fn review_details(&self, review: &ReviewRef) -> ReviewTargetResult<ReviewDetails> {
        let body = UpsourceReviewId::from(review);
        let dto: UpsourceReviewDescriptor = self.rpc("getReviewDetails", &body).await?;
        Ok(dto.into())
    }

    pub async fn file_changes(&self, review: &ReviewRef) -> ReviewTargetResult<Vec<FileChange>> {
        if review.revisions.is_empty() {
            warn!(review_id = %review.review_id, "Upsource review has no revisions in payload");
        }

        let body = UpsourceSummaryChangesRequest {
            review_id: UpsourceReviewId::from(review),
            revisions: UpsourceRevisionsSet {
                revisions: &review.revisions,
                select_all: true,
            },
        };
        let dto: UpsourceSummaryChanges = self.rpc("getReviewSummaryChanges", &body).await?;
        Ok(dto.into_changes())
    }

    pub async fn file_content(&self, file: &FileRevision) -> ReviewTargetResult<Option<String>> {
        let body = UpsourceFileInRevision {
            project_id: &file.project,
            revision_id: &file.revision,
            file_name: &file.path,
        };
        let dto: UpsourceFileContent = self.rpc("getFileContent", &body).await?;
        Ok(dto.file_text)
    }

    pub async fn create_discussion(&self, review: &ReviewRef, text: &str) -> ReviewTargetResult<()> {
        let body = UpsourceCreateDiscussion {
            anchor: Value::Object(Default::default()),
            review_id: UpsourceReviewId::from(review),
            text,
            project_id: &review.project,
            labels: UpsourceLabel {
                name: AI_REVIEW_LABEL,
            },
        };
        let _: Value = self.rpc("createDiscussion", &body).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<R> {
    result: Option<R>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    #[serde(default)]
    message: String,
}

impl<R> RpcEnvelope<R> {
    fn into_result(self, method: &str) -> Result<R, ReviewTargetProviderError> {
        if let Some(err) = self.error {
            return Err(ReviewTargetProviderError::Rpc {
                method: method.to_string(),
                message: err.message,
            });
        }
        self.result.ok_or_else(|| {
            ReviewTargetProviderError::InvalidResponse(format!("`{method}` returned no result"))
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsourceReviewId<'a> {
    project_id: &'a str,
    review_id: &'a str,
}

impl<'a> From<&'a ReviewRef> for UpsourceReviewId<'a> {
    fn from(r: &'a ReviewRef) -> Self {
        Self {
            project_id: &r.project,
            review_id: &r.review_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsourceSummaryChangesRequest<'a> {
    review_id: UpsourceReviewId<'a>,
    revisions: UpsourceRevisionsSet<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsourceRevisionsSet<'a> {
    revisions: &'a [String],
    select_all: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsourceFileInRevision<'a> {
    project_id: &'a str,
    revision_id: &'a str,
    file_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpsourceCreateDiscussion<'a> {
    anchor: Value,
    review_id: UpsourceReviewId<'a>,
    text: &'a str,
    project_id: &'a str,
    labels: UpsourceLabel,
}

#[derive(Debug, Serialize)]
struct UpsourceLabel {
    name: &'static str,
}

/// `getReviewDetails` result (subset).
#[derive(Debug, Deserialize)]
struct UpsourceReviewDescriptor {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    participants: Vec<UpsourceParticipant>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsourceParticipant {
    user_id: String,
}

impl From<UpsourceReviewDescriptor> for ReviewDetails {
    fn from(dto: UpsourceReviewDescriptor) -> Self {
        ReviewDetails {
            title: dto.title,
            participants: dto.participants.into_iter().map(|p| p.user_id).collect(),
        }
    }
}

/// `getReviewSummaryChanges` result (subset).
#[derive(Debug, Deserialize)]
struct UpsourceSummaryChanges {
    diff: UpsourceDiffList,
}

#[derive(Debug, Deserialize)]
struct UpsourceDiffList {
    #[serde(default)]
    diff: Vec<UpsourceFileDiff>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsourceFileDiff {
    #[serde(default)]
    old_file: Option<UpsourceFile>,
    #[serde(default)]
    new_file: Option<UpsourceFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsourceFile {
    project_id: String,
    revision_id: String,
    file_name: String,
}

impl From<UpsourceFile> for FileRevision {
    fn from(f: UpsourceFile) -> Self {
        FileRevision {
            project: f.project_id,
            revision: f.revision_id,
            path: f.file_name,
        }
    }
}

impl UpsourceSummaryChanges {
    fn into_changes(self) -> Vec<FileChange> {
        self.diff
            .diff
            .into_iter()
            .filter_map(|d| {
                let path = d
                    .new_file
                    .as_ref()
                    .or(d.old_file.as_ref())
                    .map(|f| f.file_name.clone())?;
                Some(FileChange {
                    path,
                    old: d.old_file.map(Into::into),
                    new: d.new_file.map(Into::into),
                    diff: None,
                })
            })
            .collect()
    }
}

/// `getFileContent` result (subset).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsourceFileContent {
    #[serde(default)]
    file_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rpc_error_is_surfaced() {
        let env: RpcEnvelope<Value> = serde_json::from_value(json!({
            "error": { "code": 101, "message": "Review not found" }
        }))
        .unwrap();
        let err = env.into_result("getReviewDetails").unwrap_err();
        assert!(matches!(
            err,
            ReviewTargetProviderError::Rpc { ref method, ref message }
                if method == "getReviewDetails" && message == "Review not found"
        ));
    }

    #[test]
    fn empty_envelope_is_invalid() {
        let env: RpcEnvelope<Value> = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            env.into_result("createDiscussion"),
            Err(ReviewTargetProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn review_details_from_descriptor() {
        let env: RpcEnvelope<UpsourceReviewDescriptor> = serde_json::from_value(json!({
            "result": {
                "reviewId": { "projectId": "proj1", "reviewId": "PROJ1-CR-42" },
                "title": "Add login",
                "participants": [
                    { "userId": "u-1", "role": 1, "state": 0 },
                    { "userId": "u-2", "role": 2, "state": 2 }
                ]
            }
        }))
        .unwrap();
        let details: ReviewDetails = env.into_result("getReviewDetails").unwrap().into();
        assert_eq!(details.title.as_deref(), Some("Add login"));
        assert_eq!(details.participants, vec!["u-1", "u-2"]);
    }

    #[test]
    fn summary_changes_keep_both_sides() {
        let dto: UpsourceSummaryChanges = serde_json::from_value(json!({
            "diff": { "diff": [
                {
                    "oldFile": { "projectId": "proj1", "revisionId": "r1", "fileName": "/src/a.py" },
                    "newFile": { "projectId": "proj1", "revisionId": "r2", "fileName": "/src/a.py" }
                },
                {
                    "newFile": { "projectId": "proj1", "revisionId": "r2", "fileName": "/src/b.kt" }
                },
                {}
            ]}
        }))
        .unwrap();

        let changes = dto.into_changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].old.as_ref().map(|f| f.revision.as_str()), Some("r1"));
        assert_eq!(changes[0].new.as_ref().map(|f| f.revision.as_str()), Some("r2"));
        assert!(changes[1].old.is_none());
        assert_eq!(changes[1].extension(), Some("kt"));
    }

    #[test]
    fn discussion_body_shape() {
        let review = ReviewRef::new("proj1", "PROJ1-CR-42");
        let body = UpsourceCreateDiscussion {
            anchor: Value::Object(Default::default()),
            review_id: UpsourceReviewId::from(&review),
            text: "looks fine",
            project_id: &review.project,
            labels: UpsourceLabel {
                name: AI_REVIEW_LABEL,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "anchor": {},
                "reviewId": { "projectId": "proj1", "reviewId": "PROJ1-CR-42" },
                "text": "looks fine",
                "projectId": "proj1",
                "labels": { "name": "ai-review" }
            })
        );
    }
}
