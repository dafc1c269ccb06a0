//! AI review of a newly created review.
//!
//! For each changed file whose extension is listed in `REVIEW_FILES`, the
//! LLM gets either the diff (GitLab, GitHub) or both file versions
//! (Upsource). Replies are joined into one comment on the review.

pub mod prompt;

use ai_llm_service::OpenAiService;
use review_target::{FileChange, ReviewRef, ReviewTarget, ReviewTargetError};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("review tool request failed: {0}")]
    Target(#[from] ReviewTargetError),
}

/// What the pipeline did, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// A comment with this many file reviews was posted.
    Posted { files: usize },
    /// No eligible file or no usable LLM reply.
    NothingToPost,
}

/// Settings the pipeline needs from the app configuration.
#[derive(Debug, Clone, Copy)]
pub struct ReviewSettings<'a> {
    pub review_files: &'a [String],
    pub language: &'a str,
}

/// Files worth sending to the LLM: eligible extension, not deleted.
pub fn select_files(changes: Vec<FileChange>, review_files: &[String]) -> Vec<FileChange> {
    changes
        .into_iter()
        .filter(|c| {
            if c.is_deleted() {
                debug!(path = %c.path, "skipping deleted file");
                return false;
            }
            let eligible = c
                .extension()
                .map(|ext| review_files.iter().any(|f| f.eq_ignore_ascii_case(ext)))
                .unwrap_or(false);
            if !eligible {
                debug!(path = %c.path, "extension is not eligible for review");
            }
            eligible
        })
        .collect()
}

/// Joins non-blank replies with a blank line, `None` when nothing is left.
pub fn join_comments(replies: &[String]) -> Option<String> {
    let parts: Vec<&str> = replies
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join("\n\n"))
}

/// Builds the prompt for one file, fetching contents when there is no diff.
async fn prompt_for(
    target: &ReviewTarget,
    review: &ReviewRef,
    change: &FileChange,
) -> Result<Option<String>, ReviewTargetError> {
    if let Some(diff) = &change.diff {
        return Ok(Some(prompt::diff_prompt(&change.path, diff)));
    }

    let Some(new) = &change.new else {
        return Ok(None);
    };
    let Some(new_code) = target.fetch_file_content(review, new).await? else {
        return Ok(None);
    };

    let old_code = match &change.old {
        Some(old) => target
            .fetch_file_content(review, old)
            .await?
            .map(|code| (old.path.as_str(), code)),
        None => None,
    };

    Ok(Some(prompt::files_prompt(
        old_code.as_ref().map(|(p, c)| (*p, c.as_str())),
        &new.path,
        &new_code,
    )))
}

/// Runs the whole AI review for one review and posts the result.
///
/// A failed file (content fetch or LLM call) is logged and skipped; only
/// failing to list the changes or to post the comment aborts the run.
#[instrument(
    name = "ai_review",
    skip(target, llm, settings),
    fields(project = %review.project, review_id = %review.review_id)
)]
pub async fn run_ai_review(
    target: &ReviewTarget,
    llm: &OpenAiService,
    review: &ReviewRef,
    settings: ReviewSettings<'_>,
) -> Result<ReviewOutcome, ReviewError> {
    let changes = target.fetch_file_changes(review).await?;
    let total = changes.len();
    let files = select_files(changes, settings.review_files);
    info!(total, eligible = files.len(), "starting AI review");

    let system = prompt::system_prompt(settings.language);
    let mut replies = Vec::with_capacity(files.len());

    for change in &files {
        let prompt = match prompt_for(target, review, change).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                debug!(path = %change.path, "no content to review");
                continue;
            }
            Err(err) => {
                warn!(path = %change.path, error = %err, "failed to fetch file for review");
                continue;
            }
        };

        match llm.generate(&prompt, Some(system.as_str())).await {
            Ok(reply) => replies.push(reply),
            Err(err) => warn!(path = %change.path, error = %err, "LLM review failed"),
        }
    }

    let Some(body) = join_comments(&replies) else {
        warn!("no review comments were generated");
        return Ok(ReviewOutcome::NothingToPost);
    };

    target.post_comment(review, &body).await?;
    let posted = replies.iter().filter(|r| !r.trim().is_empty()).count();
    info!(files = posted, "AI review posted");

    Ok(ReviewOutcome::Posted { files: posted })
}
