//! Provider-agnostic data model for reviews and their changed files.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A unique reference to a review inside a review tool.
///
/// * `project`   – Upsource: project id;
///                 GitLab: numeric id or "group/project";
///                 GitHub: "owner/repo".
/// * `review_id` – Upsource review id, GitLab MR IID or GitHub PR number.
/// * `revisions` – Upsource revisions attached to the review. Unused by
///                 the other tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRef {
    pub project: String,
    pub review_id: String,
    #[serde(default)]
    pub revisions: Vec<String>,
}

impl ReviewRef {
    pub fn new(project: impl Into<String>, review_id: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            review_id: review_id.into(),
            revisions: Vec::new(),
        }
    }

    pub fn with_revisions(mut self, revisions: Vec<String>) -> Self {
        self.revisions = revisions;
        self
    }
}

/// Review metadata that the webhook payload itself may lack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDetails {
    pub title: Option<String>,
    /// Display names (or ids, when the tool has no names) in tool order.
    pub participants: Vec<String>,
}

/// One file at one revision, enough to fetch its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRevision {
    pub project: String,
    pub revision: String,
    pub path: String,
}

/// A single changed file of a review.
///
/// Upsource exposes both sides as revisions and no diff; GitLab and GitHub
/// expose the unified diff and the head revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub old: Option<FileRevision>,
    pub new: Option<FileRevision>,
    pub diff: Option<String>,
}

impl FileChange {
    /// File extension without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.path).extension().and_then(|e| e.to_str())
    }

    pub fn is_deleted(&self) -> bool {
        self.new.is_none() && self.diff.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(path: &str) -> FileChange {
        FileChange {
            path: path.into(),
            old: None,
            new: None,
            diff: Some("@@ -1 +1 @@".into()),
        }
    }

    #[test]
    fn extension_without_dot() {
        assert_eq!(change("src/main.rs").extension(), Some("rs"));
        assert_eq!(change("app/config.py").extension(), Some("py"));
        assert_eq!(change("Makefile").extension(), None);
    }

    #[test]
    fn deleted_when_nothing_new() {
        let mut c = change("a.rs");
        assert!(!c.is_deleted());
        c.diff = None;
        assert!(c.is_deleted());
    }
}
