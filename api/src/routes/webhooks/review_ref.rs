//! Locates the review a webhook payload talks about.

use review_target::ReviewRef;
use serde_json::Value;
use webhook_core::ProviderKind;

/// String or integer id at `pointer`, rendered as text.
fn id_at(raw: &Value, pointer: &str) -> Option<String> {
    match raw.pointer(pointer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_id(raw: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|p| id_at(raw, p))
}

/// Returns the review coordinates, `None` when the event is not tied to a
/// review (for example an Upsource discussion on a bare revision).
pub fn extract_review_ref(provider: ProviderKind, raw: &Value) -> Option<ReviewRef> {
    match provider {
        ProviderKind::Upsource => {
            let project = id_at(raw, "/projectId")?;
            let review_id = id_at(raw, "/data/base/reviewId")?;
            let revisions = raw
                .pointer("/data/revisions")
                .and_then(Value::as_array)
                .map(|revs| {
                    revs.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            Some(ReviewRef::new(project, review_id).with_revisions(revisions))
        }
        ProviderKind::GitLab => {
            let project = first_id(raw, &["/project/id", "/project/path_with_namespace"])?;
            let iid = first_id(raw, &["/object_attributes/iid", "/merge_request/iid"])?;
            Some(ReviewRef::new(project, iid))
        }
        ProviderKind::GitHub => {
            let repo = id_at(raw, "/repository/full_name")?;
            let number = first_id(raw, &["/pull_request/number", "/issue/number"])?;
            Some(ReviewRef::new(repo, number))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn upsource_with_revisions() {
        let raw = json!({
            "projectId": "proj1",
            "data": { "base": { "reviewId": "PROJ1-CR-3" }, "revisions": ["r1", "r2"] }
        });
        let r = extract_review_ref(ProviderKind::Upsource, &raw).unwrap();
        assert_eq!(r.project, "proj1");
        assert_eq!(r.review_id, "PROJ1-CR-3");
        assert_eq!(r.revisions, vec!["r1", "r2"]);
    }

    #[test]
    fn upsource_discussion_without_review() {
        let raw = json!({ "projectId": "proj1", "data": { "base": {} } });
        assert!(extract_review_ref(ProviderKind::Upsource, &raw).is_none());
    }

    #[test]
    fn gitlab_merge_request_and_note() {
        let mr = json!({
            "project": { "id": 15, "path_with_namespace": "team/proj1" },
            "object_attributes": { "iid": 7 }
        });
        let r = extract_review_ref(ProviderKind::GitLab, &mr).unwrap();
        assert_eq!((r.project.as_str(), r.review_id.as_str()), ("15", "7"));

        let note = json!({
            "project": { "path_with_namespace": "team/proj1" },
            "object_attributes": { "note": "hi" },
            "merge_request": { "iid": 9 }
        });
        let r = extract_review_ref(ProviderKind::GitLab, &note).unwrap();
        assert_eq!((r.project.as_str(), r.review_id.as_str()), ("team/proj1", "9"));
    }

    #[test]
    fn github_pull_request_or_issue() {
        let pr = json!({ "repository": { "full_name": "octo/proj1" }, "pull_request": { "number": 12 } });
        assert_eq!(extract_review_ref(ProviderKind::GitHub, &pr).unwrap().review_id, "12");

        let issue = json!({ "repository": { "full_name": "octo/proj1" }, "issue": { "number": 4 } });
        assert_eq!(extract_review_ref(ProviderKind::GitHub, &issue).unwrap().review_id, "4");

        let push = json!({ "repository": { "full_name": "octo/proj1" } });
        assert!(extract_review_ref(ProviderKind::GitHub, &push).is_none());
    }
}
