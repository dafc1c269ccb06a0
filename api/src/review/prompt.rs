//! Prompts sent to the LLM for one changed file.

pub fn system_prompt(language: &str) -> String {
    format!(
        "You are a senior software engineer doing code review. Answer in {language}. \
         Name the file and the line numbers each remark refers to. \
         Point out bugs, risky changes and readability problems; skip praise."
    )
}

/// Prompt for a unified diff (GitLab, GitHub).
pub fn diff_prompt(path: &str, diff: &str) -> String {
    format!(
        "The diff below shows which lines of `{path}` changed and how.\n\
         Review the change.\n\n\
         `{path}`\n```\n{diff}\n```\n"
    )
}

/// Prompt for whole-file contents (Upsource). `old` is absent for new files.
pub fn files_prompt(old: Option<(&str, &str)>, new_path: &str, new_code: &str) -> String {
    match old {
        None => format!("Review this new file.\n\n`{new_path}`\n```\n{new_code}\n```\n"),
        Some((old_path, old_code)) => format!(
            "The file changed from the old version to the new version below. \
             Review the change.\n\n\
             Old: `{old_path}`\n```\n{old_code}\n```\n\n\
             New: `{new_path}`\n```\n{new_code}\n```\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_prompt_fences_the_diff() {
        let p = diff_prompt("src/a.rs", "@@ -1 +1 @@\n-a\n+b");
        assert!(p.contains("`src/a.rs`\n```\n@@ -1 +1 @@\n-a\n+b\n```"));
    }

    #[test]
    fn files_prompt_with_and_without_old() {
        let new_only = files_prompt(None, "/a.py", "print(1)");
        assert!(new_only.starts_with("Review this new file."));
        assert!(!new_only.contains("Old:"));

        let both = files_prompt(Some(("/a.py", "print(0)")), "/a.py", "print(1)");
        assert!(both.contains("Old: `/a.py`\n```\nprint(0)\n```"));
        assert!(both.contains("New: `/a.py`\n```\nprint(1)\n```"));
    }

    #[test]
    fn system_prompt_names_language() {
        assert!(system_prompt("Korean").contains("Answer in Korean."));
    }
}
