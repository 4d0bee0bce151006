use serde_json::{Value, json};

use crate::template::text::ResolutionResult;

pub const COMMENT_ID: u64 = 1_987_654_321;
pub const REVIEW_ID: u64 = 2_123_456_789;

/// `issues` payload for a label being applied to an issue.
pub fn issue_labeled(number: u64, label: &str) -> Value {
    json!({
        "action": "labeled",
        "label": { "name": label },
        "issue": {
            "number": number,
            "title": "Crash when config file is empty",
            "body": "Steps to reproduce: run with an empty config."
        }
    })
}

/// `issue_comment` payload. With `on_pull_request` the issue carries the
/// `pull_request` marker GitHub adds for comments on PRs.
pub fn issue_comment(number: u64, body: &str, association: &str, on_pull_request: bool) -> Value {
    let mut issue = json!({
        "number": number,
        "title": "Crash when config file is empty",
        "body": null
    });
    if on_pull_request {
        issue["pull_request"] = json!({
            "url": format!("https://api.github.com/repos/octo/widgets/pulls/{number}")
        });
    }
    json!({
        "action": "created",
        "issue": issue,
        "comment": {
            "id": COMMENT_ID,
            "body": body,
            "author_association": association
        }
    })
}

/// `pull_request_review_comment` payload.
pub fn review_comment(pr_number: u64, body: &str, association: &str) -> Value {
    json!({
        "action": "created",
        "pull_request": { "number": pr_number },
        "comment": {
            "id": COMMENT_ID,
            "body": body,
            "author_association": association
        }
    })
}

/// `pull_request_review` payload.
pub fn review(pr_number: u64, body: &str, association: &str) -> Value {
    json!({
        "action": "submitted",
        "pull_request": { "number": pr_number },
        "review": {
            "id": REVIEW_ID,
            "body": body,
            "author_association": association
        }
    })
}

/// A run outcome for issue #42 in `octo/widgets`.
pub fn resolution(has_changes: bool, pr_number: Option<u64>) -> ResolutionResult {
    ResolutionResult {
        issue_number: 42,
        has_changes,
        pr_number,
        pr_url: pr_number.map(|n| format!("https://github.com/octo/widgets/pull/{n}")),
        branch_name: "kilocode-fix-42-1704067200".into(),
        repo_owner: "octo".into(),
        repo_name: "widgets".into(),
        run_id: "9876543210".into(),
    }
}
