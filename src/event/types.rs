use serde_json::Value;

/// Issue part of a webhook payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Issue {
    pub number: Option<u64>,
    /// Set when the payload carries a truthy `issue.pull_request`, i.e. the
    /// "issue" is really a pull request (comments on PRs arrive this way).
    pub is_pull_request: bool,
}

/// Pull request part of a webhook payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequest {
    pub number: Option<u64>,
}

/// A comment or review body together with who wrote it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub id: Option<u64>,
    pub body: Option<String>,
    /// Author's relationship to the repository (`OWNER`, `MEMBER`, ...).
    pub author_association: Option<String>,
}

/// Reviews share the comment shape.
pub type Review = Comment;

/// An inbound GitHub event, one variant per event name the action handles.
///
/// Every variant except `WorkflowCall` may carry the name of the label that
/// was just applied (`label.name`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    /// Invoked from another workflow; always runs.
    WorkflowCall,
    Issues {
        label: Option<String>,
        issue: Option<Issue>,
    },
    IssueComment {
        label: Option<String>,
        issue: Option<Issue>,
        comment: Option<Comment>,
    },
    PullRequest {
        label: Option<String>,
        pull_request: Option<PullRequest>,
    },
    PullRequestReviewComment {
        label: Option<String>,
        pull_request: Option<PullRequest>,
        comment: Option<Comment>,
    },
    PullRequestReview {
        label: Option<String>,
        pull_request: Option<PullRequest>,
        review: Option<Review>,
    },
    /// Any other event name. Only the label and target fields are kept.
    Other {
        name: String,
        label: Option<String>,
        issue: Option<Issue>,
        pull_request: Option<PullRequest>,
    },
}

impl WebhookEvent {
    /// Build an event from the runner's event name and JSON payload.
    ///
    /// Missing or mistyped nested fields are treated as absent.
    pub fn from_payload(event_name: &str, payload: &Value) -> Self {
        let label = parse_label(payload);
        match event_name {
            "workflow_call" => WebhookEvent::WorkflowCall,
            "issues" => WebhookEvent::Issues {
                label,
                issue: parse_issue(payload),
            },
            "issue_comment" => WebhookEvent::IssueComment {
                label,
                issue: parse_issue(payload),
                comment: parse_comment(&payload["comment"]),
            },
            "pull_request" | "pull_request_target" => WebhookEvent::PullRequest {
                label,
                pull_request: parse_pull_request(payload),
            },
            "pull_request_review_comment" => WebhookEvent::PullRequestReviewComment {
                label,
                pull_request: parse_pull_request(payload),
                comment: parse_comment(&payload["comment"]),
            },
            "pull_request_review" => WebhookEvent::PullRequestReview {
                label,
                pull_request: parse_pull_request(payload),
                review: parse_comment(&payload["review"]),
            },
            other => WebhookEvent::Other {
                name: other.to_string(),
                label,
                issue: parse_issue(payload),
                pull_request: parse_pull_request(payload),
            },
        }
    }

    /// The GitHub event name this variant stands for.
    pub fn name(&self) -> &str {
        match self {
            WebhookEvent::WorkflowCall => "workflow_call",
            WebhookEvent::Issues { .. } => "issues",
            WebhookEvent::IssueComment { .. } => "issue_comment",
            WebhookEvent::PullRequest { .. } => "pull_request",
            WebhookEvent::PullRequestReviewComment { .. } => "pull_request_review_comment",
            WebhookEvent::PullRequestReview { .. } => "pull_request_review",
            WebhookEvent::Other { name, .. } => name,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            WebhookEvent::WorkflowCall => None,
            WebhookEvent::Issues { label, .. }
            | WebhookEvent::IssueComment { label, .. }
            | WebhookEvent::PullRequest { label, .. }
            | WebhookEvent::PullRequestReviewComment { label, .. }
            | WebhookEvent::PullRequestReview { label, .. }
            | WebhookEvent::Other { label, .. } => label.as_deref(),
        }
    }

    pub fn issue(&self) -> Option<&Issue> {
        match self {
            WebhookEvent::Issues { issue, .. }
            | WebhookEvent::IssueComment { issue, .. }
            | WebhookEvent::Other { issue, .. } => issue.as_ref(),
            _ => None,
        }
    }

    pub fn pull_request(&self) -> Option<&PullRequest> {
        match self {
            WebhookEvent::PullRequest { pull_request, .. }
            | WebhookEvent::PullRequestReviewComment { pull_request, .. }
            | WebhookEvent::PullRequestReview { pull_request, .. }
            | WebhookEvent::Other { pull_request, .. } => pull_request.as_ref(),
            _ => None,
        }
    }

    pub fn review(&self) -> Option<&Review> {
        match self {
            WebhookEvent::PullRequestReview { review, .. } => review.as_ref(),
            _ => None,
        }
    }
}

/// JavaScript-style truthiness, matching how the runner's payloads are
/// usually probed (`null`, `false`, `0` and `""` are all "absent").
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn parse_label(payload: &Value) -> Option<String> {
    payload["label"]["name"].as_str().map(String::from)
}

fn parse_issue(payload: &Value) -> Option<Issue> {
    let issue = payload.get("issue").filter(|v| v.is_object())?;
    Some(Issue {
        number: issue["number"].as_u64(),
        is_pull_request: is_truthy(&issue["pull_request"]),
    })
}

fn parse_pull_request(payload: &Value) -> Option<PullRequest> {
    let pr = payload.get("pull_request").filter(|v| v.is_object())?;
    Some(PullRequest {
        number: pr["number"].as_u64(),
    })
}

fn parse_comment(value: &Value) -> Option<Comment> {
    if !value.is_object() {
        return None;
    }
    Some(Comment {
        id: value["id"].as_u64(),
        body: value["body"].as_str().map(String::from),
        author_association: value["author_association"].as_str().map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use serde_json::json;

    #[test]
    fn test_workflow_call_ignores_payload() {
        let event = WebhookEvent::from_payload("workflow_call", &json!({"issue": {"number": 3}}));
        assert_eq!(event, WebhookEvent::WorkflowCall);
        assert_eq!(event.issue(), None);
        assert_eq!(event.name(), "workflow_call");
    }

    #[test]
    fn test_issues_labeled() {
        let event = WebhookEvent::from_payload("issues", &fixtures::issue_labeled(42, "fix-me"));
        assert_eq!(event.label(), Some("fix-me"));
        assert_eq!(
            event.issue(),
            Some(&Issue {
                number: Some(42),
                is_pull_request: false
            })
        );
        assert_eq!(event.pull_request(), None);
    }

    #[test]
    fn test_issue_comment_on_pull_request() {
        let payload = fixtures::issue_comment(7, "@kilocode-agent fix", "OWNER", true);
        let event = WebhookEvent::from_payload("issue_comment", &payload);
        match &event {
            WebhookEvent::IssueComment { issue, comment, .. } => {
                assert!(issue.as_ref().unwrap().is_pull_request);
                let comment = comment.as_ref().unwrap();
                assert_eq!(comment.id, Some(fixtures::COMMENT_ID));
                assert_eq!(comment.author_association.as_deref(), Some("OWNER"));
                assert_eq!(comment.body.as_deref(), Some("@kilocode-agent fix"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_review_event() {
        let payload = fixtures::review(11, "LGTM @kilocode-agent", "MEMBER");
        let event = WebhookEvent::from_payload("pull_request_review", &payload);
        assert_eq!(event.pull_request().and_then(|p| p.number), Some(11));
        assert_eq!(
            event.review().and_then(|r| r.id),
            Some(fixtures::REVIEW_ID)
        );
    }

    #[test]
    fn test_unknown_event_keeps_targets() {
        let payload = json!({"pull_request": {"number": 5}, "label": {"name": "x"}});
        let event = WebhookEvent::from_payload("merge_group", &payload);
        assert_eq!(event.name(), "merge_group");
        assert_eq!(event.label(), Some("x"));
        assert_eq!(event.pull_request().and_then(|p| p.number), Some(5));
    }

    #[test]
    fn test_mistyped_fields_are_absent() {
        let payload = json!({
            "issue": {"number": "42", "pull_request": null},
            "comment": "not an object",
            "label": {"name": 1}
        });
        let event = WebhookEvent::from_payload("issue_comment", &payload);
        assert_eq!(event.label(), None);
        match event {
            WebhookEvent::IssueComment { issue, comment, .. } => {
                assert_eq!(
                    issue,
                    Some(Issue {
                        number: None,
                        is_pull_request: false
                    })
                );
                assert_eq!(comment, None);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!("https://api.github.com/pulls/1")));
    }
}
