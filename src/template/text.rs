use minijinja::Value;
use serde::{Deserialize, Serialize};

use super::render::{render_template, vars};
use crate::config::types::TextTemplates;
use crate::error::ActionError;

/// Substituted for an issue body that is absent or empty.
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Issue fields the prompt is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueDetails {
    pub title: String,
    pub body: Option<String>,
}

/// What happened after the agent ran, as reported by the workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    pub issue_number: u64,
    pub has_changes: bool,
    pub pr_number: Option<u64>,
    pub pr_url: Option<String>,
    pub branch_name: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub run_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Changes were made and a pull request opened.
    PullRequestOpened,
    /// Changes were pushed but no pull request exists.
    BranchOnly,
    /// The agent produced no changes.
    NoChanges,
}

impl ResolutionResult {
    pub fn outcome(&self) -> ResolutionOutcome {
        match (self.has_changes, self.pr_number) {
            (true, Some(_)) => ResolutionOutcome::PullRequestOpened,
            (true, None) => ResolutionOutcome::BranchOnly,
            (false, _) => ResolutionOutcome::NoChanges,
        }
    }
}

/// Instructions handed to the agent.
pub fn prompt(templates: &TextTemplates, issue: &IssueDetails) -> Result<String, ActionError> {
    let body = issue
        .body
        .as_deref()
        .filter(|b| !b.is_empty())
        .unwrap_or(NO_DESCRIPTION);
    render_template(
        "prompt",
        &templates.prompt,
        vars([("title", issue.title.as_str()), ("body", body)]),
    )
}

pub fn commit_message(templates: &TextTemplates, issue_number: u64) -> Result<String, ActionError> {
    render_template(
        "commit_message",
        &templates.commit_message,
        vars([("issue_number", issue_number)]),
    )
}

/// Pull request description. Carries `Closes #<n>` so merging closes the issue.
pub fn pr_body(templates: &TextTemplates, issue_number: u64) -> Result<String, ActionError> {
    render_template(
        "pr_body",
        &templates.pr_body,
        vars([("issue_number", issue_number)]),
    )
}

/// Status comment posted back on the issue once the run finished.
pub fn result_comment(
    templates: &TextTemplates,
    result: &ResolutionResult,
) -> Result<String, ActionError> {
    let outcome = result.outcome();
    let (name, source) = match outcome {
        ResolutionOutcome::PullRequestOpened => ("comment_success", &templates.comment_success),
        ResolutionOutcome::BranchOnly => ("comment_partial", &templates.comment_partial),
        ResolutionOutcome::NoChanges => ("comment_failure", &templates.comment_failure),
    };
    tracing::debug!(issue_number = result.issue_number, ?outcome, "rendering result comment");

    let context = vars([
        ("issue_number", Value::from(result.issue_number)),
        (
            "pr_number",
            Value::from(result.pr_number.map(|n| n.to_string()).unwrap_or_default()),
        ),
        (
            "pr_url",
            Value::from(result.pr_url.clone().unwrap_or_default()),
        ),
        ("branch_name", Value::from(result.branch_name.as_str())),
        ("repo_owner", Value::from(result.repo_owner.as_str())),
        ("repo_name", Value::from(result.repo_name.as_str())),
        ("run_id", Value::from(result.run_id.as_str())),
    ]);
    render_template(name, source, context)
}
