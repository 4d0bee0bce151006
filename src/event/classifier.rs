use std::fmt;

use serde::{Serialize, Serializer};

use super::types::{Comment, WebhookEvent};
use crate::config::types::TriggerSettings;

/// Why an event launched the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerReason {
    WorkflowCall,
    /// The configured label was applied.
    Label(String),
    /// An authorized comment mentioned the macro.
    Comment(String),
    /// An authorized review mentioned the macro.
    Review(String),
}

impl fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerReason::WorkflowCall => f.write_str("workflow_call"),
            TriggerReason::Label(label) => write!(f, "{label} label"),
            TriggerReason::Comment(mention) => write!(f, "comment with {mention}"),
            TriggerReason::Review(mention) => write!(f, "review with {mention}"),
        }
    }
}

impl Serialize for TriggerReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whether the target is a plain issue or a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    Issue,
    Pr,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Issue => "issue",
            IssueType::Pr => "pr",
        }
    }
}

/// The classifier's decision plus the identifiers it could extract.
///
/// `should_trigger` is only ever set together with `trigger_reason`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerVerdict {
    pub should_trigger: bool,
    pub trigger_reason: Option<TriggerReason>,
    pub issue_number: Option<u64>,
    pub issue_type: Option<IssueType>,
    pub comment_id: Option<u64>,
}

impl TriggerVerdict {
    fn trigger(&mut self, reason: TriggerReason) {
        self.should_trigger = true;
        self.trigger_reason = Some(reason);
    }
}

/// Decide whether `event` should launch the agent.
///
/// Rules are applied in order; a later match replaces the reason but never
/// clears an earlier trigger. Identifiers are extracted whether or not the
/// event triggers, except for `workflow_call` which carries no target.
pub fn classify(event: &WebhookEvent, settings: &TriggerSettings) -> TriggerVerdict {
    let mut verdict = TriggerVerdict::default();

    if matches!(event, WebhookEvent::WorkflowCall) {
        verdict.trigger(TriggerReason::WorkflowCall);
        tracing::debug!("workflow_call always triggers");
        return verdict;
    }

    if event.label() == Some(settings.label.as_str()) {
        verdict.trigger(TriggerReason::Label(settings.label.clone()));
    }

    match event {
        WebhookEvent::IssueComment {
            comment: Some(comment),
            ..
        }
        | WebhookEvent::PullRequestReviewComment {
            comment: Some(comment),
            ..
        } => {
            if is_authorized_mention(comment, settings) {
                verdict.trigger(TriggerReason::Comment(settings.macro_text.clone()));
                verdict.comment_id = comment.id;
            }
        }
        WebhookEvent::PullRequestReview {
            review: Some(review),
            ..
        } => {
            if is_authorized_mention(review, settings) {
                verdict.trigger(TriggerReason::Review(settings.macro_text.clone()));
                verdict.comment_id = review.id;
            }
        }
        _ => {}
    }

    let (issue_number, issue_type) = extract_target(event);
    verdict.issue_number = issue_number;
    verdict.issue_type = issue_type;

    tracing::debug!(
        event = event.name(),
        should_trigger = verdict.should_trigger,
        reason = verdict.trigger_reason.as_ref().map(ToString::to_string),
        issue_number = verdict.issue_number,
        "classified event"
    );

    verdict
}

/// Body contains the macro (plain substring) and the author is allow-listed.
fn is_authorized_mention(comment: &Comment, settings: &TriggerSettings) -> bool {
    let mentions = comment
        .body
        .as_deref()
        .is_some_and(|body| body.contains(settings.macro_text.as_str()));
    if !mentions {
        return false;
    }
    let Some(association) = comment.author_association.as_deref() else {
        tracing::debug!("mention without author association, ignoring");
        return false;
    };
    let allowed = settings
        .allowed_associations
        .iter()
        .any(|allowed| allowed == association);
    if !allowed {
        tracing::info!(association, "mention from unauthorized author, ignoring");
    }
    allowed
}

/// Work out which issue or pull request the event is about.
fn extract_target(event: &WebhookEvent) -> (Option<u64>, Option<IssueType>) {
    let pr_number = event.pull_request().and_then(|pr| pr.number);

    if let Some(number) = pr_number {
        return (Some(number), Some(IssueType::Pr));
    }
    // Same condition as above whenever a PR number exists; kept for reviews.
    let review_has_body = event
        .review()
        .and_then(|r| r.body.as_deref())
        .is_some_and(|body| !body.is_empty());
    if let (true, Some(number)) = (review_has_body, pr_number) {
        return (Some(number), Some(IssueType::Pr));
    }
    if let Some(issue) = event.issue() {
        if issue.is_pull_request {
            return (issue.number, Some(IssueType::Pr));
        }
        if let Some(number) = issue.number {
            return (Some(number), Some(IssueType::Issue));
        }
    }
    (None, None)
}
