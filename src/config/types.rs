use std::fmt;

use serde::{Deserialize, Serialize};

/// Redact a secret string for Debug output. Shows "[REDACTED]" if non-empty, "[]" if empty.
pub(crate) fn redact(s: &str) -> &str {
    if s.is_empty() { "[]" } else { "[REDACTED]" }
}

// ── Top-level Settings ──────────────────────────────────────────────

/// Top-level configuration. Each field maps to a TOML `[section]`.
/// Uses `#[serde(default)]` so missing sections gracefully fall back.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub trigger: TriggerSettings,
    pub agent: AgentOptions,
    pub github: GithubSettings,
    pub templates: TextTemplates,
}

impl Settings {
    /// Copy of the settings with every secret replaced by its redacted marker.
    pub fn redacted(&self) -> Settings {
        let mut copy = self.clone();
        copy.agent.api_key = redact(&self.agent.api_key).to_string();
        copy
    }
}

// ── [trigger] ───────────────────────────────────────────────────────

/// What makes an inbound event launch the agent.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TriggerSettings {
    /// Mention that authorized users put in a comment or review body.
    #[serde(rename = "macro")]
    pub macro_text: String,
    /// Issue/PR label that triggers a run.
    pub label: String,
    /// Author associations allowed to trigger through a mention. Exact match.
    pub allowed_associations: Vec<String>,
}

impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            macro_text: "@kilocode-agent".into(),
            label: "fix-me".into(),
            allowed_associations: vec!["OWNER".into(), "COLLABORATOR".into(), "MEMBER".into()],
        }
    }
}

// ── [agent] ─────────────────────────────────────────────────────────

/// Options for the Kilo Code CLI: profile, auto-approval policy and invocation.
#[derive(Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AgentOptions {
    pub provider: String,
    pub model: String,
    pub profile_id: String,
    pub api_key: String,
    pub allowed_commands: Vec<String>,
    pub denied_commands: Vec<String>,
    pub enable_browser: bool,
    pub enable_mcp: bool,
    /// Seconds the agent waits on a follow-up question before auto-answering.
    pub question_timeout: u64,
    /// Seconds between agent retries of a failed API request.
    pub retry_delay: u64,
    /// Overall agent run timeout in seconds.
    pub timeout: u64,
    /// Agent mode (e.g. "code", "architect"). Empty means the CLI default.
    pub mode: String,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            provider: "openrouter".into(),
            model: "anthropic/claude-sonnet-4.5".into(),
            profile_id: "default".into(),
            api_key: String::new(),
            allowed_commands: [
                "npm",
                "npx",
                "yarn",
                "pnpm",
                "git status",
                "git diff",
                "git log",
                "ls",
                "cat",
                "grep",
                "find",
                "pwd",
                "echo",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            denied_commands: ["rm -rf", "sudo", "curl", "wget", "ssh"]
                .into_iter()
                .map(String::from)
                .collect(),
            enable_browser: false,
            enable_mcp: false,
            question_timeout: 30,
            retry_delay: 10,
            timeout: 600,
            mode: String::new(),
        }
    }
}

impl fmt::Debug for AgentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentOptions")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("profile_id", &self.profile_id)
            .field("api_key", &redact(&self.api_key))
            .field("allowed_commands", &self.allowed_commands)
            .field("denied_commands", &self.denied_commands)
            .field("enable_browser", &self.enable_browser)
            .field("enable_mcp", &self.enable_mcp)
            .field("question_timeout", &self.question_timeout)
            .field("retry_delay", &self.retry_delay)
            .field("timeout", &self.timeout)
            .field("mode", &self.mode)
            .finish()
    }
}

// ── [github] ────────────────────────────────────────────────────────

/// Workflow run context, normally filled from the runner's `GITHUB_*` variables.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct GithubSettings {
    /// "owner/name" of the repository the workflow runs in.
    pub repository: String,
    pub run_id: String,
}

impl GithubSettings {
    /// Split `repository` into (owner, name). `None` unless both halves are non-empty.
    pub fn owner_and_name(&self) -> Option<(&str, &str)> {
        self.repository
            .split_once('/')
            .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
    }
}

// ── [templates] ─────────────────────────────────────────────────────

const PROMPT_TEMPLATE: &str = r#"You are tasked with resolving the following GitHub issue.

Title: {{ title }}

Description:
{{ body }}

Analyze the issue, make the code changes needed to resolve it, and verify them where possible. Follow the existing code style and conventions of the repository. Do not commit or push; the workflow handles that after you finish."#;

const COMMIT_MESSAGE_TEMPLATE: &str = r#"fix: resolve issue #{{ issue_number }}

Automated fix generated by Kilo Code Agent.

Co-authored-by: kilocode-agent <kilocode-agent@users.noreply.github.com>"#;

const PR_BODY_TEMPLATE: &str = r#"## Summary

This pull request was generated automatically by Kilo Code Agent to resolve issue #{{ issue_number }}.

Please review the changes carefully before merging.

Closes #{{ issue_number }}"#;

const COMMENT_SUCCESS_TEMPLATE: &str = r#"✅ Kilo Code Agent has opened pull request #{{ pr_number }} to resolve this issue.

{{ pr_url }}"#;

const COMMENT_PARTIAL_TEMPLATE: &str = r#"⚠️ Kilo Code Agent made changes but could not open a pull request.

The changes were pushed to branch [`{{ branch_name }}`](https://github.com/{{ repo_owner }}/{{ repo_name }}/tree/{{ branch_name }})."#;

const COMMENT_FAILURE_TEMPLATE: &str = r#"❌ Kilo Code Agent could not resolve this issue automatically; no changes were made.

See the [workflow logs](https://github.com/{{ repo_owner }}/{{ repo_name }}/actions/runs/{{ run_id }}) for details."#;

/// Minijinja sources for every text artifact the action produces.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TextTemplates {
    pub prompt: String,
    pub commit_message: String,
    pub pr_body: String,
    pub comment_success: String,
    pub comment_partial: String,
    pub comment_failure: String,
}

impl Default for TextTemplates {
    fn default() -> Self {
        Self {
            prompt: PROMPT_TEMPLATE.into(),
            commit_message: COMMIT_MESSAGE_TEMPLATE.into(),
            pr_body: PR_BODY_TEMPLATE.into(),
            comment_success: COMMENT_SUCCESS_TEMPLATE.into(),
            comment_partial: COMMENT_PARTIAL_TEMPLATE.into(),
            comment_failure: COMMENT_FAILURE_TEMPLATE.into(),
        }
    }
}
