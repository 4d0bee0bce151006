use std::collections::HashMap;
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::agent;
use crate::config::env::validate_environment;
use crate::config::loader::{load_settings, process_env};
use crate::config::types::Settings;
use crate::error::ActionError;
use crate::event::{self, classify};
use crate::git;
use crate::output::{verdict_outputs, write_step_outputs};
use crate::template::{self, IssueDetails, ResolutionResult};

/// kilocode-action: run the Kilo Code agent on issues and pull requests from GitHub Actions.
#[derive(Parser, Debug)]
#[command(name = "kilocode-action", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Settings override, repeatable: `--set agent.timeout=300`.
    #[arg(long = "set", global = true, value_name = "SECTION.KEY=VALUE")]
    pub overrides: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Decide whether the current event should launch the agent.
    Classify {
        #[arg(long, env = "GITHUB_EVENT_NAME")]
        event_name: String,
        /// JSON payload of the event.
        #[arg(long, env = "GITHUB_EVENT_PATH")]
        event_path: Option<PathBuf>,
        /// Step output file; the verdict is also written there when set.
        #[arg(long, env = "GITHUB_OUTPUT")]
        github_output: Option<PathBuf>,
    },
    /// Check that the required credentials are present.
    Validate,
    /// Render the agent prompt for an issue.
    Prompt {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: Option<String>,
        #[command(flatten)]
        output: TextOutput,
    },
    /// Render the commit message for an issue fix.
    CommitMessage {
        #[arg(long)]
        issue: u64,
        #[command(flatten)]
        output: TextOutput,
    },
    /// Render the pull request body for an issue fix.
    PrBody {
        #[arg(long)]
        issue: u64,
        #[command(flatten)]
        output: TextOutput,
    },
    /// Render the status comment posted after the run.
    Comment {
        #[arg(long)]
        issue: u64,
        /// Bare flag or explicit value (`true`, `false`, `1`, `0`, ...).
        #[arg(
            long,
            action = ArgAction::Set,
            num_args = 0..=1,
            default_value_t = false,
            default_missing_value = "true",
            value_parser = BoolishValueParser::new()
        )]
        has_changes: bool,
        /// Empty means no pull request was opened.
        #[arg(long)]
        pr_number: Option<String>,
        /// Empty means no pull request was opened.
        #[arg(long)]
        pr_url: Option<String>,
        #[arg(long)]
        branch: String,
        /// Defaults to the owner in `GITHUB_REPOSITORY`.
        #[arg(long)]
        owner: Option<String>,
        /// Defaults to the name in `GITHUB_REPOSITORY`.
        #[arg(long)]
        repo: Option<String>,
        /// Defaults to `GITHUB_RUN_ID`.
        #[arg(long)]
        run_id: Option<String>,
        #[command(flatten)]
        output: TextOutput,
    },
    /// Derive the branch name for an issue fix.
    BranchName {
        #[arg(long)]
        issue: u64,
        /// Unix milliseconds; the current time when omitted.
        #[arg(long)]
        timestamp_ms: Option<i64>,
        #[command(flatten)]
        output: TextOutput,
    },
    /// Write the agent configuration file (default `~/.kilocode/config.json`).
    WriteConfig {
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Print the agent command line as JSON.
    #[command(name = "command")]
    AgentCommand,
    /// Print the effective settings as TOML, secrets redacted.
    Settings,
}

/// Where a rendered text goes besides stdout.
#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct TextOutput {
    /// Also write the text as this step output.
    #[arg(long)]
    pub output_key: Option<String>,
    #[arg(long, env = "GITHUB_OUTPUT", hide_env_values = true)]
    pub github_output: Option<PathBuf>,
}

impl Command {
    /// Return the canonical name used in logs.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Command::Classify { .. } => "classify",
            Command::Validate => "validate",
            Command::Prompt { .. } => "prompt",
            Command::CommitMessage { .. } => "commit-message",
            Command::PrBody { .. } => "pr-body",
            Command::Comment { .. } => "comment",
            Command::BranchName { .. } => "branch-name",
            Command::WriteConfig { .. } => "write-config",
            Command::AgentCommand => "command",
            Command::Settings => "settings",
        }
    }
}

/// Config keys that cannot be overridden from the command line.
///
/// Secrets come from the environment only, so they never show up in
/// workflow logs as part of a command line.
pub const FORBIDDEN_OVERRIDE_KEYS: &[&str] = &["api_key"];

/// Check if a config key is forbidden for override.
///
/// Returns `Some(matched_forbidden_key)` if the key matches, `None` if allowed.
pub fn check_forbidden_key(key: &str) -> Option<&'static str> {
    let key_lower = key.to_lowercase();
    let segments: Vec<&str> = key_lower.split('.').collect();
    FORBIDDEN_OVERRIDE_KEYS
        .iter()
        .find(|&&forbidden| key_lower == forbidden || segments.contains(&forbidden))
        .copied()
}

/// Parse `--set` values into a map of config overrides.
/// Format: `section.key=value` or `section__key=value` (double underscores → dots).
fn parse_config_overrides(raw: &[String]) -> Result<HashMap<String, String>, ActionError> {
    let mut overrides = HashMap::new();

    for arg in raw {
        let stripped = arg.trim_start_matches('-');
        if stripped.is_empty() {
            continue;
        }

        let Some((key, value)) = stripped.split_once('=') else {
            return Err(ActionError::Other(format!(
                "invalid override '{arg}', expected section.key=value"
            )));
        };
        let key = key.replace("__", ".");

        if let Some(forbidden) = check_forbidden_key(&key) {
            return Err(ActionError::Other(format!(
                "forbidden CLI override: '{key}' (matches '{forbidden}')"
            )));
        }

        overrides.insert(key, value.to_string());
    }

    Ok(overrides)
}

pub fn run() -> Result<(), ActionError> {
    let cli = Cli::parse();
    let config_overrides = parse_config_overrides(&cli.overrides)?;
    let env = process_env();
    let settings = load_settings(&config_overrides, &env)?;

    tracing::info!(
        command = cli.command.canonical_name(),
        overrides = config_overrides.len(),
        provider = %settings.agent.provider,
        "starting kilocode-action"
    );

    match cli.command {
        Command::Classify {
            event_name,
            event_path,
            github_output,
        } => {
            let event = event::load_event(&event_name, event_path.as_deref())?;
            let verdict = classify(&event, &settings.trigger);
            tracing::info!(
                event = %event_name,
                should_trigger = verdict.should_trigger,
                reason = ?verdict.trigger_reason.as_ref().map(ToString::to_string),
                "classified event"
            );
            println!("{}", serde_json::to_string_pretty(&verdict)?);
            if let Some(path) = github_output {
                write_step_outputs(&path, &verdict_outputs(&verdict))?;
            }
        }
        Command::Validate => {
            let result = validate_environment(&env);
            for warning in &result.warnings {
                tracing::warn!("{warning}");
                println!("::warning::{warning}");
            }
            for error in &result.errors {
                tracing::error!("{error}");
                println!("::error::{error}");
            }
            if !result.valid {
                return Err(ActionError::Other(format!(
                    "environment validation failed with {} error(s)",
                    result.errors.len()
                )));
            }
            tracing::info!("environment is valid");
        }
        Command::Prompt {
            title,
            body,
            output,
        } => {
            let text = template::prompt(&settings.templates, &IssueDetails { title, body })?;
            emit_text(&text, &output)?;
        }
        Command::CommitMessage { issue, output } => {
            let text = template::commit_message(&settings.templates, issue)?;
            emit_text(&text, &output)?;
        }
        Command::PrBody { issue, output } => {
            let text = template::pr_body(&settings.templates, issue)?;
            emit_text(&text, &output)?;
        }
        Command::Comment {
            issue,
            has_changes,
            pr_number,
            pr_url,
            branch,
            owner,
            repo,
            run_id,
            output,
        } => {
            let result = resolution_from_args(
                &settings, issue, has_changes, pr_number, pr_url, branch, owner, repo, run_id,
            )?;
            let text = template::result_comment(&settings.templates, &result)?;
            emit_text(&text, &output)?;
        }
        Command::BranchName {
            issue,
            timestamp_ms,
            output,
        } => {
            let name = match timestamp_ms {
                Some(ms) => git::branch_name_at(issue, ms),
                None => git::branch_name(issue),
            };
            emit_text(&name, &output)?;
        }
        Command::WriteConfig { path } => {
            let path = match path {
                Some(p) => p,
                None => agent::default_config_path()?,
            };
            if settings.agent.api_key.is_empty() {
                tracing::warn!("writing agent configuration without an API key");
            }
            let config = agent::build_config(&settings.agent);
            agent::write_config(&config, &path)?;
        }
        Command::AgentCommand => {
            let command = agent::build_command(&settings.agent);
            tracing::info!(%command, "built agent command");
            println!("{}", serde_json::to_string(&command)?);
        }
        Command::Settings => {
            println!("{}", toml::to_string_pretty(&settings.redacted())?);
        }
    }

    Ok(())
}

/// Print rendered text and, when asked, write it as a step output.
fn emit_text(text: &str, output: &TextOutput) -> Result<(), ActionError> {
    println!("{text}");
    if let Some(key) = &output.output_key {
        let path = output.github_output.as_ref().ok_or_else(|| {
            ActionError::Other(format!(
                "--output-key {key} needs GITHUB_OUTPUT or --github-output"
            ))
        })?;
        write_step_outputs(path, &[(key.as_str(), text.to_string())])?;
    }
    Ok(())
}

/// Step outputs forward absent values as empty strings.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Assemble a `ResolutionResult`, filling repository and run from settings.
#[allow(clippy::too_many_arguments)]
fn resolution_from_args(
    settings: &Settings,
    issue_number: u64,
    has_changes: bool,
    pr_number: Option<String>,
    pr_url: Option<String>,
    branch_name: String,
    owner: Option<String>,
    repo: Option<String>,
    run_id: Option<String>,
) -> Result<ResolutionResult, ActionError> {
    let from_settings = settings.github.owner_and_name();
    let repo_owner = owner
        .or_else(|| from_settings.map(|(o, _)| o.to_string()))
        .ok_or_else(|| ActionError::Other("--owner or GITHUB_REPOSITORY is required".into()))?;
    let repo_name = repo
        .or_else(|| from_settings.map(|(_, n)| n.to_string()))
        .ok_or_else(|| ActionError::Other("--repo or GITHUB_REPOSITORY is required".into()))?;
    let run_id = run_id
        .or_else(|| Some(settings.github.run_id.clone()))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ActionError::Other("--run-id or GITHUB_RUN_ID is required".into()))?;

    let pr_number = non_blank(pr_number)
        .map(|raw| {
            raw.parse::<u64>().map_err(|e| ActionError::InvalidInput {
                name: "--pr-number".into(),
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()?;
    let pr_url = non_blank(pr_url);

    Ok(ResolutionResult {
        issue_number,
        has_changes,
        pr_number,
        pr_url,
        branch_name,
        repo_owner,
        repo_name,
        run_id,
    })
}
