use std::collections::HashMap;
use std::path::Path;

use figment::Figment;
use figment::providers::{Format, Toml};

use crate::config::types::Settings;
use crate::error::ActionError;

// Embedded default TOML so the binary is self-contained.
static CONFIGURATION_TOML: &str = include_str!("../../settings/configuration.toml");

/// Optional per-repository settings file, read from the working directory only.
pub const LOCAL_SETTINGS_FILE: &str = ".kilocode-action.toml";

/// Environment variables that map onto a settings key.
///
/// Action inputs arrive as `INPUT_<NAME>`; the rest are set by the runner or
/// by the workflow's `env:` block.
const ENV_BINDINGS: &[(&str, &str, &str)] = &[
    ("KILOCODE_API_KEY", "agent", "api_key"),
    ("GITHUB_REPOSITORY", "github", "repository"),
    ("GITHUB_RUN_ID", "github", "run_id"),
    ("INPUT_PROVIDER", "agent", "provider"),
    ("INPUT_MODEL", "agent", "model"),
    ("INPUT_PROFILE", "agent", "profile_id"),
    ("INPUT_TIMEOUT", "agent", "timeout"),
    ("INPUT_MODE", "agent", "mode"),
    ("INPUT_ALLOWED_COMMANDS", "agent", "allowed_commands"),
    ("INPUT_DENIED_COMMANDS", "agent", "denied_commands"),
    ("INPUT_ENABLE_BROWSER", "agent", "enable_browser"),
    ("INPUT_ENABLE_MCP", "agent", "enable_mcp"),
    ("INPUT_QUESTION_TIMEOUT", "agent", "question_timeout"),
    ("INPUT_RETRY_DELAY", "agent", "retry_delay"),
    ("INPUT_MACRO", "trigger", "macro"),
    ("INPUT_TRIGGER_LABEL", "trigger", "label"),
];

/// Snapshot the process environment for `load_settings`.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Build the full configuration by merging layers:
///
/// 1. Embedded TOML defaults (`settings/configuration.toml`)
/// 2. `.kilocode-action.toml` from the working directory (optional)
/// 3. Environment bindings (`ENV_BINDINGS`), empty values skipped
/// 4. CLI argument overrides (`--set section.key=value`)
pub fn load_settings(
    cli_overrides: &HashMap<String, String>,
    env: &HashMap<String, String>,
) -> Result<Settings, ActionError> {
    load_settings_with_file(Path::new(LOCAL_SETTINGS_FILE), cli_overrides, env)
}

/// `load_settings` with an explicit path for the local settings file.
///
/// The file is read at exactly `local_file`; parent directories are not searched.
pub fn load_settings_with_file(
    local_file: &Path,
    cli_overrides: &HashMap<String, String>,
    env: &HashMap<String, String>,
) -> Result<Settings, ActionError> {
    let defaults = toml::Value::try_from(Settings::default())?;

    // Layers 1 + 2
    let mut figment = Figment::new()
        .merge(Toml::string(CONFIGURATION_TOML))
        .merge(Toml::file_exact(local_file));

    // Layer 3: env bindings, typed after the default value of the target key
    for (var, section, field) in ENV_BINDINGS {
        let Some(raw) = env.get(*var) else {
            continue;
        };
        if raw.trim().is_empty() {
            continue;
        }
        if let Some(fragment) = settings_fragment(&defaults, section, field, raw, var)? {
            tracing::debug!(var, section, field, "applying environment setting");
            figment = figment.merge(Toml::string(&fragment));
        }
    }

    // Layer 4: CLI overrides (--set agent.timeout=300)
    let mut keys: Vec<&String> = cli_overrides.keys().collect();
    keys.sort();
    for key in keys {
        let value = &cli_overrides[key];
        let Some((section, field)) = key.split_once('.') else {
            tracing::warn!("ignoring CLI override with no section: {key}={value}");
            continue;
        };
        if let Some(fragment) = settings_fragment(&defaults, section, field, value, key)? {
            figment = figment.merge(Toml::string(&fragment));
        }
    }

    let settings: Settings = figment.extract()?;
    Ok(settings)
}

/// Convert a raw string for `section.field` into a TOML fragment.
///
/// The value is typed after the default for that key, so `run_id=123` stays a
/// string while `timeout=300` becomes an integer. Lists accept comma- or
/// newline-separated items. Unknown keys are skipped with a warning.
fn settings_fragment(
    defaults: &toml::Value,
    section: &str,
    field: &str,
    raw: &str,
    source: &str,
) -> Result<Option<String>, ActionError> {
    let Some(existing) = defaults.get(section).and_then(|s| s.get(field)) else {
        tracing::warn!(source, "ignoring unknown setting {section}.{field}");
        return Ok(None);
    };

    let invalid = |reason: &str| ActionError::InvalidInput {
        name: source.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    let value = match existing {
        toml::Value::Integer(_) => trimmed
            .parse::<i64>()
            .map(toml::Value::Integer)
            .map_err(|_| invalid("expected an integer"))?,
        toml::Value::Boolean(_) => match trimmed.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => toml::Value::Boolean(true),
            "false" | "0" | "no" | "off" => toml::Value::Boolean(false),
            _ => return Err(invalid("expected true or false")),
        },
        toml::Value::Array(_) => toml::Value::Array(
            trimmed
                .split([',', '\n'])
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| toml::Value::String(item.to_string()))
                .collect(),
        ),
        _ => toml::Value::String(raw.to_string()),
    };

    let mut inner = toml::Table::new();
    inner.insert(field.to_string(), value);
    let mut root = toml::Table::new();
    root.insert(section.to_string(), toml::Value::Table(inner));
    Ok(Some(toml::to_string(&root)?))
}
