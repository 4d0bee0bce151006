use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::types::AgentOptions;
use crate::error::ActionError;

/// Configuration file read by the Kilo Code CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    /// Index 0 is the profile the CLI uses.
    pub profiles: Vec<Profile>,
    pub auto_approval: AutoApproval,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub id: String,
    pub provider: String,
    #[serde(flatten)]
    pub credentials: ProviderCredentials,
}

/// The one credential/model pair the profile carries, chosen by provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderCredentials {
    Kilocode {
        #[serde(rename = "kilocodeToken")]
        token: String,
        #[serde(rename = "kilocodeModel")]
        model: String,
    },
    OpenRouter {
        #[serde(rename = "openRouterApiKey")]
        api_key: String,
        #[serde(rename = "openRouterModelId")]
        model_id: String,
    },
    Anthropic {
        #[serde(rename = "apiKey")]
        api_key: String,
        #[serde(rename = "apiModelId")]
        model_id: String,
    },
    /// Any provider without dedicated fields.
    Generic {
        #[serde(rename = "apiKey")]
        api_key: String,
        #[serde(rename = "apiModelId")]
        model_id: String,
    },
}

impl ProviderCredentials {
    pub fn for_provider(provider: &str, api_key: &str, model: &str) -> Self {
        let (api_key, model) = (api_key.to_string(), model.to_string());
        match provider {
            "kilocode" => ProviderCredentials::Kilocode {
                token: api_key,
                model,
            },
            "openrouter" => ProviderCredentials::OpenRouter {
                api_key,
                model_id: model,
            },
            "anthropic" => ProviderCredentials::Anthropic {
                api_key,
                model_id: model,
            },
            _ => ProviderCredentials::Generic {
                api_key,
                model_id: model,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Toggle {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadApproval {
    pub enabled: bool,
    /// Allow reads outside the workspace.
    pub outside: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WriteApproval {
    pub enabled: bool,
    pub outside: bool,
    /// Allow writes to protected files (e.g. `.kilocodeignore`d paths).
    pub protected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecuteApproval {
    pub enabled: bool,
    pub allowed: Vec<String>,
    pub denied: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionApproval {
    pub enabled: bool,
    pub timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetryApproval {
    pub enabled: bool,
    pub delay: u64,
}

/// What the agent may do without asking. Generated here, enforced by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoApproval {
    pub read: ReadApproval,
    pub write: WriteApproval,
    pub execute: ExecuteApproval,
    pub browser: Toggle,
    pub mcp: Toggle,
    pub mode: Toggle,
    pub subtasks: Toggle,
    pub question: QuestionApproval,
    pub retry: RetryApproval,
    pub todo: Toggle,
}

/// Map agent options onto the CLI's configuration document.
pub fn build_config(options: &AgentOptions) -> AgentConfig {
    let profile = Profile {
        id: options.profile_id.clone(),
        provider: options.provider.clone(),
        credentials: ProviderCredentials::for_provider(
            &options.provider,
            &options.api_key,
            &options.model,
        ),
    };

    let on = Toggle { enabled: true };
    let auto_approval = AutoApproval {
        read: ReadApproval {
            enabled: true,
            outside: false,
        },
        write: WriteApproval {
            enabled: true,
            outside: false,
            protected: false,
        },
        execute: ExecuteApproval {
            enabled: true,
            allowed: options.allowed_commands.clone(),
            denied: options.denied_commands.clone(),
        },
        browser: Toggle {
            enabled: options.enable_browser,
        },
        mcp: Toggle {
            enabled: options.enable_mcp,
        },
        mode: on,
        subtasks: on,
        question: QuestionApproval {
            enabled: true,
            timeout: options.question_timeout,
        },
        retry: RetryApproval {
            enabled: true,
            delay: options.retry_delay,
        },
        todo: on,
    };

    AgentConfig {
        profiles: vec![profile],
        auto_approval,
    }
}

/// Where the CLI looks for its configuration: `~/.kilocode/config.json`.
pub fn default_config_path() -> Result<PathBuf, ActionError> {
    dirs::home_dir()
        .map(|home| home.join(".kilocode").join("config.json"))
        .ok_or_else(|| ActionError::Other("could not determine the home directory".into()))
}

/// Write the configuration as pretty JSON, creating parent directories.
///
/// The file holds the API key, so on Unix it is created owner-only and an
/// existing file is narrowed to owner-only before the key is written.
pub fn write_config(config: &AgentConfig, path: &Path) -> Result<(), ActionError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(json.as_bytes())?;

    tracing::info!(path = %path.display(), "wrote agent configuration");
    Ok(())
}
