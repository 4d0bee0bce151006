use std::fmt;

use serde::Serialize;

use crate::config::types::AgentOptions;

/// Executable name of the Kilo Code CLI.
pub const AGENT_COMMAND: &str = "kilocode";

/// A command line for the agent CLI. Argument order matters: the CLI pairs
/// each flag with the value that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentCommand {
    pub command: String,
    pub args: Vec<String>,
}

impl fmt::Display for AgentCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// `kilocode --auto --timeout <timeout> [--mode <mode>]`
pub fn build_command(options: &AgentOptions) -> AgentCommand {
    let mut args = vec![
        "--auto".to_string(),
        "--timeout".to_string(),
        options.timeout.to_string(),
    ];
    if !options.mode.is_empty() {
        args.push("--mode".to_string());
        args.push(options.mode.clone());
    }
    AgentCommand {
        command: AGENT_COMMAND.to_string(),
        args,
    }
}
