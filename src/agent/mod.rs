pub mod command;
pub mod profile;

pub use command::{AgentCommand, build_command};
pub use profile::{AgentConfig, build_config, default_config_path, write_config};
