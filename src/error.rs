use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidInput {
        name: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("{0}")]
    Other(String),
}

impl From<figment::Error> for ActionError {
    fn from(err: figment::Error) -> Self {
        ActionError::Config(Box::new(err))
    }
}
