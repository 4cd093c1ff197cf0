use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Problem error: {0}")]
    Problem(String),

    #[error("Start point error: {0}")]
    StartPoints(String),

    #[error("Unknown instruction: {0}")]
    UnknownInstruction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config source error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SwarmError>;
