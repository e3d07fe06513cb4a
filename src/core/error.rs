use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChaseError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Agent import rejected: {0}")]
    ImportRejected(String),
}

pub type Result<T> = std::result::Result<T, ChaseError>;
