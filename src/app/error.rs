use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid version pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Release output error: {0}")]
    Output(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NotifierError>;
