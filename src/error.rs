//! Error types for Herald.

use thiserror::Error;

/// Library-level error type for Herald operations.
#[derive(Error, Debug)]
pub enum HeraldError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("NewsAPI error ({code}): {message}")]
    NewsApi { code: String, message: String },

    #[error("Could not parse date from: '{0}'")]
    DateParse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for Herald operations.
pub type Result<T> = std::result::Result<T, HeraldError>;
