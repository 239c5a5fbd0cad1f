//! Error types for the intent responder

use thiserror::Error;

/// Result type alias for responder operations
pub type Result<T> = std::result::Result<T, ResponderError>;

#[derive(Error, Debug)]
pub enum ResponderError {

    // =============================
    // Core Pipeline Errors
    // =============================

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Intent dataset error: {0}")]
    DatasetError(String),

    #[error("Pattern index error: {0}")]
    IndexError(String),

    #[error("Sentiment model error: {0}")]
    SentimentModelError(String),

    #[error("Response selection error: {0}")]
    SelectionError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
