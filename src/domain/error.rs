//! Domain error types

use thiserror::Error;

/// Error when free text cannot be turned into a transfer draft
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Could not find a recipient and amount. Try \"<name>에게 <amount>원\" (e.g., 홍길동에게 10만원)")]
    NoMatch,

    #[error("Invalid amount: \"{0}\"")]
    InvalidAmount(String),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
