//! Error types for the fittrack_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fittrack_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed user input (empty field, unparseable number)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A named exercise or workout template does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation is not legal in the current session state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The data document could not be written durably
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
