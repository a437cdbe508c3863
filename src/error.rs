//! Error types for lingscribe.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LingscribeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio errors
    #[error("Audio decode failed: {message}")]
    AudioDecode { message: String },

    #[error("Audio encode failed: {message}")]
    AudioEncode { message: String },

    // Oracle errors
    #[error("Oracle request failed: {message}")]
    OracleRequest { message: String },

    #[error("Oracle returned an unusable response: {message}")]
    OracleResponse { message: String },

    #[error("Oracle call for chunk {index} timed out after {timeout_ms}ms")]
    OracleTimeout { index: usize, timeout_ms: u64 },

    // Job errors
    #[error("Transcription job failed: {message}")]
    Job { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, LingscribeError>;
