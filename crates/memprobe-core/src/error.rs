//! Error types for memprobe-core

use thiserror::Error;

/// Errors raised while talking to the memory service
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL could not be used to build request URLs
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Connection, timeout or protocol failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Service answered with an unexpected status code
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// HTTP status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
