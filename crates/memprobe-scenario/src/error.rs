//! Error types for memprobe-scenario

use thiserror::Error;

/// Scenario error type
#[derive(Debug, Error)]
pub enum Error {
    /// Transcript sink or scenario file I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario file is not valid RON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Scenario is structurally unusable
    #[error("Validation error: {0}")]
    Validation(String),

    /// No built-in scenario with that name
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),
}

/// Result type for scenario operations
pub type Result<T> = std::result::Result<T, Error>;
