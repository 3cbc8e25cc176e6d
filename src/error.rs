//! Error types for taskmon

use std::io;
use thiserror::Error;

/// Result type alias for taskmon operations
pub type Result<T> = std::result::Result<T, TaskmonError>;

/// Main error type for taskmon
#[derive(Error, Debug)]
pub enum TaskmonError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Process-related error
    #[error("Process error: {0}")]
    Process(String),

    /// Command execution failed
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}
