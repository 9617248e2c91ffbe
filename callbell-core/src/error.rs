//! Error types for the callbell ecosystem.

use thiserror::Error;

/// Errors that can occur in callbell operations.
#[derive(Error, Debug)]
pub enum CallbellError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calendar provider error: {0}")]
    Calendar(String),

    #[error("Call dispatch error: {0}")]
    Dispatch(String),

    #[error("Reminder already recorded for event '{0}'")]
    DuplicateReminder(String),

    #[error("Request to {0} timed out after {1}s")]
    Timeout(&'static str, u64),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for callbell operations.
pub type CallbellResult<T> = Result<T, CallbellError>;
