//! Error types for the Mathesis learning platform
//!
//! This module provides structured error handling using thiserror for
//! error definitions and anyhow for propagation at binary boundaries.

use thiserror::Error;

/// Main error type for Mathesis operations
#[derive(Error, Debug)]
pub enum MathesisError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// User not found
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Course not found
    #[error("Course not found: {0}")]
    CourseNotFound(i64),

    /// Account with the same email or username already exists
    #[error("Account already exists: {0}")]
    AccountExists(String),

    /// Login credentials did not match any account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Progress snapshot has no topics, so the completion ratio is undefined.
    /// Callers must guarantee `total_topics >= 1` before scoring.
    #[error("Cannot score progress: curriculum has zero topics")]
    EmptyCurriculum,

    /// Session token missing or expired
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// Request input rejected before any state change
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Mathesis operations
pub type Result<T> = std::result::Result<T, MathesisError>;

impl From<libsql::Error> for MathesisError {
    fn from(err: libsql::Error) -> Self {
        MathesisError::Database(err.to_string())
    }
}

/// Convert anyhow::Error to MathesisError
impl From<anyhow::Error> for MathesisError {
    fn from(err: anyhow::Error) -> Self {
        MathesisError::Other(err.to_string())
    }
}
