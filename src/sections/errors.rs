//! # Section Store Errors

use thiserror::Error;

/// Result type for store lookups
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the section store collaborator
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Invalid quarter: '{0}' (expected yyyyq)")]
    InvalidQuarter(String),

    #[error("Section store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Invalid section document: {0}")]
    ParseError(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::IoError(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::ParseError(e.to_string())
    }
}
