//! CLI-specific error types

use std::fmt;
use std::io;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Reading input or writing the export failed
    IoError,
    /// Section store could not be opened
    StoreError,
    /// Export terminated early
    ExportFailed,
    /// HTTP server stopped with an error
    ServeFailed,
}

impl CliErrorCode {
    /// Stable identifier printed ahead of the message
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "COURSECSV_CLI_CONFIG_ERROR",
            Self::IoError => "COURSECSV_CLI_IO_ERROR",
            Self::StoreError => "COURSECSV_CLI_STORE_ERROR",
            Self::ExportFailed => "COURSECSV_CLI_EXPORT_FAILED",
            Self::ServeFailed => "COURSECSV_CLI_SERVE_FAILED",
        }
    }
}

/// Fatal CLI error; `main` prints it and exits non-zero
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config file missing, unreadable or invalid
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Section data file could not be loaded
    pub fn store_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::StoreError, msg)
    }

    /// Export stopped before the last row; partial output may exist
    pub fn export_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ExportFailed, msg)
    }

    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::new(CliErrorCode::IoError, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
