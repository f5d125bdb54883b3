//! # CSV Export Errors
//!
//! Encoder failures, their classification, and the single `ExportFailed`
//! error every export failure is surfaced as.

use std::io;

use thiserror::Error;

use crate::sections::StoreError;

use super::schema::FieldKind;

/// A row could not be encoded against the export schema
///
/// `row` is the 0-based index of the data row (the header is not counted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowEncodingError {
    #[error("row {row}: field '{field}' expects {expected}, got '{value}'")]
    TypeMismatch {
        row: usize,
        field: &'static str,
        expected: FieldKind,
        value: String,
    },

    #[error("row {row}: required field '{field}' is empty")]
    RequiredFieldEmpty { row: usize, field: &'static str },

    #[error("row {row}: field '{field}' is missing")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: {found} fields for {expected} columns")]
    TooManyFields {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl RowEncodingError {
    pub fn row(&self) -> usize {
        match self {
            RowEncodingError::TypeMismatch { row, .. }
            | RowEncodingError::RequiredFieldEmpty { row, .. }
            | RowEncodingError::MissingField { row, .. }
            | RowEncodingError::TooManyFields { row, .. } => *row,
        }
    }

    /// The offending column, when one can be named
    pub fn field(&self) -> Option<&'static str> {
        match self {
            RowEncodingError::TypeMismatch { field, .. }
            | RowEncodingError::RequiredFieldEmpty { field, .. }
            | RowEncodingError::MissingField { field, .. } => Some(field),
            RowEncodingError::TooManyFields { .. } => None,
        }
    }
}

/// Errors returned by `CsvEncoder`
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("{0}")]
    Row(#[from] RowEncodingError),

    #[error("write to sink failed: {0}")]
    Sink(#[from] io::Error),

    #[error("header already written")]
    HeaderAlreadyWritten,

    #[error("data row written before header")]
    HeaderNotWritten,
}

impl From<csv::Error> for EncodeError {
    fn from(e: csv::Error) -> Self {
        EncodeError::Sink(io::Error::from(e))
    }
}

/// Classified cause of a failed export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("query failed: {0}")]
    Query(#[from] StoreError),

    #[error("row encoding failed: {0}")]
    RowEncoding(RowEncodingError),

    #[error("output stream failed: {0}")]
    Sink(io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EncodeError> for ExportError {
    fn from(e: EncodeError) -> Self {
        match e {
            EncodeError::Row(row) => ExportError::RowEncoding(row),
            EncodeError::Sink(io) => ExportError::Sink(io),
            other => ExportError::Internal(other.to_string()),
        }
    }
}

/// Coarse failure kind, for logs and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Query,
    RowEncoding,
    Sink,
    Internal,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Query => "query",
            FailureKind::RowEncoding => "row_encoding",
            FailureKind::Sink => "sink",
            FailureKind::Internal => "internal",
        }
    }
}

/// An export terminated without producing a complete file
#[derive(Debug, Error)]
#[error("export of '{key}' failed: {cause}")]
pub struct ExportFailed {
    key: String,
    #[source]
    cause: ExportError,
}

impl ExportFailed {
    pub fn new(key: impl Into<String>, cause: ExportError) -> Self {
        Self {
            key: key.into(),
            cause,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cause(&self) -> &ExportError {
        &self.cause
    }

    pub fn kind(&self) -> FailureKind {
        match self.cause {
            ExportError::Query(_) => FailureKind::Query,
            ExportError::RowEncoding(_) => FailureKind::RowEncoding,
            ExportError::Sink(_) => FailureKind::Sink,
            ExportError::Internal(_) => FailureKind::Internal,
        }
    }

    /// Row index of a row encoding failure
    pub fn row(&self) -> Option<usize> {
        match &self.cause {
            ExportError::RowEncoding(e) => Some(e.row()),
            _ => None,
        }
    }
}

impl From<ExportFailed> for io::Error {
    fn from(e: ExportFailed) -> Self {
        match e {
            ExportFailed {
                cause: ExportError::Sink(io),
                ..
            } => io,
            other => io::Error::other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_classification() {
        let row = RowEncodingError::MissingField {
            row: 3,
            field: "status",
        };
        assert!(matches!(
            ExportError::from(EncodeError::Row(row)),
            ExportError::RowEncoding(_)
        ));

        let sink = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        assert!(matches!(
            ExportError::from(EncodeError::Sink(sink)),
            ExportError::Sink(_)
        ));

        assert!(matches!(
            ExportError::from(EncodeError::HeaderNotWritten),
            ExportError::Internal(_)
        ));
    }

    #[test]
    fn test_export_failed_reports_row() {
        let failed = ExportFailed::new(
            "20252",
            ExportError::RowEncoding(RowEncodingError::RequiredFieldEmpty {
                row: 7,
                field: "enrollCode",
            }),
        );

        assert_eq!(failed.kind(), FailureKind::RowEncoding);
        assert_eq!(failed.row(), Some(7));
        let msg = failed.to_string();
        assert!(msg.contains("20252"));
        assert!(msg.contains("enrollCode"));
    }

    #[test]
    fn test_export_failed_into_io_error_keeps_sink_kind() {
        let failed = ExportFailed::new(
            "20252",
            ExportError::Sink(io::Error::new(io::ErrorKind::BrokenPipe, "client went away")),
        );
        let io_err: io::Error = failed.into();
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);

        let failed = ExportFailed::new("20252", ExportError::Query(StoreError::Unavailable("down".into())));
        let io_err: io::Error = failed.into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
    }
}
