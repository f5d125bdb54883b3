//! # Fault Injection
//!
//! Testing-only directive that makes the encoder fail as if a row did not
//! fit the schema, without needing a malformed section document.
//! The HTTP layer only honours it when `export.allow_fault_injection` is set.

use std::fmt;
use std::str::FromStr;

use super::errors::RowEncodingError;
use super::schema::ExportSchema;

/// Encoder failure to force
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaultInjection {
    #[default]
    None,
    DataTypeMismatch,
    RequiredFieldEmpty,
}

impl FaultInjection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultInjection::None => "",
            FaultInjection::DataTypeMismatch => "DataTypeMismatch",
            FaultInjection::RequiredFieldEmpty => "RequiredFieldEmpty",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FaultInjection::None)
    }

    /// The error this directive forces at `row`, naming the first column
    ///
    /// A schema without columns has nothing to name, so any directive other
    /// than `None` reports a surplus field instead.
    pub fn row_error(&self, schema: &ExportSchema, row: usize) -> Option<RowEncodingError> {
        if self.is_none() {
            return None;
        }
        let Some(column) = schema.column(0) else {
            return Some(RowEncodingError::TooManyFields {
                row,
                expected: 0,
                found: 1,
            });
        };
        match self {
            FaultInjection::None => None,
            FaultInjection::DataTypeMismatch => Some(RowEncodingError::TypeMismatch {
                row,
                field: column.name,
                expected: column.kind,
                value: "injected".to_string(),
            }),
            FaultInjection::RequiredFieldEmpty => Some(RowEncodingError::RequiredFieldEmpty {
                row,
                field: column.name,
            }),
        }
    }
}

impl fmt::Display for FaultInjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultInjection::None => f.write_str("none"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Rejected fault injection directive
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported fault injection '{0}' (expected DataTypeMismatch or RequiredFieldEmpty)")]
pub struct UnknownFault(pub String);

impl FromStr for FaultInjection {
    type Err = UnknownFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(FaultInjection::None),
            "DataTypeMismatch" | "CsvDataTypeMismatchException" => {
                Ok(FaultInjection::DataTypeMismatch)
            }
            "RequiredFieldEmpty" | "CsvRequiredFieldEmptyException" => {
                Ok(FaultInjection::RequiredFieldEmpty)
            }
            other => Err(UnknownFault(other.to_string())),
        }
    }
}
