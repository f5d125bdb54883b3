//! # CSV Export
//!
//! Streams the course sections of one quarter as CSV.
//!
//! ```text
//! QueryKey -> SectionStore -> project() -> CsvEncoder -> sink
//! ```
//!
//! - `schema`: the fixed column contract
//! - `row`: section document to flat row projection
//! - `encoder`: header/row encoding with schema checks
//! - `pipeline`: the export job and its state machine
//! - `fault`: testing-only forced encoder failures

pub mod encoder;
pub mod errors;
pub mod fault;
pub mod pipeline;
pub mod row;
pub mod schema;

pub use encoder::{CsvEncoder, EncoderOptions, LineTerminator};
pub use errors::{EncodeError, ExportError, ExportFailed, FailureKind, RowEncodingError};
pub use fault::{FaultInjection, UnknownFault};
pub use pipeline::{ExportJob, ExportState, ExportSummary, QueryKey};
pub use row::{project, FlatRow};
pub use schema::{Column, ExportSchema, FieldKind, SECTION_SCHEMA};
