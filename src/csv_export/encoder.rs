//! # CSV Encoder
//!
//! Single-pass encoder bound to one sink for the duration of one export.
//!
//! Every row is checked against the export schema before any of its bytes
//! are handed to the writer, so a rejected row is never partially written.
//! Rows written before the rejection stay written.

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::errors::{EncodeError, RowEncodingError};
use super::fault::FaultInjection;
use super::row::FlatRow;
use super::schema::ExportSchema;

/// Record terminator written after every row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    Lf,
    Crlf,
}

/// Encoder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderOptions {
    /// Field delimiter; must be a single ASCII character (default: ',')
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default)]
    pub line_terminator: LineTerminator,

    /// Bytes buffered before they are pushed to the sink (default: 8 KiB)
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
}

fn default_delimiter() -> char {
    ','
}

fn default_buffer_capacity() -> usize {
    8 * 1024
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            line_terminator: LineTerminator::default(),
            buffer_capacity: default_buffer_capacity(),
        }
    }
}

impl EncoderOptions {
    pub fn validate(&self) -> Result<(), String> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\r' | '\n') {
            return Err(format!("invalid delimiter: {:?}", self.delimiter));
        }
        if self.buffer_capacity == 0 {
            return Err("buffer_capacity must be > 0".to_string());
        }
        Ok(())
    }

    fn builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter as u8)
            .quote_style(csv::QuoteStyle::Necessary)
            .double_quote(true)
            .has_headers(false)
            .buffer_capacity(self.buffer_capacity);
        match self.line_terminator {
            LineTerminator::Lf => builder.terminator(csv::Terminator::Any(b'\n')),
            LineTerminator::Crlf => builder.terminator(csv::Terminator::CRLF),
        };
        builder
    }
}

/// Encodes a header and data rows onto a sink
///
/// The encoder owns the sink; dropping the encoder on any path releases it.
pub struct CsvEncoder<W: Write> {
    writer: csv::Writer<W>,
    schema: &'static ExportSchema,
    header_written: bool,
    rows_written: usize,
    fault: FaultInjection,
}

impl<W: Write> CsvEncoder<W> {
    pub fn new(sink: W, schema: &'static ExportSchema) -> Self {
        Self::with_options(sink, schema, &EncoderOptions::default())
    }

    pub fn with_options(sink: W, schema: &'static ExportSchema, options: &EncoderOptions) -> Self {
        Self {
            writer: options.builder().from_writer(sink),
            schema,
            header_written: false,
            rows_written: 0,
            fault: FaultInjection::None,
        }
    }

    /// Force the given failure when the header is written
    pub fn inject_fault(&mut self, fault: FaultInjection) {
        self.fault = fault;
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Write the column names. Must be called once, before any row.
    pub fn write_header(&mut self) -> Result<(), EncodeError> {
        if self.header_written {
            return Err(EncodeError::HeaderAlreadyWritten);
        }
        if let Some(err) = self.fault.row_error(self.schema, self.rows_written) {
            warn!(fault = %self.fault, "fault injected into CSV encoder");
            return Err(err.into());
        }

        self.writer.write_record(self.schema.field_names())?;
        self.header_written = true;
        debug!(columns = self.schema.arity(), "wrote CSV header");
        Ok(())
    }

    /// Write one data row, or nothing if the row does not fit the schema
    pub fn write_row(&mut self, row: &FlatRow) -> Result<(), EncodeError> {
        if !self.header_written {
            return Err(EncodeError::HeaderNotWritten);
        }
        self.check_row(row)?;

        self.writer.write_record(row.fields())?;
        self.rows_written += 1;
        Ok(())
    }

    /// Flush buffered bytes and hand back the sink
    pub fn close(self) -> Result<W, EncodeError> {
        let rows = self.rows_written;
        let sink = self
            .writer
            .into_inner()
            .map_err(|e| EncodeError::Sink(e.into_error()))?;
        debug!(rows, "closed CSV encoder");
        Ok(sink)
    }

    fn check_row(&self, row: &FlatRow) -> Result<(), RowEncodingError> {
        let index = self.rows_written;
        let columns = self.schema.columns();

        if row.len() > columns.len() {
            return Err(RowEncodingError::TooManyFields {
                row: index,
                expected: columns.len(),
                found: row.len(),
            });
        }

        for (i, column) in columns.iter().enumerate() {
            let value = row.get(i).ok_or(RowEncodingError::MissingField {
                row: index,
                field: column.name,
            })?;

            if value.trim().is_empty() {
                if column.required {
                    return Err(RowEncodingError::RequiredFieldEmpty {
                        row: index,
                        field: column.name,
                    });
                }
                continue;
            }

            if !column.kind.accepts(value) {
                return Err(RowEncodingError::TypeMismatch {
                    row: index,
                    field: column.name,
                    expected: column.kind,
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_export::schema::{Column, FieldKind};
    use std::io;

    static SCHEMA: ExportSchema = ExportSchema::new(&[
        Column::required("id", FieldKind::Text),
        Column::optional("note", FieldKind::Text),
        Column::optional("count", FieldKind::Integer),
    ]);

    fn row(fields: &[&str]) -> FlatRow {
        fields.iter().copied().collect()
    }

    fn encode(rows: &[FlatRow]) -> String {
        let mut encoder = CsvEncoder::new(Vec::new(), &SCHEMA);
        encoder.write_header().unwrap();
        for r in rows {
            encoder.write_row(r).unwrap();
        }
        String::from_utf8(encoder.close().unwrap()).unwrap()
    }

    #[test]
    fn test_header_only() {
        assert_eq!(encode(&[]), "id,note,count\n");
    }

    #[test]
    fn test_rows_follow_header() {
        let out = encode(&[row(&["a", "first", "1"]), row(&["b", "", ""])]);
        assert_eq!(out, "id,note,count\na,first,1\nb,,\n");
    }

    #[test]
    fn test_quotes_embedded_quotes_and_delimiters() {
        let out = encode(&[row(&["a", r#"He said "hi", twice"#, "2"])]);
        assert_eq!(out, "id,note,count\na,\"He said \"\"hi\"\", twice\",2\n");
    }

    #[test]
    fn test_quotes_line_breaks() {
        let out = encode(&[row(&["a", "two\nlines", ""]), row(&["b", "cr\rhere", ""])]);
        assert!(out.contains("\"two\nlines\""));
        assert!(out.contains("\"cr\rhere\""));
    }

    #[test]
    fn test_custom_delimiter_and_terminator() {
        let options = EncoderOptions {
            delimiter: ';',
            line_terminator: LineTerminator::Crlf,
            ..Default::default()
        };
        let mut encoder = CsvEncoder::with_options(Vec::new(), &SCHEMA, &options);
        encoder.write_header().unwrap();
        encoder.write_row(&row(&["a", "x;y", "3"])).unwrap();
        let out = String::from_utf8(encoder.close().unwrap()).unwrap();
        assert_eq!(out, "id;note;count\r\na;\"x;y\";3\r\n");
    }

    #[test]
    fn test_row_before_header_rejected() {
        let mut encoder = CsvEncoder::new(Vec::new(), &SCHEMA);
        let err = encoder.write_row(&row(&["a", "", ""])).unwrap_err();
        assert!(matches!(err, EncodeError::HeaderNotWritten));
    }

    #[test]
    fn test_second_header_rejected() {
        let mut encoder = CsvEncoder::new(Vec::new(), &SCHEMA);
        encoder.write_header().unwrap();
        assert!(matches!(
            encoder.write_header(),
            Err(EncodeError::HeaderAlreadyWritten)
        ));
    }

    #[test]
    fn test_type_mismatch_writes_nothing() {
        let mut encoder = CsvEncoder::new(Vec::new(), &SCHEMA);
        encoder.write_header().unwrap();
        encoder.write_row(&row(&["a", "ok", "1"])).unwrap();

        let err = encoder.write_row(&row(&["b", "bad", "one"])).unwrap_err();
        match err {
            EncodeError::Row(RowEncodingError::TypeMismatch { row, field, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(field, "count");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert_eq!(encoder.rows_written(), 1);
        let out = String::from_utf8(encoder.close().unwrap()).unwrap();
        assert_eq!(out, "id,note,count\na,ok,1\n");
    }

    #[test]
    fn test_missing_and_empty_required_fields() {
        let mut encoder = CsvEncoder::new(Vec::new(), &SCHEMA);
        encoder.write_header().unwrap();

        assert!(matches!(
            encoder.write_row(&row(&["a", "short"])),
            Err(EncodeError::Row(RowEncodingError::MissingField { row: 0, field: "count" }))
        ));
        assert!(matches!(
            encoder.write_row(&row(&[" ", "", ""])),
            Err(EncodeError::Row(RowEncodingError::RequiredFieldEmpty { row: 0, field: "id" }))
        ));
        assert!(matches!(
            encoder.write_row(&row(&["a", "", "", "extra"])),
            Err(EncodeError::Row(RowEncodingError::TooManyFields { expected: 3, found: 4, .. }))
        ));
    }

    #[test]
    fn test_injected_fault_fails_header() {
        let mut encoder = CsvEncoder::new(Vec::new(), &SCHEMA);
        encoder.inject_fault(FaultInjection::RequiredFieldEmpty);

        assert!(matches!(
            encoder.write_header(),
            Err(EncodeError::Row(RowEncodingError::RequiredFieldEmpty { row: 0, field: "id" }))
        ));
        assert!(encoder.close().unwrap().is_empty());
    }

    #[derive(Debug)]
    struct PeerClosed;

    impl std::fmt::Display for PeerClosed {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("peer closed")
        }
    }

    impl std::error::Error for PeerClosed {}

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, PeerClosed))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_surfaces_on_close() {
        let mut encoder = CsvEncoder::new(BrokenSink, &SCHEMA);
        encoder.write_header().unwrap();
        match encoder.close() {
            Err(EncodeError::Sink(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::BrokenPipe);
                // the sink's own error comes back, not a copy of its message
                assert!(e.get_ref().is_some_and(|inner| inner.is::<PeerClosed>()));
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("close should fail"),
        }
    }

    #[test]
    fn test_options_validation() {
        assert!(EncoderOptions::default().validate().is_ok());
        let bad = EncoderOptions {
            delimiter: '"',
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = EncoderOptions {
            delimiter: 'é',
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
