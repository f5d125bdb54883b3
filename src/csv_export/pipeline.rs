//! # Export Pipeline
//!
//! Runs one export: fetch the sections of a quarter, project each one and
//! stream the rows through a `CsvEncoder`.
//!
//! ```text
//! Idle -> Fetching -> Encoding -> Done
//!            |           |
//!            +-----------+-----> Failed
//! ```
//!
//! Any failure ends the export. Bytes already handed to the sink stay
//! there; nothing is retried or resumed.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use tracing::{debug, error, info_span};
use uuid::Uuid;

use crate::observability::ObservationScope;
use crate::sections::SectionStore;

use super::encoder::{CsvEncoder, EncoderOptions};
use super::errors::{ExportError, ExportFailed};
use super::fault::FaultInjection;
use super::row;

/// Caller-supplied key selecting the sections to export
///
/// The key is opaque here; the store decides what a valid key looks like.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueryKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Where an export job is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Fetching,
    Encoding,
    Done,
    Failed,
}

impl ExportState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExportState::Done | ExportState::Failed)
    }
}

/// Outcome of a successful export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    /// Data rows written, header excluded
    pub rows: usize,
}

/// A single export of one quarter onto one sink
pub struct ExportJob {
    id: Uuid,
    store: Arc<dyn SectionStore>,
    key: QueryKey,
    options: EncoderOptions,
    fault: FaultInjection,
    state: ExportState,
}

impl ExportJob {
    pub fn new(store: Arc<dyn SectionStore>, key: QueryKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            store,
            key,
            options: EncoderOptions::default(),
            fault: FaultInjection::None,
            state: ExportState::Idle,
        }
    }

    pub fn with_options(mut self, options: EncoderOptions) -> Self {
        self.options = options;
        self
    }

    /// Testing seam: force an encoder failure. See `FaultInjection`.
    pub fn with_fault(mut self, fault: FaultInjection) -> Self {
        self.fault = fault;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    /// Run the export, writing CSV onto `sink`
    ///
    /// The sink is consumed; it is dropped on every exit path.
    pub fn run<W: Write>(&mut self, sink: W) -> Result<ExportSummary, ExportFailed> {
        let span = info_span!("export", id = %self.id, quarter = %self.key);
        let _entered = span.enter();

        // a finished job keeps its outcome
        if self.state != ExportState::Idle {
            let cause = ExportError::Internal(format!("export job already {:?}", self.state));
            return Err(ExportFailed::new(self.key.as_str(), cause));
        }

        let scope = ObservationScope::new("EXPORT");

        match self.execute(sink) {
            Ok(summary) => {
                self.transition(ExportState::Done);
                scope.complete(summary.rows);
                Ok(summary)
            }
            Err(cause) => {
                self.transition(ExportState::Failed);
                let failed = ExportFailed::new(self.key.as_str(), cause);
                error!(
                    kind = failed.kind().as_str(),
                    row = ?failed.row(),
                    "CSV export failed: {}", failed
                );
                scope.fail(&failed);
                Err(failed)
            }
        }
    }

    fn execute<W: Write>(&mut self, sink: W) -> Result<ExportSummary, ExportError> {
        self.transition(ExportState::Fetching);
        let sections = self.store.find_by_quarter(self.key.as_str())?;

        self.transition(ExportState::Encoding);
        let mut encoder = CsvEncoder::with_options(sink, row::schema(), &self.options);
        encoder.inject_fault(self.fault);
        encoder.write_header()?;

        for section in &sections {
            encoder.write_row(&row::project(section))?;
        }

        let rows = encoder.rows_written();
        encoder.close()?;
        Ok(ExportSummary { rows })
    }

    fn transition(&mut self, next: ExportState) {
        debug!(from = ?self.state, to = ?next, "export state");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_export::errors::FailureKind;
    use crate::sections::{
        ConvertedSection, CourseInfo, MemorySectionStore, Section, StoreError, StoreResult,
    };

    #[derive(Debug)]
    struct DownStore;

    impl SectionStore for DownStore {
        fn find_by_quarter(&self, _quarter: &str) -> StoreResult<Vec<ConvertedSection>> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    fn section(code: &str) -> ConvertedSection {
        ConvertedSection {
            course_info: CourseInfo {
                quarter: "20252".into(),
                course_id: "CMPSC 156".into(),
                title: "ADV APP PROGRAM".into(),
                ..Default::default()
            },
            section: Section {
                enroll_code: code.into(),
                section: "0100".into(),
                ..Default::default()
            },
        }
    }

    fn store(sections: Vec<ConvertedSection>) -> Arc<dyn SectionStore> {
        Arc::new(MemorySectionStore::from_sections(sections))
    }

    #[test]
    fn test_job_starts_idle() {
        let job = ExportJob::new(store(vec![]), "20252".into());
        assert_eq!(job.state(), ExportState::Idle);
        assert_eq!(job.key().as_str(), "20252");
    }

    #[test]
    fn test_run_reaches_done() {
        let mut job = ExportJob::new(store(vec![section("1"), section("2")]), "20252".into());
        let mut out = Vec::new();

        let summary = job.run(&mut out).unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(job.state(), ExportState::Done);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_store_failure_is_query_failure() {
        let mut job = ExportJob::new(Arc::new(DownStore), "20252".into());
        let mut out = Vec::new();

        let err = job.run(&mut out).unwrap_err();

        assert_eq!(err.kind(), FailureKind::Query);
        assert_eq!(job.state(), ExportState::Failed);
        assert!(out.is_empty());
    }

    #[test]
    fn test_fault_injection_fails_before_header() {
        let mut job = ExportJob::new(store(vec![section("1")]), "20252".into())
            .with_fault(FaultInjection::DataTypeMismatch);
        let mut out = Vec::new();

        let err = job.run(&mut out).unwrap_err();

        assert_eq!(err.kind(), FailureKind::RowEncoding);
        assert_eq!(err.row(), Some(0));
        assert_eq!(job.state(), ExportState::Failed);
        assert!(out.is_empty());
    }

    #[test]
    fn test_job_cannot_run_twice() {
        let mut job = ExportJob::new(store(vec![]), "20252".into());
        job.run(Vec::new()).unwrap();

        let err = job.run(Vec::new()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Internal);
        assert_eq!(job.state(), ExportState::Done);
        assert!(job.state().is_terminal());
    }

    #[test]
    fn test_failed_job_stays_failed() {
        let mut job = ExportJob::new(Arc::new(DownStore), "20252".into());
        assert_eq!(job.run(Vec::new()).unwrap_err().kind(), FailureKind::Query);

        let mut out = Vec::new();
        let err = job.run(&mut out).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Internal);
        assert_eq!(job.state(), ExportState::Failed);
        assert!(out.is_empty());
    }

    #[test]
    fn test_malformed_record_stops_export() {
        let mut bad = section("");
        bad.course_info.course_id = "CMPSC 8".into();
        let mut job = ExportJob::new(
            store(vec![section("1"), bad, section("3")]),
            "20252".into(),
        );
        let mut out = Vec::new();

        let err = job.run(&mut out).unwrap_err();

        assert_eq!(err.kind(), FailureKind::RowEncoding);
        assert_eq!(err.row(), Some(1));
        // header and the first row were already emitted
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(!text.contains("CMPSC 8"));
    }
}
