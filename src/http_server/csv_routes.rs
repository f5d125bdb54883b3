//! Course CSV HTTP Routes
//!
//! `GET /api/courses/csv/quarter?yyyyq=20252` streams every section of the
//! quarter as a CSV attachment.
//!
//! Request problems are reported as JSON errors before streaming starts.
//! Once the body has started, an export failure can only abort the
//! response, leaving the client with a truncated file.

use std::io;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::csv_export::{ExportJob, FaultInjection, QueryKey, UnknownFault};
use crate::observability::{log_event, Event};
use crate::sections::SectionStore;

use super::attachment::{attachment_filename, CsvAttachment};
use super::body::stream_body;
use super::config::ExportConfig;

// ==================
// Shared State
// ==================

/// State shared by the CSV handlers
pub struct CsvExportState {
    pub store: Arc<dyn SectionStore>,
    pub config: ExportConfig,
}

impl CsvExportState {
    pub fn new(store: Arc<dyn SectionStore>, config: ExportConfig) -> Self {
        Self { store, config }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct QuarterCsvQuery {
    /// Quarter in yyyyq format, e.g. 20252
    #[serde(rename = "yyyyq")]
    pub quarter: String,

    /// Testing only: force an encoder failure
    #[serde(rename = "testException", default)]
    pub test_exception: String,
}

/// Errors reported before the CSV body starts streaming
#[derive(Debug, Clone, Error)]
pub enum ExportRequestError {
    #[error("Missing required parameter: {0}")]
    MissingParam(&'static str),

    #[error("{0}")]
    UnknownFault(#[from] UnknownFault),

    #[error("Fault injection is disabled")]
    FaultInjectionDisabled,
}

impl ExportRequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExportRequestError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ExportRequestError::UnknownFault(_) => StatusCode::BAD_REQUEST,
            ExportRequestError::FaultInjectionDisabled => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for ExportRequestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        log_event(Event::ExportRejected, &self.to_string());
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });
        (status, body).into_response()
    }
}

// ==================
// CSV Routes
// ==================

/// Create course CSV routes
pub fn csv_routes(state: Arc<CsvExportState>) -> Router {
    Router::new()
        .route("/quarter", get(quarter_csv_handler))
        .with_state(state)
}

async fn quarter_csv_handler(
    State(state): State<Arc<CsvExportState>>,
    Query(query): Query<QuarterCsvQuery>,
) -> Result<CsvAttachment, ExportRequestError> {
    if query.quarter.trim().is_empty() {
        return Err(ExportRequestError::MissingParam("yyyyq"));
    }

    let fault: FaultInjection = query.test_exception.parse()?;
    if !fault.is_none() && !state.config.allow_fault_injection {
        return Err(ExportRequestError::FaultInjectionDisabled);
    }

    let key = QueryKey::new(query.quarter);
    let filename = attachment_filename(&state.config.filename_prefix, &key);
    let mut job = ExportJob::new(state.store.clone(), key)
        .with_options(state.config.encoder.clone())
        .with_fault(fault);

    info!(
        event = Event::ExportRequested.as_str(),
        export_id = %job.id(),
        quarter = %job.key(),
        %fault,
        "streaming {}", filename
    );

    let body = stream_body(state.config.channel_capacity, move |writer| {
        job.run(writer).map(|_| ()).map_err(io::Error::from)
    });

    Ok(CsvAttachment::new(filename, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ExportRequestError::MissingParam("yyyyq").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ExportRequestError::FaultInjectionDisabled.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_query_defaults() {
        let query: QuarterCsvQuery = serde_json::from_str(r#"{"yyyyq": "20252"}"#).unwrap();
        assert_eq!(query.quarter, "20252");
        assert!(query.test_exception.is_empty());
    }
}
