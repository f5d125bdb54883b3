//! CSV attachment responses
//!
//! Wraps a streaming body with the headers that make browsers save it as a
//! file, and lets cross-origin callers read the suggested filename.

use axum::body::Body;
use axum::http::header::{ACCESS_CONTROL_EXPOSE_HEADERS, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::csv_export::QueryKey;

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=UTF-8";

/// Suggested filename for an export of `key`
///
/// Characters outside `[A-Za-z0-9._-]` are replaced with `_` so the
/// name is always a valid header token.
pub fn attachment_filename(prefix: &str, key: &QueryKey) -> String {
    let key: String = key
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}.csv", prefix, key)
}

/// A streamed CSV file download
pub struct CsvAttachment {
    filename: String,
    body: Body,
}

impl CsvAttachment {
    pub fn new(filename: impl Into<String>, body: Body) -> Self {
        Self {
            filename: filename.into(),
            body,
        }
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CSV_CONTENT_TYPE));
        let disposition = HeaderValue::from_str(&self.content_disposition())
            .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
        headers.insert(CONTENT_DISPOSITION, disposition);
        headers.insert(
            ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static("Content-Disposition"),
        );
        headers
    }
}

impl IntoResponse for CsvAttachment {
    fn into_response(self) -> Response {
        let headers = self.headers();
        (StatusCode::OK, headers, self.body).into_response()
    }
}
