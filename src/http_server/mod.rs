//! # HTTP Server Module
//!
//! Axum server exposing the course CSV export.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/courses/csv/quarter?yyyyq=<quarter>` - CSV download of a quarter

pub mod attachment;
pub mod body;
pub mod config;
pub mod csv_routes;
pub mod observability_routes;
pub mod server;

pub use attachment::{attachment_filename, CsvAttachment, CSV_CONTENT_TYPE};
pub use body::{stream_body, BodyWriter};
pub use config::{ExportConfig, HttpServerConfig};
pub use csv_routes::{csv_routes, CsvExportState, ExportRequestError};
pub use server::HttpServer;
