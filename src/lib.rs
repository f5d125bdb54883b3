//! coursecsv - Streaming CSV export of course sections
//!
//! Given a quarter, the sections of that quarter are fetched from a
//! section store, projected onto a fixed set of columns and streamed as
//! CSV onto an HTTP response (or a file) without buffering the whole
//! export in memory.

pub mod cli;
pub mod csv_export;
pub mod http_server;
pub mod observability;
pub mod sections;
