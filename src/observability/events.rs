//! Observable lifecycle events
//!
//! Events are explicit and typed; the string form is what lands in the
//! `event` field of a log line.

use std::fmt;

/// Observable events in coursecsv
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Section store opened
    StoreOpened,
    /// HTTP server listening
    Serving,

    // Exports
    /// Export request accepted
    ExportRequested,
    /// Export request rejected before streaming
    ExportRejected,
    /// Response body aborted after streaming began
    StreamAborted,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::Serving => "COURSECSV_SERVING",
            Event::ExportRequested => "EXPORT_REQUESTED",
            Event::ExportRejected => "EXPORT_REJECTED",
            Event::StreamAborted => "STREAM_ABORTED",
        }
    }

    /// Events logged at WARN or above
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::ExportRejected | Event::StreamAborted)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
