//! Observability for coursecsv
//!
//! Structured logging through `tracing`, lifecycle events, and scopes
//! that bracket a unit of work with BEGIN / COMPLETE / FAILED events.
//!
//! # Usage
//!
//! ```ignore
//! use coursecsv::observability::{init_logging, log_event, Event};
//!
//! init_logging("info")?;
//! log_event(Event::Serving, "listening on 0.0.0.0:8080");
//! ```

mod events;
mod scope;

pub use events::Event;
pub use scope::{ObservationScope, Timer};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// Logs go to stderr so that `export` can write CSV to stdout. `RUST_LOG`
/// takes precedence over `default_level`. Installing twice is an error.
pub fn init_logging(default_level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| format!("invalid log level '{}': {}", default_level, e))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| e.to_string())
}

/// Log a lifecycle event
pub fn log_event(event: Event, message: &str) {
    if event.is_failure() {
        warn!(event = event.as_str(), "{}", message);
    } else {
        info!(event = event.as_str(), "{}", message);
    }
}
