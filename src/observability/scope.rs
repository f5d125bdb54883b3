//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` or `{name}_FAILED` when closed explicitly
//! - Logs `{name}_INCOMPLETE` if dropped without either

use std::fmt::Display;
use std::time::Instant;

use tracing::{error, info, warn};

/// A scope that logs the start and end of a unit of work
///
/// Log lines are emitted inside whatever span is current, so fields such
/// as an export id carried by the span appear on every event.
///
/// ```ignore
/// let scope = ObservationScope::new("EXPORT");
/// // ... do work ...
/// scope.complete(rows); // logs EXPORT_COMPLETE
/// ```
pub struct ObservationScope {
    name: &'static str,
    completed: bool,
    timer: Timer,
}

impl ObservationScope {
    pub fn new(name: &'static str) -> Self {
        info!(event = %format!("{}_BEGIN", name));
        Self {
            name,
            completed: false,
            timer: Timer::new(),
        }
    }

    /// Logs `{name}_COMPLETE` with the number of items processed
    pub fn complete(mut self, items: usize) {
        self.completed = true;
        info!(
            event = %format!("{}_COMPLETE", self.name),
            items,
            elapsed_ms = self.timer.elapsed_ms()
        );
    }

    /// Logs `{name}_FAILED` at ERROR level
    pub fn fail(mut self, reason: &dyn Display) {
        self.completed = true;
        error!(
            event = %format!("{}_FAILED", self.name),
            reason = %reason,
            elapsed_ms = self.timer.elapsed_ms()
        );
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.completed {
            warn!(
                event = %format!("{}_INCOMPLETE", self.name),
                reason = "scope dropped without completion"
            );
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
