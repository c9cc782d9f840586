//! Observability for persistent records
//!
//! - Structured one-line JSON logs with deterministic key order
//! - Typed events for record operations
//! - Block I/O counters
//!
//! Observability is read-only: nothing here changes what a record
//! operation does or returns. Records stay silent unless tracing is
//! switched on for them.

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{render, Logger, Severity};
pub use metrics::{IoMetrics, IoMetricsSnapshot};

/// Logs `event` at its own severity.
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
