//! Observable record events

use std::fmt;

use super::logger::Severity;

/// Events emitted by a traced record and by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded and applied
    ConfigLoaded,
    /// Image file created and initialized
    ImageInitialized,
    /// Data bytes fetched
    Fetch,
    /// Data bytes and checksum stored
    Store,
    /// Stored checksum matched the data region
    Validate,
    /// A block transfer came back short
    IoFailure,
    /// Offset/length window rejected before any I/O
    RangeRejected,
    /// Stored checksum did not match the data region
    Corruption,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ImageInitialized => "IMAGE_INITIALIZED",
            Event::Fetch => "RECORD_FETCH",
            Event::Store => "RECORD_STORE",
            Event::Validate => "RECORD_VALIDATE",
            Event::IoFailure => "RECORD_IO_FAILURE",
            Event::RangeRejected => "RECORD_RANGE_REJECTED",
            Event::Corruption => "RECORD_CORRUPTION",
        }
    }

    /// Severity the event is logged at.
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::ImageInitialized => Severity::Info,
            Event::Fetch | Event::Store | Event::Validate => Severity::Trace,
            Event::IoFailure | Event::RangeRejected => Severity::Error,
            Event::Corruption => Severity::Fatal,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
