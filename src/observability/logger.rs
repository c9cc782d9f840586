//! Structured JSON logger
//!
//! One log line is one event: `event` first, then `severity`, then the
//! caller's fields sorted by key. Writes are synchronous and unbuffered.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Per-operation detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Data can no longer be trusted
    Fatal = 4,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Errors and worse go to stderr.
    fn uses_stderr(&self) -> bool {
        *self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize)]
struct LogLine<'a> {
    event: &'a str,
    severity: Severity,
    #[serde(flatten)]
    fields: BTreeMap<&'a str, &'a str>,
}

/// Renders one log line, including the trailing newline.
pub fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let line = LogLine {
        event,
        severity,
        fields: fields.iter().copied().collect(),
    };
    // Serializing string maps cannot fail.
    let mut out = serde_json::to_string(&line).unwrap_or_default();
    out.push('\n');
    out
}

/// Stateless structured logger writing to stdout/stderr.
pub struct Logger;

impl Logger {
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity.uses_stderr() {
            Self::log_to(&mut io::stderr(), severity, event, fields);
        } else {
            Self::log_to(&mut io::stdout(), severity, event, fields);
        }
    }

    /// Writes one line to `writer`. Logging failures are ignored.
    pub fn log_to<W: Write>(writer: &mut W, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = render(severity, event, fields);
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}
