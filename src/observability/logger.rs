//! Structured JSON logger for specbind
//!
//! - One log line = one event
//! - Deterministic key ordering
//! - Explicit severity levels
//! - Synchronous, no buffering
//!
//! Logs go to stderr; stdout carries command output only. The minimum
//! severity is read once from `SPECBIND_LOG` (`trace`, `info`, `warn`,
//! `error`), defaulting to `info`.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-definition detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }

    /// Parse a level name, case-insensitively
    pub fn parse(level: &str) -> Option<Self> {
        match level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Severity::Trace),
            "info" => Some(Severity::Info),
            "warn" | "warning" => Some(Severity::Warn),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Cache the threshold to avoid repeated env var lookups
static MIN_SEVERITY: OnceLock<Severity> = OnceLock::new();

fn min_severity() -> Severity {
    *MIN_SEVERITY.get_or_init(|| {
        std::env::var("SPECBIND_LOG")
            .ok()
            .and_then(|level| Severity::parse(&level))
            .unwrap_or(Severity::Info)
    })
}

/// Checks if a severity passes the configured threshold
pub fn enabled(severity: Severity) -> bool {
    severity >= min_severity()
}

/// A structured logger that outputs JSON lines
pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields.
    ///
    /// Fields are output in deterministic order (alphabetical by key).
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if !enabled(severity) {
            return;
        }
        Self::log_to_writer(severity, event, fields, &mut io::stderr());
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        // BTreeMap keeps keys sorted; event and severity cannot be shadowed
        let mut line: BTreeMap<&str, &str> = fields.iter().copied().collect();
        line.insert("event", event);
        line.insert("severity", severity.as_str());

        let mut output = match serde_json::to_vec(&line) {
            Ok(bytes) => bytes,
            Err(_) => return,
        };
        output.push(b'\n');

        // one write per line
        let _ = writer.write_all(&output);
        let _ = writer.flush();
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}

/// Capture logs to a buffer for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}
