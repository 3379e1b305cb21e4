//! Structured JSON logger.
//!
//! One line per event, fields in deterministic (alphabetical) order, written
//! synchronously. INFO goes to stdout, WARN and ERROR to stderr.

use std::fmt;
use std::io::{self, Write};

/// Log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations.
    Info,
    /// Recoverable issues.
    Warn,
    /// Operation failures.
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Synchronous structured logger.
pub struct Logger;

impl Logger {
    /// Log at INFO level.
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        let line = format_line(Severity::Info, event, fields);
        let _ = io::stdout().write_all(line.as_bytes());
    }

    /// Log at WARN level.
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        let line = format_line(Severity::Warn, event, fields);
        let _ = io::stderr().write_all(line.as_bytes());
    }

    /// Log at ERROR level.
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        let line = format_line(Severity::Error, event, fields);
        let _ = io::stderr().write_all(line.as_bytes());
    }
}

/// Render one event as a single JSON line. `event` and `severity` come
/// first; remaining fields are sorted by key so output is deterministic.
fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(128);
    out.push_str("{\"event\":\"");
    escape_into(&mut out, event);
    out.push_str("\",\"severity\":\"");
    out.push_str(severity.as_str());
    out.push('"');

    let mut sorted: Vec<_> = fields.to_vec();
    sorted.sort_by_key(|(k, _)| *k);
    for (key, value) in sorted {
        out.push_str(",\"");
        escape_into(&mut out, key);
        out.push_str("\":\"");
        escape_into(&mut out, value);
        out.push('"');
    }

    out.push_str("}\n");
    out
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
}
