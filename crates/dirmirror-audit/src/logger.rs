//! AuditLogger - timestamped action log
//!
//! Every message becomes one line, `<timestamp> : <message>`, with the
//! timestamp in local time as `YYYY-MM-DD HH:MM:SS`. The line is echoed to
//! the console and appended to the persistent log file.
//!
//! Logging never fails the caller: a file write failure is reported on the
//! console (and via `tracing::warn!`) and the message is not retried.

use std::path::PathBuf;

use chrono::{DateTime, Local, TimeZone};
use dirmirror_core::ports::IActionLog;

use crate::sink::{ConsoleSink, FileSink, ILogSink};

/// Timestamp format of every log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a log line for `message` at time `at`.
pub fn format_line<Tz>(at: &DateTime<Tz>, message: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{} : {message}", at.format(TIMESTAMP_FORMAT))
}

/// Action log writing to a console sink and a persistent sink
pub struct AuditLogger {
    console: Box<dyn ILogSink>,
    persistent: Box<dyn ILogSink>,
}

impl AuditLogger {
    /// Creates a logger echoing to stdout and appending to `log_file`.
    ///
    /// The file is not touched until the first message is logged.
    pub fn new(log_file: impl Into<PathBuf>) -> Self {
        Self::with_sinks(ConsoleSink::new(), FileSink::new(log_file))
    }

    /// Creates a logger over arbitrary sinks.
    pub fn with_sinks(
        console: impl ILogSink + 'static,
        persistent: impl ILogSink + 'static,
    ) -> Self {
        Self {
            console: Box::new(console),
            persistent: Box::new(persistent),
        }
    }

    fn write_at(&self, at: &DateTime<Local>, message: &str) {
        let line = format_line(at, message);

        if let Err(e) = self.console.write_line(&line) {
            tracing::warn!(error = %e, "Failed to echo log line to console");
        }

        if let Err(e) = self.persistent.write_line(&line) {
            tracing::warn!(error = %e, "Failed to persist log line");
            let notice = format_line(at, &format!("Failed to write to log file: {e}"));
            if let Err(e) = self.console.write_line(&notice) {
                tracing::warn!(error = %e, "Failed to report log file failure to console");
            }
        }
    }
}

impl IActionLog for AuditLogger {
    fn log(&self, message: &str) {
        self.write_at(&Local::now(), message);
    }
}
