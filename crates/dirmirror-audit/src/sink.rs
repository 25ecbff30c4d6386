//! Line sinks for the action log
//!
//! A sink receives fully formatted lines. The console sink echoes to stdout;
//! the file sink opens its file in append mode for each write and closes it
//! again, so the file can be rotated or removed between writes.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;

/// Errors raised by a sink write
#[derive(Debug, Error)]
pub enum LogSinkError {
    /// The log file could not be opened or appended to
    #[error("Failed to write to log file {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Standard output could not be written
    #[error("Failed to write to console: {0}")]
    Console(#[source] std::io::Error),
}

/// Destination for formatted action-log lines
pub trait ILogSink: Send + Sync {
    /// Writes `line` followed by a newline.
    fn write_line(&self, line: &str) -> Result<(), LogSinkError>;
}

// ============================================================================
// ConsoleSink
// ============================================================================

/// Echoes lines to standard output
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl ILogSink for ConsoleSink {
    fn write_line(&self, line: &str) -> Result<(), LogSinkError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{line}").map_err(LogSinkError::Console)?;
        out.flush().map_err(LogSinkError::Console)
    }
}

// ============================================================================
// FileSink
// ============================================================================

/// Appends lines to a file, one open/close per write
///
/// Writes are serialized by an internal lock so concurrent writers never
/// interleave partial lines.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ILogSink for FileSink {
    fn write_line(&self, line: &str) -> Result<(), LogSinkError> {
        // a poisoned lock only means another writer panicked mid-line
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let to_err = |source| LogSinkError::File {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_err)?;
        writeln!(file, "{line}").map_err(to_err)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_file_sink_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sync.log");
        std::fs::write(&path, "existing\n").unwrap();
        let sink = FileSink::new(&path);

        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "existing\nfirst\nsecond\n");
    }

    #[test]
    fn test_file_sink_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new.log");
        let sink = FileSink::new(&path);

        sink.write_line("hello").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_file_sink_error_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/sync.log");
        let sink = FileSink::new(&path);

        let err = sink.write_line("lost").unwrap_err();

        assert!(matches!(err, LogSinkError::File { .. }));
        assert!(err.to_string().contains("sync.log"));
    }

    #[test]
    fn test_file_sink_concurrent_writers_do_not_interleave() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shared.log");
        let sink = Arc::new(FileSink::new(&path));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..50 {
                        sink.write_line(&format!("writer-{t} line-{i} {}", "x".repeat(200)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 400);
        assert!(lines
            .iter()
            .all(|l| l.starts_with("writer-") && l.ends_with(&"x".repeat(200))));
    }
}
