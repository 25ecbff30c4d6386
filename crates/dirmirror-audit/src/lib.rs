//! dirmirror Audit - timestamped action log
//!
//! Provides:
//! - `AuditLogger`: implements [`IActionLog`](dirmirror_core::ports::IActionLog),
//!   writing `<timestamp> : <message>` to the console and a log file
//! - `ConsoleSink` / `FileSink`: the two line sinks, behind the `ILogSink` trait
//! - `LogSinkError`: sink write failures, which are reported but never escalated

pub mod logger;
pub mod sink;

pub use logger::AuditLogger;
pub use sink::{ConsoleSink, FileSink, ILogSink, LogSinkError};
