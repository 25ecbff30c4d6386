//! Action log port (driven/secondary port)
//!
//! The reconciler and scheduler report every [`SyncAction`] through this
//! trait. Implementations must never fail to the caller: a broken log sink
//! may not abort or delay a sync cycle.

use crate::domain::SyncAction;

/// Sink for timestamped action-log lines
///
/// ## Threading
///
/// Cycles run on a blocking worker thread while the scheduler reports
/// skipped triggers from the async runtime, so implementations must be
/// `Send + Sync` and serialize their own writes.
pub trait IActionLog: Send + Sync {
    /// Writes one free-form message
    fn log(&self, message: &str);

    /// Writes the line describing `action`
    fn record(&self, action: &SyncAction) {
        self.log(&action.to_string());
    }
}
