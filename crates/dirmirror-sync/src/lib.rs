//! dirmirror Sync - one-way tree reconciliation engine
//!
//! Provides:
//! - Content comparison by SHA-256 digest
//! - Recursive reconciliation of a replica tree against its source
//! - A periodic scheduler that never runs two cycles at once
//!
//! ## Modules
//!
//! - [`comparator`] - [`ContentComparator`](comparator::ContentComparator), digest-based equality
//! - [`filesystem`] - Local filesystem adapter (listing, atomic copies, removal)
//! - [`reconciler`] - [`TreeReconciler`](reconciler::TreeReconciler), the per-cycle algorithm
//! - [`scheduler`] - [`SyncScheduler`](scheduler::SyncScheduler), immediate + periodic triggers

pub mod comparator;
pub mod filesystem;
pub mod reconciler;
pub mod scheduler;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a synchronization cycle
#[derive(Debug, Error)]
pub enum SyncError {
    /// The source directory of a pair does not exist
    #[error("Source directory does not exist or could not be found: {}", .0.display())]
    SourceMissing(PathBuf),

    /// A filesystem operation failed on `path`
    #[error("Failed to {op} {}: {source}", path.display())]
    Io {
        /// Short description of the failed operation, e.g. `"copy file to"`
        op: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// The scheduler was given a zero period
    #[error("Sync interval must be greater than zero")]
    InvalidPeriod,

    /// A domain-level error propagated from dirmirror-core
    #[error("Domain error: {0}")]
    DomainError(#[from] dirmirror_core::domain::DomainError),
}

impl SyncError {
    /// Builds an [`SyncError::Io`] for `path`
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// Returns true for the `SourceMissing` class of failures
    pub fn is_source_missing(&self) -> bool {
        matches!(self, SyncError::SourceMissing(_))
    }
}
