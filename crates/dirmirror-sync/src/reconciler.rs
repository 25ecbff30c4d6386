//! Tree reconciler - makes a replica tree identical to its source
//!
//! The [`TreeReconciler`] walks one [`DirectoryPair`] per recursion level and
//! applies, in order:
//!
//! 1. create the replica directory if it is missing
//! 2. copy every source file that is absent from the replica or differs in content
//! 3. delete replica files whose name is not a source file
//! 4. recurse into every source subdirectory
//! 5. delete replica subdirectories whose name is not a source subdirectory
//!
//! Additions and updates happen before deletions at each level. This is a
//! best-effort ordering, not a transaction: a failure part-way leaves every
//! mutation performed so far in place.
//!
//! Every mutation is reported to the [`IActionLog`] right after it happens.
//! [`TreeReconciler::run_cycle`] is the cycle boundary: it converts any error
//! into a single `SyncFailed` entry and emits `SyncCompleted` on success.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dirmirror_core::{
    config::SyncConfig,
    domain::{DirectoryPair, SyncAction},
    ports::IActionLog,
};
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::{
    comparator::ContentComparator,
    filesystem::{EntryKind, LocalFileSystemAdapter},
    SyncError,
};

// ============================================================================
// CycleReport
// ============================================================================

/// Counters describing what one cycle did to the replica
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub directories_created: u32,
    pub files_copied: u32,
    pub files_unchanged: u32,
    pub files_deleted: u32,
    pub directories_deleted: u32,
    pub duration_ms: u64,
    /// Failure reason; `None` when the cycle completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CycleReport {
    /// Number of replica mutations performed
    pub fn mutations(&self) -> u32 {
        self.directories_created + self.files_copied + self.files_deleted + self.directories_deleted
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

// ============================================================================
// TreeReconciler
// ============================================================================

/// One-way reconciler from a source tree into a replica tree
pub struct TreeReconciler {
    root: DirectoryPair,
    fs: LocalFileSystemAdapter,
    comparator: ContentComparator,
    log: Arc<dyn IActionLog>,
}

impl TreeReconciler {
    /// Creates a reconciler for the configured source/replica roots.
    pub fn new(config: &SyncConfig, log: Arc<dyn IActionLog>) -> Self {
        Self {
            root: DirectoryPair::new(&config.source, &config.replica),
            fs: LocalFileSystemAdapter::new(),
            comparator: ContentComparator::new(),
            log,
        }
    }

    /// The root pair this reconciler mirrors
    pub fn root(&self) -> &DirectoryPair {
        &self.root
    }

    /// Runs one full cycle on the root pair.
    ///
    /// Never fails: errors are logged as `SyncFailed` and returned in the
    /// report, and the next cycle starts from scratch.
    pub fn run_cycle(&self) -> CycleReport {
        let started = Instant::now();
        let mut report = CycleReport::default();

        info!(
            source = %self.root.source().display(),
            replica = %self.root.replica().display(),
            "Starting sync cycle"
        );

        let result = self.reconcile(&self.root, &mut report);
        report.duration_ms = duration_ms(started.elapsed());

        match result {
            Ok(()) => {
                self.emit(SyncAction::SyncCompleted);
                info!(
                    created = report.directories_created,
                    copied = report.files_copied,
                    unchanged = report.files_unchanged,
                    deleted_files = report.files_deleted,
                    deleted_dirs = report.directories_deleted,
                    duration_ms = report.duration_ms,
                    "Sync cycle completed"
                );
            }
            Err(e) => {
                let reason = e.to_string();
                error!(error = %reason, "Sync cycle failed");
                self.emit(SyncAction::SyncFailed {
                    reason: reason.clone(),
                });
                report.error = Some(reason);
            }
        }

        report
    }

    /// Reconciles `pair.replica()` against `pair.source()`, recursively.
    ///
    /// Fails with [`SyncError::SourceMissing`] before touching the replica
    /// if the source directory does not exist. The source of `pair` may be a
    /// symlink to a directory; entries below it are never followed.
    #[instrument(skip(self, report), fields(source = %pair.source().display()))]
    pub fn reconcile(&self, pair: &DirectoryPair, report: &mut CycleReport) -> Result<(), SyncError> {
        if !self.fs.resolves_to_directory(pair.source())? {
            return Err(SyncError::SourceMissing(pair.source().to_path_buf()));
        }

        // 1. Replica directory
        if self.fs.entry_kind(pair.replica())?.is_none() {
            self.fs.create_directory(pair.replica())?;
            report.directories_created += 1;
            self.emit(SyncAction::CreateDirectory {
                path: pair.replica().to_path_buf(),
            });
        }

        let source = self.fs.list_directory(pair.source())?;
        for name in &source.other {
            debug!(name = ?name, "skipping source entry that is neither file nor directory");
        }

        // 2. Copy new and changed files
        for name in &source.files {
            let child = pair.child(name)?;

            match self.fs.entry_kind(child.replica())? {
                Some(EntryKind::Directory) => {
                    // replica holds a directory where the source holds a file
                    self.fs.remove_directory(child.replica())?;
                    report.directories_deleted += 1;
                    self.emit(SyncAction::DeleteDirectory {
                        path: child.replica().to_path_buf(),
                    });
                }
                Some(EntryKind::File) => {
                    if self.comparator.are_equal(child.source(), child.replica())? {
                        report.files_unchanged += 1;
                        continue;
                    }
                }
                Some(EntryKind::Other) | None => {}
            }

            self.fs.copy_file(child.source(), child.replica())?;
            report.files_copied += 1;
            self.emit(SyncAction::CopyOrUpdateFile {
                source: child.source().to_path_buf(),
                replica: child.replica().to_path_buf(),
            });
        }

        let replica = self.fs.list_directory(pair.replica())?;

        // 3. Delete replica files unknown to the source
        for name in replica.non_directories() {
            if source.files.contains(name) {
                continue;
            }
            let path = pair.replica().join(name);
            self.fs.remove_file(&path)?;
            report.files_deleted += 1;
            self.emit(SyncAction::DeleteFile { path });
        }

        // 4. Recurse into source subdirectories
        for name in &source.directories {
            self.reconcile(&pair.child(name)?, report)?;
        }

        // 5. Delete replica subdirectories unknown to the source
        for name in &replica.directories {
            if source.directories.contains(name) {
                continue;
            }
            let path = pair.replica().join(name);
            self.fs.remove_directory(&path)?;
            report.directories_deleted += 1;
            self.emit(SyncAction::DeleteDirectory { path });
        }

        Ok(())
    }

    fn emit(&self, action: SyncAction) {
        debug!(action = action.kind(), "{action}");
        self.log.record(&action);
    }
}

fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// Unit tests
// ============================================================================
