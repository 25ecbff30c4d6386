//! Sync action events
//!
//! Every replica mutation the reconciler performs, and every cycle outcome,
//! is described by a [`SyncAction`]. The action log renders each one as a
//! single human-readable line through its [`Display`](std::fmt::Display)
//! implementation.

use std::path::PathBuf;

/// An event reported to the action log
///
/// Mutating variants are reported immediately after the replica was changed;
/// they are never batched or rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// The mirroring service started
    SyncStarted,
    /// A replica directory (and any missing parents) was created
    CreateDirectory {
        /// Replica directory that was created
        path: PathBuf,
    },
    /// A source file was copied over its replica counterpart
    CopyOrUpdateFile {
        /// Source file that was read
        source: PathBuf,
        /// Replica file that was written
        replica: PathBuf,
    },
    /// A replica file with no source counterpart was removed
    DeleteFile {
        /// Replica file that was removed
        path: PathBuf,
    },
    /// A replica directory with no source counterpart was removed recursively
    DeleteDirectory {
        /// Root of the removed replica subtree
        path: PathBuf,
    },
    /// A cycle finished without error
    SyncCompleted,
    /// A cycle was aborted
    SyncFailed {
        /// Human-readable cause, including the offending path
        reason: String,
    },
    /// A scheduled trigger fired while the previous cycle was still running
    CycleSkipped,
}

impl SyncAction {
    /// Returns true for the four variants that change the replica tree
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            SyncAction::CreateDirectory { .. }
                | SyncAction::CopyOrUpdateFile { .. }
                | SyncAction::DeleteFile { .. }
                | SyncAction::DeleteDirectory { .. }
        )
    }

    /// Returns true if this action reports a failed cycle
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncAction::SyncFailed { .. })
    }

    /// Short machine-friendly name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            SyncAction::SyncStarted => "sync_started",
            SyncAction::CreateDirectory { .. } => "create_directory",
            SyncAction::CopyOrUpdateFile { .. } => "copy_or_update_file",
            SyncAction::DeleteFile { .. } => "delete_file",
            SyncAction::DeleteDirectory { .. } => "delete_directory",
            SyncAction::SyncCompleted => "sync_completed",
            SyncAction::SyncFailed { .. } => "sync_failed",
            SyncAction::CycleSkipped => "cycle_skipped",
        }
    }
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncAction::SyncStarted => write!(f, "Synchronization started."),
            SyncAction::CreateDirectory { path } => {
                write!(f, "Created directory: {}", path.display())
            }
            SyncAction::CopyOrUpdateFile { source, replica } => write!(
                f,
                "Copied/Updated file: {} to {}",
                source.display(),
                replica.display()
            ),
            SyncAction::DeleteFile { path } => write!(f, "Deleted file: {}", path.display()),
            SyncAction::DeleteDirectory { path } => {
                write!(f, "Deleted directory: {}", path.display())
            }
            SyncAction::SyncCompleted => write!(f, "Synchronization completed successfully."),
            SyncAction::SyncFailed { reason } => {
                write!(f, "An error occurred during synchronization: {reason}")
            }
            SyncAction::CycleSkipped => write!(
                f,
                "Skipped scheduled synchronization: previous cycle still running."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let created = SyncAction::CreateDirectory {
            path: PathBuf::from("/replica/sub"),
        };
        assert_eq!(created.to_string(), "Created directory: /replica/sub");

        let copied = SyncAction::CopyOrUpdateFile {
            source: PathBuf::from("/source/a.txt"),
            replica: PathBuf::from("/replica/a.txt"),
        };
        assert_eq!(
            copied.to_string(),
            "Copied/Updated file: /source/a.txt to /replica/a.txt"
        );

        let failed = SyncAction::SyncFailed {
            reason: "Source directory does not exist: /nope".into(),
        };
        assert_eq!(
            failed.to_string(),
            "An error occurred during synchronization: Source directory does not exist: /nope"
        );
        assert_eq!(
            SyncAction::SyncCompleted.to_string(),
            "Synchronization completed successfully."
        );
    }

    #[test]
    fn test_is_mutating() {
        let delete_file = SyncAction::DeleteFile {
            path: PathBuf::from("/r/x"),
        };
        let delete_dir = SyncAction::DeleteDirectory {
            path: PathBuf::from("/r/d"),
        };
        let failed = SyncAction::SyncFailed {
            reason: "x".into(),
        };

        assert!(delete_file.is_mutating());
        assert!(delete_dir.is_mutating());
        assert!(!SyncAction::SyncCompleted.is_mutating());
        assert!(!SyncAction::SyncStarted.is_mutating());
        assert!(!SyncAction::CycleSkipped.is_mutating());
        assert!(!failed.is_mutating());
    }

    #[test]
    fn test_is_failure() {
        let failed = SyncAction::SyncFailed {
            reason: "boom".into(),
        };
        assert!(failed.is_failure());
        assert!(!SyncAction::SyncCompleted.is_failure());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SyncAction::SyncCompleted.kind(), "sync_completed");
        let created = SyncAction::CreateDirectory {
            path: PathBuf::from("/r"),
        };
        assert_eq!(created.kind(), "create_directory");
    }
}
