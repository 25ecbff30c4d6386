//! Integration test: TreeReconciler → AuditLogger → log file
//!
//! Runs real cycles over temporary trees with an `AuditLogger` as the action
//! log and reads the resulting log file back.

use std::sync::Arc;

use dirmirror_audit::AuditLogger;
use dirmirror_core::{config::SyncConfig, domain::SyncAction, ports::IActionLog};
use dirmirror_sync::reconciler::TreeReconciler;
use tempfile::TempDir;

/// Splits `<timestamp> : <message>` and checks the timestamp shape.
fn message_of(line: &str) -> &str {
    let (ts, message) = line.split_once(" : ").expect("line has separator");
    assert_eq!(ts.len(), "2024-01-01 00:00:00".len(), "timestamp: {ts}");
    assert!(chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").is_ok());
    message
}

#[test]
fn test_cycle_actions_are_appended_to_log_file() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source");
    let replica = dir.path().join("replica");
    let log_file = dir.path().join("sync.log");
    std::fs::create_dir_all(source.join("sub")).unwrap();
    std::fs::write(source.join("sub/b.txt"), "x").unwrap();
    std::fs::create_dir_all(&replica).unwrap();
    std::fs::write(replica.join("c.txt"), "old").unwrap();

    let logger = Arc::new(AuditLogger::new(&log_file));
    logger.record(&SyncAction::SyncStarted);

    let config = SyncConfig {
        source: source.clone(),
        replica: replica.clone(),
        interval_minutes: 1,
    };
    let reconciler = TreeReconciler::new(&config, logger.clone());
    assert!(reconciler.run_cycle().is_success());

    let content = std::fs::read_to_string(&log_file).unwrap();
    let messages: Vec<_> = content.lines().map(message_of).collect();

    assert_eq!(messages.first(), Some(&"Synchronization started."));
    assert!(messages.contains(&format!("Deleted file: {}", replica.join("c.txt").display()).as_str()));
    assert!(messages.contains(&format!("Created directory: {}", replica.join("sub").display()).as_str()));
    assert!(messages.contains(
        &format!(
            "Copied/Updated file: {} to {}",
            source.join("sub/b.txt").display(),
            replica.join("sub/b.txt").display()
        )
        .as_str()
    ));
    assert_eq!(messages.last(), Some(&"Synchronization completed successfully."));
}

#[test]
fn test_consecutive_cycles_append() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source");
    let log_file = dir.path().join("sync.log");
    std::fs::create_dir_all(&source).unwrap();
    std::fs::write(&log_file, "2024-01-01 00:00:00 : earlier run\n").unwrap();

    let logger = Arc::new(AuditLogger::new(&log_file));
    let config = SyncConfig {
        source,
        replica: dir.path().join("replica"),
        interval_minutes: 1,
    };
    let reconciler = TreeReconciler::new(&config, logger);
    reconciler.run_cycle();
    reconciler.run_cycle();

    let content = std::fs::read_to_string(&log_file).unwrap();
    let messages: Vec<_> = content.lines().map(message_of).collect();
    assert_eq!(messages[0], "earlier run");
    assert_eq!(
        messages
            .iter()
            .filter(|m| **m == "Synchronization completed successfully.")
            .count(),
        2
    );
}

#[test]
fn test_failed_cycle_is_logged() {
    let dir = TempDir::new().unwrap();
    let log_file = dir.path().join("sync.log");
    let logger = Arc::new(AuditLogger::new(&log_file));
    let config = SyncConfig {
        source: dir.path().join("missing"),
        replica: dir.path().join("replica"),
        interval_minutes: 1,
    };

    let report = TreeReconciler::new(&config, logger).run_cycle();

    assert!(!report.is_success());
    let content = std::fs::read_to_string(&log_file).unwrap();
    let messages: Vec<_> = content.lines().map(message_of).collect();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("An error occurred during synchronization:"));
    assert!(messages[0].contains("missing"));
}

#[test]
fn test_unwritable_log_file_does_not_fail_cycle() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("source");
    std::fs::create_dir_all(&source).unwrap();
    std::fs::write(source.join("a.txt"), "a").unwrap();
    let logger = Arc::new(AuditLogger::new(dir.path().join("no/such/dir/sync.log")));
    let config = SyncConfig {
        source,
        replica: dir.path().join("replica"),
        interval_minutes: 1,
    };

    let report = TreeReconciler::new(&config, logger).run_cycle();

    assert!(report.is_success());
    assert!(dir.path().join("replica/a.txt").is_file());
}
