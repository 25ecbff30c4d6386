//! Sync scheduler - runs a cycle immediately and then on a fixed period
//!
//! ## Overlap policy
//!
//! Cycles are serialized. Each cycle runs on tokio's blocking thread pool;
//! a tick that fires while the previous cycle is still running is skipped
//! and reported to the action log as
//! [`SyncAction::CycleSkipped`](dirmirror_core::domain::SyncAction::CycleSkipped).
//! Missed ticks are not replayed in a burst afterwards.
//!
//! ## Flow
//!
//! ```text
//! interval tick ──→ previous cycle finished? ──yes──→ spawn_blocking(cycle)
//!                              │
//!                              no ──→ log CycleSkipped
//! ```
//!
//! On cancellation the scheduler stops triggering and waits for an
//! in-flight cycle to finish; cycles are not interruptible.

use std::{sync::Arc, time::Duration};

use dirmirror_core::{domain::SyncAction, ports::IActionLog};
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::SyncError;

/// Counters returned when the scheduler stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Cycles that were started
    pub cycles_started: u64,
    /// Triggers dropped because a cycle was still running
    pub triggers_skipped: u64,
}

/// Triggers sync cycles on a fixed period until cancelled
pub struct SyncScheduler {
    period: Duration,
    log: Arc<dyn IActionLog>,
    shutdown: CancellationToken,
}

impl SyncScheduler {
    /// Creates a new `SyncScheduler`
    ///
    /// # Arguments
    /// * `period` - Time between consecutive triggers; must be non-zero
    /// * `log` - Action log that receives skipped-trigger notices
    /// * `shutdown` - Token that stops the scheduler when cancelled
    pub fn new(
        period: Duration,
        log: Arc<dyn IActionLog>,
        shutdown: CancellationToken,
    ) -> Result<Self, SyncError> {
        if period.is_zero() {
            return Err(SyncError::InvalidPeriod);
        }

        info!(period_secs = period.as_secs(), "Creating sync scheduler");

        Ok(Self {
            period,
            log,
            shutdown,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Main loop
    ///
    /// Runs `cycle` once immediately, then once per period, until the
    /// shutdown token is cancelled. Returns after the last in-flight cycle
    /// has finished.
    pub async fn run<F>(&self, cycle: F) -> SchedulerStats
    where
        F: Fn() + Send + Sync + 'static,
    {
        info!("Sync scheduler starting");

        let cycle = Arc::new(cycle);
        let mut stats = SchedulerStats::default();
        let mut in_flight: Option<JoinHandle<()>> = None;

        // The first tick completes immediately
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received, scheduler stopping");
                    break;
                }

                _ = ticker.tick() => {
                    if let Some(handle) = in_flight.take() {
                        if !handle.is_finished() {
                            warn!("Previous sync cycle still running, skipping trigger");
                            self.log.record(&SyncAction::CycleSkipped);
                            stats.triggers_skipped += 1;
                            in_flight = Some(handle);
                            continue;
                        }
                        reap(handle).await;
                    }

                    debug!(cycle = stats.cycles_started + 1, "Triggering sync cycle");
                    let cycle = Arc::clone(&cycle);
                    in_flight = Some(tokio::task::spawn_blocking(move || cycle()));
                    stats.cycles_started += 1;
                }
            }
        }

        if let Some(handle) = in_flight {
            if !handle.is_finished() {
                info!("Waiting for in-flight sync cycle to finish");
            }
            reap(handle).await;
        }

        info!(
            started = stats.cycles_started,
            skipped = stats.triggers_skipped,
            "Sync scheduler stopped"
        );
        stats
    }
}

/// Awaits a finished (or finishing) cycle, logging a panic if it had one.
async fn reap(handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        error!(error = %e, "Sync cycle task terminated abnormally");
    }
}

// ============================================================================
// Unit tests
// ============================================================================
