//! dirmirror - periodic one-way directory mirroring
//!
//! Keeps a replica directory identical to a source directory:
//! - One reconcile cycle immediately at startup, then one per interval
//! - Every replica change written to a timestamped action log
//! - Graceful shutdown on SIGTERM/SIGINT after the running cycle finishes
//!
//! # Architecture
//!
//! `main` parses the startup parameters into a validated [`Config`], wires
//! the [`AuditLogger`] and [`TreeReconciler`] together, and hands the
//! reconciler to a [`SyncScheduler`]. The scheduler loop is controlled by a
//! `CancellationToken` that is triggered on receipt of SIGTERM or SIGINT.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use dirmirror_audit::AuditLogger;
use dirmirror_core::{
    config::{Config, ConfigBuilder, LoggingConfig, ValidationError},
    domain::SyncAction,
    ports::IActionLog,
};
use dirmirror_sync::{
    reconciler::{CycleReport, TreeReconciler},
    scheduler::SyncScheduler,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Command line
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "dirmirror",
    version,
    about = "Periodically mirror a source directory into a replica directory"
)]
struct Cli {
    /// Minutes between synchronization cycles
    interval_minutes: u64,

    /// File the action log is appended to
    log_file: PathBuf,

    /// Directory to mirror from
    source: PathBuf,

    /// Directory to mirror into; created if missing
    replica: PathBuf,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Print the cycle report as JSON (with --once)
    #[arg(long, requires = "once")]
    json: bool,

    /// Diagnostic output on stderr (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Tracing level selected by the `-v` count
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Builds the validated configuration, resolving relative paths
    /// against `cwd`.
    fn to_config(&self, cwd: &Path) -> Result<Config, Vec<ValidationError>> {
        ConfigBuilder::new()
            .sync_interval_minutes(self.interval_minutes)
            .sync_source(absolute(cwd, &self.source))
            .sync_replica(absolute(cwd, &self.replica))
            .logging_file(absolute(cwd, &self.log_file))
            .logging_level(self.log_level())
            .build_validated()
    }
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || path.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

// ============================================================================
// DaemonService
// ============================================================================

/// Wires the action log, reconciler and scheduler for one source/replica pair
struct DaemonService {
    config: Config,
    logger: Arc<AuditLogger>,
    reconciler: Arc<TreeReconciler>,
    shutdown: CancellationToken,
}

impl DaemonService {
    fn new(config: Config, shutdown: CancellationToken) -> Self {
        let logger = Arc::new(AuditLogger::new(&config.logging.file));
        let reconciler = Arc::new(TreeReconciler::new(&config.sync, logger.clone()));

        Self {
            config,
            logger,
            reconciler,
            shutdown,
        }
    }

    fn announce_start(&self) {
        info!(
            source = %self.config.sync.source.display(),
            replica = %self.config.sync.replica.display(),
            log_file = %self.config.logging.file.display(),
            interval_minutes = self.config.sync.interval_minutes,
            "dirmirror starting"
        );
        self.logger.record(&SyncAction::SyncStarted);
    }

    /// Runs cycles on the configured interval until shutdown is requested.
    async fn run(&self) -> Result<()> {
        self.announce_start();

        let scheduler = SyncScheduler::new(
            self.config.sync.interval(),
            self.logger.clone(),
            self.shutdown.clone(),
        )
        .context("Failed to create sync scheduler")?;

        let reconciler = Arc::clone(&self.reconciler);
        let stats = scheduler
            .run(move || {
                reconciler.run_cycle();
            })
            .await;

        info!(
            cycles = stats.cycles_started,
            skipped = stats.triggers_skipped,
            "Scheduler finished"
        );
        Ok(())
    }

    /// Runs a single cycle on the blocking pool and returns its report.
    async fn run_once(&self) -> Result<CycleReport> {
        self.announce_start();

        let reconciler = Arc::clone(&self.reconciler);
        tokio::task::spawn_blocking(move || reconciler.run_cycle())
            .await
            .context("Sync cycle task terminated abnormally")
    }
}

// ============================================================================
// Graceful shutdown signal handler
// ============================================================================

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

// ============================================================================
// Main entry point
// ============================================================================

/// Diagnostics on stderr at the configured level; `RUST_LOG` overrides it.
fn init_tracing(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let config = match cli.to_config(&cwd) {
        Ok(config) => config,
        Err(errors) => {
            for e in &errors {
                eprintln!("error: {e}");
            }
            eprintln!("\n{}", Cli::command().render_usage());
            return Ok(ExitCode::from(2));
        }
    };

    init_tracing(&config.logging);

    let shutdown_token = CancellationToken::new();
    let service = DaemonService::new(config, shutdown_token.clone());

    if cli.once {
        let report = service.run_once().await?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to encode cycle report")?
            );
        }
        return Ok(if report.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    tokio::spawn(shutdown_signal(shutdown_token));

    let result = service.run().await;
    match &result {
        Ok(()) => info!("dirmirror shut down gracefully"),
        Err(e) => error!(error = %e, "dirmirror exiting with error"),
    }

    result.map(|()| ExitCode::SUCCESS)
}

// ============================================================================
// Tests
// ============================================================================
