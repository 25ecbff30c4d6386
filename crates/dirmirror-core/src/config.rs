//! Configuration module for dirmirror.
//!
//! Provides the typed configuration handed to the scheduler, reconciler and
//! action log, with defaults, validation, and a builder for assembling it
//! from command-line arguments.

use std::{
    path::{Component, Path, PathBuf},
    time::Duration,
};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for dirmirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Mirroring settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Directory tree that is mirrored. Must exist when a cycle starts.
    pub source: PathBuf,
    /// Directory tree that is made identical to `source`. Created if absent.
    pub replica: PathBuf,
    /// Minutes between the start of consecutive cycles.
    pub interval_minutes: u64,
}

/// Action log settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// File every action-log line is appended to.
    pub file: PathBuf,
    /// Default diagnostic tracing level (`trace`, `debug`, `info`, `warn`
    /// or `error`); `RUST_LOG` takes precedence.
    pub level: String,
}

impl SyncConfig {
    /// The scheduling period as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            replica: PathBuf::new(),
            interval_minutes: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("dirmirror");
        Self {
            file: data_dir.join("dirmirror.log"),
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.interval_minutes"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. Path checks are
    /// lexical only: the replica may not exist yet, and a missing source is
    /// reported per cycle rather than at startup.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- sync ---
        if self.sync.interval_minutes == 0 {
            errors.push(ValidationError {
                field: "sync.interval_minutes".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.source.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "sync.source".into(),
                message: "must not be empty".into(),
            });
        }
        if self.sync.replica.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "sync.replica".into(),
                message: "must not be empty".into(),
            });
        }
        if !self.sync.source.as_os_str().is_empty() && !self.sync.replica.as_os_str().is_empty()
        {
            let source = normalize(&self.sync.source);
            let replica = normalize(&self.sync.replica);
            if source == replica {
                errors.push(ValidationError {
                    field: "sync.replica".into(),
                    message: "must differ from sync.source".into(),
                });
            } else if is_nested(&source, &replica) {
                errors.push(ValidationError {
                    field: "sync.replica".into(),
                    message: format!(
                        "must not be nested with sync.source ({} / {})",
                        self.sync.source.display(),
                        self.sync.replica.display()
                    ),
                });
            }
        }

        // --- logging ---
        if self.logging.file.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "logging.file".into(),
                message: "must not be empty".into(),
            });
        }
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

/// True if either path lies inside the other.
///
/// Mirroring a tree into its own subtree (or the reverse) would make every
/// cycle copy the replica into itself. Both paths must already be
/// [`normalize`]d.
fn is_nested(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

/// Resolves `.` and `..` segments lexically, without touching the filesystem.
///
/// `..` at the root stays at the root; leading `..` of a relative path is kept.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use dirmirror_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .sync_source(PathBuf::from("/data/source"))
///     .sync_replica(PathBuf::from("/backup/replica"))
///     .sync_interval_minutes(5)
///     .logging_file(PathBuf::from("/var/log/dirmirror.log"))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- sync ---

    pub fn sync_source(mut self, source: PathBuf) -> Self {
        self.config.sync.source = source;
        self
    }

    pub fn sync_replica(mut self, replica: PathBuf) -> Self {
        self.config.sync.replica = replica;
        self
    }

    pub fn sync_interval_minutes(mut self, minutes: u64) -> Self {
        self.config.sync.interval_minutes = minutes;
        self
    }

    // --- logging ---

    pub fn logging_file(mut self, file: PathBuf) -> Self {
        self.config.logging.file = file;
        self
    }

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Consume the builder and return the [`Config`] without validation.
    pub fn build(self) -> Config {
        self.config
    }

    /// Consume the builder, validate, and return the [`Config`] or all
    /// validation errors.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let errors = self.config.validate();
        if errors.is_empty() {
            Ok(self.config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
