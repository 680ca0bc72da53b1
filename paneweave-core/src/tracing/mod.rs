//! Tracing setup and span naming
//!
//! The engine logs through the `tracing` macros and never installs a
//! subscriber itself. Hosts call [`init_tracing`] once at startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Target prefix shared by the engine and the CLI
const TARGET_PREFIX: &str = "paneweave";

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Errors from installing the subscriber
#[derive(Debug, Error)]
pub enum TracingError {
    /// A subscriber was already installed by this process
    #[error("tracing has already been initialized")]
    AlreadyInitialized,

    /// The filter directive does not parse
    #[error("invalid log filter {filter:?}: {reason}")]
    InvalidFilter {
        /// Directive as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A level name was not recognized
    #[error("unknown log level: {0}")]
    UnknownLevel(String),

    /// The log file could not be created
    #[error("failed to create log file {path}: {source}")]
    LogFile {
        /// File that could not be created
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Another subscriber is installed globally
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Result type for tracing setup
pub type TracingResult<T> = Result<T, TracingError>;

/// Verbosity of `paneweave` targets.
///
/// `Warn` shows degraded restores and failed writes only; `Info` adds
/// session loads and migrations; `Debug` every accepted mutation; `Trace`
/// close gate stages and queued commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    #[default]
    Warn,
    /// Adds lifecycle events
    Info,
    /// Adds mutations
    Debug,
    /// Everything
    Trace,
}

impl TracingLevel {
    const ALL: [Self; 5] = [Self::Error, Self::Warn, Self::Info, Self::Debug, Self::Trace];

    /// Returns the directive name of the level
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Converts to the `tracing` level
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Maps a `-v` count to a level: 0 warn, 1 info, 2 debug, 3+ trace.
    #[must_use]
    pub const fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

impl FromStr for TracingLevel {
    type Err = TracingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name == "warning" {
            return Ok(Self::Warn);
        }
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == name)
            .ok_or_else(|| TracingError::UnknownLevel(s.to_owned()))
    }
}

impl std::fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Standard output
    Stdout,
    /// Keeps stdout free for command output
    #[default]
    Stderr,
    /// Truncated on startup; written without ANSI colors
    File(PathBuf),
}

impl TracingOutput {
    /// Opens the destination, returning the writer and whether it takes
    /// ANSI colors.
    fn open(&self) -> TracingResult<(BoxMakeWriter, bool)> {
        match self {
            Self::Stdout => Ok((BoxMakeWriter::new(std::io::stdout), true)),
            Self::Stderr => Ok((BoxMakeWriter::new(std::io::stderr), true)),
            Self::File(path) => {
                let file = std::fs::File::create(path).map_err(|source| TracingError::LogFile {
                    path: path.clone(),
                    source,
                })?;
                Ok((BoxMakeWriter::new(file), false))
            }
        }
    }
}

/// Subscriber settings
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Level for `paneweave` targets; other targets are silent
    pub level: TracingLevel,
    /// Destination
    pub output: TracingOutput,
    /// Full `EnvFilter` directive, used instead of `level` when set
    pub filter: Option<String>,
}

impl TracingConfig {
    /// Creates the default configuration (warnings to stderr)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Sets a full filter directive
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Builds the env filter for this configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFilter` if the custom directive does not parse.
    pub fn env_filter(&self) -> TracingResult<EnvFilter> {
        let directive = self
            .filter
            .clone()
            .unwrap_or_else(|| format!("{TARGET_PREFIX}={}", self.level));
        EnvFilter::try_new(&directive).map_err(|e| TracingError::InvalidFilter {
            filter: directive,
            reason: e.to_string(),
        })
    }
}

/// Installs the global subscriber.
///
/// Only the first call in a process can succeed.
///
/// # Errors
///
/// Returns `AlreadyInitialized` on later calls, `InvalidFilter` or
/// `LogFile` for a bad configuration, and `Install` if some other
/// subscriber got there first.
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }
    let filter = config.env_filter()?;
    let (writer, ansi) = config.output.open()?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(ansi)
                .with_writer(writer),
        )
        .try_init()
        .map_err(|e| TracingError::Install(e.to_string()))?;

    tracing::debug!(level = %config.level, output = ?config.output, "Tracing initialized");
    Ok(())
}

/// Span names for workspace operations
pub mod span_names {
    /// Pane split
    pub const SPLIT: &str = "workspace.split";
    /// Tab open
    pub const OPEN: &str = "workspace.open";
    /// Tab or pane close
    pub const CLOSE: &str = "workspace.close";
    /// Session load and migration
    pub const RESTORE: &str = "workspace.restore";
    /// Snapshot write
    pub const PERSIST: &str = "workspace.persist";
}
