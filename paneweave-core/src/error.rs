//! Error types for `paneweave-core`
//!
//! Most failures inside the engine degrade to a safe default and are only
//! logged. The types here cover what is surfaced to callers: addressing a
//! missing pane or tab, storage and settings I/O, and collaborator failures
//! (which the engine itself swallows).

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use crate::layout::{LayoutError, LayoutResult};

/// Failure of an external collaborator (metadata provider, busy probe).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The collaborator reported a failure.
    #[error("collaborator failed: {0}")]
    Failed(String),

    /// The collaborator did not answer in time.
    #[error("collaborator timed out after {0:?}")]
    TimedOut(Duration),
}

/// Errors from the session store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),

    /// Deserialization error
    #[error("deserialization error: {0}")]
    Deserialization(serde_json::Error),

    /// Session id cannot be used as a storage key
    #[error("invalid session id: {0:?}")]
    InvalidSessionId(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors from loading or saving engine settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error
    #[error("failed to access {path}: {source}")]
    Io {
        /// File that could not be read or written
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for `EngineSettings`
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No platform configuration directory exists
    #[error("no configuration directory available")]
    NoConfigDir,
}

/// Result type for settings operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Umbrella error for callers that deal with several concerns at once.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Layout addressing error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Settings error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The workspace task has stopped
    #[error("workspace task is no longer running")]
    Closed,
}
