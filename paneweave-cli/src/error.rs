//! CLI error types and exit codes.

use paneweave_core::{ConfigError, StorageError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// Any failure: configuration, storage or a missing session
    pub const GENERAL_ERROR: i32 = 1;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session store error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// No blob stored for the session
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Output could not be rendered
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl CliError {
    /// Returns the exit code for this error.
    ///
    /// Every failure exits with 1; 0 is success.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Storage(_) | Self::SessionNotFound(_) | Self::Output(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}
