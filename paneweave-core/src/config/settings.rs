//! Engine settings
//!
//! Stored as `settings.toml`. Every field has a default, so an empty or
//! partial file is valid.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::tab::{SingletonPolicy, ViewType};

/// Default upper bound on a busy probe call
pub const DEFAULT_BUSY_CHECK_TIMEOUT_MS: u64 = 2000;

/// Default upper bound on a metadata fetch
pub const DEFAULT_ENRICHMENT_TIMEOUT_MS: u64 = 5000;

/// What a failed or timed-out busy probe means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusyCheckPolicy {
    /// Treat the tab as idle and close without asking
    #[default]
    FailOpen,
    /// Treat the tab as busy and ask the user
    FailClosed,
}

impl BusyCheckPolicy {
    /// Returns the busy verdict to use when the probe gave no answer.
    #[must_use]
    pub const fn assume_busy(self) -> bool {
        matches!(self, Self::FailClosed)
    }
}

/// Settings that tune the engine's collaborator handling and storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Busy probe timeout in milliseconds
    pub busy_check_timeout_ms: u64,
    /// Verdict for probe errors and timeouts
    pub busy_check_policy: BusyCheckPolicy,
    /// Metadata fetch timeout in milliseconds
    pub enrichment_timeout_ms: u64,
    /// Singleton view types; `None` uses the built-in table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub singletons: Option<Vec<ViewType>>,
    /// Directory for session files; `None` uses the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            busy_check_timeout_ms: DEFAULT_BUSY_CHECK_TIMEOUT_MS,
            busy_check_policy: BusyCheckPolicy::default(),
            enrichment_timeout_ms: DEFAULT_ENRICHMENT_TIMEOUT_MS,
            singletons: None,
            storage_dir: None,
        }
    }
}

impl EngineSettings {
    /// Returns the busy probe timeout
    #[must_use]
    pub const fn busy_check_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_check_timeout_ms)
    }

    /// Returns the metadata fetch timeout
    #[must_use]
    pub const fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }

    /// Builds the singleton policy from the override or the built-in table.
    #[must_use]
    pub fn singleton_policy(&self) -> SingletonPolicy {
        self.singletons
            .as_deref()
            .map_or_else(SingletonPolicy::builtin, |types| {
                SingletonPolicy::from_view_types(types.iter().copied())
            })
    }

    /// Returns the session directory, falling back to
    /// `<data dir>/paneweave/workspaces`.
    #[must_use]
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir.clone().or_else(|| {
            dirs::data_dir().map(|dir| dir.join("paneweave").join("workspaces"))
        })
    }
}
