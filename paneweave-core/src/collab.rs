//! Interfaces to external collaborators
//!
//! The engine consumes a few narrow services from its host: resource
//! metadata, terminal busy checks, confirmation dialogs, selection sync and
//! the dirty map maintained by editors. Each is a trait so hosts (and tests)
//! can plug their own implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProbeError;
use crate::layout::TabId;

/// Resource metadata returned by a [`MetadataProvider`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Size in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Last modification time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    /// Whether the resource is a directory.
    #[serde(default)]
    pub is_dir: bool,
    /// MIME type, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    /// Provider specific fields.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// Looks up metadata for resource paths.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Returns metadata for a path.
    async fn stat(&self, path: &str) -> Result<Metadata, ProbeError>;
}

/// Tells whether a terminal tab still runs something.
#[async_trait]
pub trait BusyProbe: Send + Sync {
    /// Returns true if closing the tab would interrupt work.
    async fn is_busy(&self, tab_id: &TabId) -> Result<bool, ProbeError>;
}

/// A question the close pipeline asks the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmRequest {
    /// A terminal is busy; close it anyway?
    CloseBusy {
        /// Tab being closed.
        tab_id: TabId,
        /// Its label.
        label: String,
    },
    /// The resource has unsaved changes; discard them?
    DiscardChanges {
        /// Tab being closed.
        tab_id: TabId,
        /// Path with unsaved changes.
        path: String,
        /// Its label.
        label: String,
    },
}

impl ConfirmRequest {
    /// Returns the tab the question is about.
    #[must_use]
    pub const fn tab_id(&self) -> &TabId {
        match self {
            Self::CloseBusy { tab_id, .. } | Self::DiscardChanges { tab_id, .. } => tab_id,
        }
    }
}

/// Shows confirmation dialogs.
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// Returns true if the user accepted.
    async fn confirm(&self, request: &ConfirmRequest) -> bool;
}

/// Receives the path of the resource tab that became active.
pub trait SelectionSink: Send + Sync {
    /// Called when a resource-bearing tab is activated.
    fn on_tab_select(&self, path: &str);
}

/// Prompt that answers every question the same way without asking.
///
/// Used by headless hosts that have no user to ask.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm {
    accept: bool,
}

impl AutoConfirm {
    /// Accepts every request.
    #[must_use]
    pub const fn accept() -> Self {
        Self { accept: true }
    }

    /// Declines every request.
    #[must_use]
    pub const fn decline() -> Self {
        Self { accept: false }
    }
}

#[async_trait]
impl ConfirmPrompt for AutoConfirm {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        tracing::debug!(
            tab_id = %request.tab_id(),
            accept = self.accept,
            "Auto-answering confirmation"
        );
        self.accept
    }
}

/// Unsaved-change flags keyed by resource path.
///
/// Editors report changes through `Workspace::on_unsaved_change`; the close
/// pipeline reads and clears flags here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyMap {
    flags: HashMap<String, bool>,
}

impl DirtyMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the flag for a path. Clean paths are dropped from the map.
    pub fn set(&mut self, path: &str, dirty: bool) {
        if dirty {
            self.flags.insert(path.to_owned(), true);
        } else {
            self.flags.remove(path);
        }
    }

    /// Returns true if the path has unsaved changes.
    #[must_use]
    pub fn is_dirty(&self, path: &str) -> bool {
        self.flags.get(path).copied().unwrap_or(false)
    }

    /// Clears the flag for a path.
    pub fn clear(&mut self, path: &str) {
        self.flags.remove(path);
    }

    /// Returns the dirty paths, sorted.
    #[must_use]
    pub fn dirty_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.flags.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }
}
