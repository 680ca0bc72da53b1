//! Snapshot encoding and shape-sniffing decoding
//!
//! The stored blob has no version field. Each pane entry is classified by
//! shape instead:
//!
//! - **Modern**: `{"tabs": [{"id": ..., "path": ..., ...}], "activeTabId": ...}`
//! - **Legacy**: `{"files": ["/a", "/b"], "activeFile": "/b"}`
//! - **Malformed**: anything else, restored as an empty pane
//!
//! Decoding never fails once the blob is a JSON object; damaged parts are
//! replaced by safe defaults and reported in [`DecodedWorkspace`].

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StorageError, StorageResult};
use crate::layout::{LayoutNode, PaneId, TabId};
use crate::pane::{PaneRegistry, PaneState, Tab};
use crate::tab::{OpenRequest, TabFactory, ViewType};

/// The persisted `{panes, layout, activePaneId}` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    /// Pane registry.
    pub panes: PaneRegistry,
    /// Layout tree.
    pub layout: LayoutNode,
    /// Focused pane.
    pub active_pane_id: PaneId,
}

impl Default for WorkspaceSnapshot {
    fn default() -> Self {
        Self {
            panes: PaneRegistry::new(),
            layout: LayoutNode::default(),
            active_pane_id: PaneId::root(),
        }
    }
}

/// Stored shape of one pane entry.
#[derive(Debug, Clone, PartialEq)]
pub enum PaneShape {
    /// List of tab records.
    Modern {
        /// Decoded tabs, dirty flags cleared.
        tabs: Vec<Tab>,
        /// Stored active tab id.
        active_tab_id: TabId,
    },
    /// List of plain paths plus the active path.
    Legacy {
        /// Stored paths in order.
        files: Vec<String>,
        /// Stored active path.
        active_file: Option<String>,
    },
    /// Neither shape.
    Malformed,
}

impl PaneShape {
    /// Returns the shape's name as used in logs and reports.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Modern { .. } => "modern",
            Self::Legacy { .. } => "legacy",
            Self::Malformed => "malformed",
        }
    }

    /// Converts the shape into pane state.
    #[must_use]
    pub fn into_pane(self) -> PaneState {
        match self {
            Self::Modern {
                tabs,
                active_tab_id,
            } => accept_modern(tabs, active_tab_id),
            Self::Legacy { files, active_file } => migrate_legacy(&files, active_file.as_deref()),
            Self::Malformed => PaneState::new(),
        }
    }
}

/// Result of decoding a stored blob.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedWorkspace {
    /// The reconciled snapshot.
    pub snapshot: WorkspaceSnapshot,
    /// Panes that were stored in the legacy shape.
    pub legacy_panes: Vec<PaneId>,
    /// Panes that matched no known shape and were emptied.
    pub malformed_panes: Vec<PaneId>,
    /// Registry entries with no leaf in the layout, dropped.
    pub orphaned_panes: Vec<PaneId>,
    /// True if the stored layout was unusable and replaced by a root leaf.
    pub layout_replaced: bool,
}

impl DecodedWorkspace {
    /// Returns true if decoding had to change anything.
    #[must_use]
    pub fn needs_rewrite(&self) -> bool {
        self.layout_replaced
            || !self.legacy_panes.is_empty()
            || !self.malformed_panes.is_empty()
            || !self.orphaned_panes.is_empty()
    }
}

/// Serializes a snapshot to the stored JSON form, dropping dirty flags.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if serialization fails.
pub fn encode_snapshot(snapshot: &WorkspaceSnapshot) -> StorageResult<String> {
    let stored = WorkspaceSnapshot {
        panes: snapshot.panes.persisted(),
        layout: snapshot.layout.clone(),
        active_pane_id: snapshot.active_pane_id.clone(),
    };
    serde_json::to_string(&stored).map_err(StorageError::Serialization)
}

/// Decodes a stored blob, migrating legacy panes.
///
/// # Errors
///
/// Returns `StorageError::Deserialization` if the blob is not JSON at all,
/// or is JSON but not an object.
pub fn decode_snapshot(json: &str) -> StorageResult<DecodedWorkspace> {
    let value: Value = serde_json::from_str(json).map_err(StorageError::Deserialization)?;
    let Value::Object(root) = value else {
        return Err(StorageError::Deserialization(serde::de::Error::custom(
            "workspace blob is not a JSON object",
        )));
    };
    Ok(decode_object(&root))
}

fn decode_object(root: &Map<String, Value>) -> DecodedWorkspace {
    let mut decoded = DecodedWorkspace::default();

    let layout = root
        .get("layout")
        .and_then(|layout| serde_json::from_value::<LayoutNode>(layout.clone()).ok())
        .filter(LayoutNode::has_unique_leaves);
    let layout = layout.unwrap_or_else(|| {
        decoded.layout_replaced = true;
        LayoutNode::default()
    });

    let mut stored: BTreeMap<PaneId, PaneState> = BTreeMap::new();
    if let Some(Value::Object(panes)) = root.get("panes") {
        for (pane_id, value) in panes {
            let pane_id = PaneId::new(pane_id.as_str());
            let shape = classify_pane(value);
            match shape {
                PaneShape::Legacy { .. } => decoded.legacy_panes.push(pane_id.clone()),
                PaneShape::Malformed => decoded.malformed_panes.push(pane_id.clone()),
                PaneShape::Modern { .. } => {}
            }
            stored.insert(pane_id, shape.into_pane());
        }
    }

    let leaves = layout.pane_ids();
    let mut registry = BTreeMap::new();
    for leaf in &leaves {
        let pane = stored.remove(leaf).unwrap_or_default();
        registry.insert(leaf.clone(), pane);
    }
    decoded.orphaned_panes = stored.into_keys().collect();

    let active_pane_id = root
        .get("activePaneId")
        .and_then(Value::as_str)
        .map(PaneId::new)
        .filter(|id| leaves.contains(id))
        .unwrap_or_else(|| fallback_active_pane(&leaves));

    for pane_id in &decoded.legacy_panes {
        tracing::info!(pane_id = %pane_id, "Migrated legacy pane");
    }
    for pane_id in &decoded.malformed_panes {
        tracing::warn!(pane_id = %pane_id, "Pane matched no known shape, restored empty");
    }
    for pane_id in &decoded.orphaned_panes {
        tracing::warn!(pane_id = %pane_id, "Dropped pane missing from layout");
    }

    decoded.snapshot = WorkspaceSnapshot {
        panes: PaneRegistry::from_panes(registry),
        layout,
        active_pane_id,
    };
    decoded
}

/// Root pane if it is a leaf, else the first leaf.
fn fallback_active_pane(leaves: &[PaneId]) -> PaneId {
    let root = PaneId::root();
    if leaves.contains(&root) {
        root
    } else {
        leaves.first().cloned().unwrap_or(root)
    }
}

/// Classifies one stored pane entry.
#[must_use]
pub fn classify_pane(value: &Value) -> PaneShape {
    let Value::Object(pane) = value else {
        return PaneShape::Malformed;
    };

    if let Some(Value::Array(records)) = pane.get("tabs") {
        let tabs: Option<Vec<Tab>> = records.iter().map(decode_tab_record).collect();
        if let Some(tabs) = tabs {
            let active_tab_id = pane
                .get("activeTabId")
                .and_then(Value::as_str)
                .map(TabId::new)
                .unwrap_or_default();
            return PaneShape::Modern {
                tabs,
                active_tab_id,
            };
        }
    }

    if let Some(Value::Array(entries)) = pane.get("files") {
        let files: Option<Vec<String>> = entries
            .iter()
            .map(|entry| entry.as_str().map(str::to_owned))
            .collect();
        if let Some(files) = files {
            let active_file = pane
                .get("activeFile")
                .and_then(Value::as_str)
                .map(str::to_owned);
            return PaneShape::Legacy { files, active_file };
        }
    }

    PaneShape::Malformed
}

/// Reads one modern tab record. Requires a string `id`; every other field
/// is optional and resolved like an open request when missing. A stored
/// label is kept as written, even when empty.
fn decode_tab_record(record: &Value) -> Option<Tab> {
    let Value::Object(fields) = record else {
        return None;
    };
    let id = fields.get("id").and_then(Value::as_str)?;
    let path = fields.get("path").and_then(Value::as_str).unwrap_or(id);
    let label = fields.get("label").and_then(Value::as_str);

    let request = OpenRequest {
        path: path.to_owned(),
        view_type: fields
            .get("viewType")
            .and_then(Value::as_str)
            .and_then(|tag| tag.parse::<ViewType>().ok()),
        label: None,
        intent: fields
            .get("intent")
            .and_then(Value::as_str)
            .map(str::to_owned),
        extra: fields
            .get("metadata")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        pane: None,
    };
    let mut tab = TabFactory::build(&request, TabId::new(id));
    if let Some(label) = label {
        label.clone_into(&mut tab.label);
    }
    Some(tab)
}

/// Builds a pane from a legacy path list.
///
/// The active tab is the one for `active_file`, or the last tab when the
/// stored active path is absent or names no listed file.
#[must_use]
pub fn migrate_legacy(files: &[String], active_file: Option<&str>) -> PaneState {
    let tabs = dedupe_tabs(files.iter().map(|path| TabFactory::from_path(path)));
    let active_tab_id = active_file
        .and_then(|active| tabs.iter().find(|tab| tab.path == active))
        .or_else(|| tabs.last())
        .map(|tab| tab.id.clone())
        .unwrap_or_default();
    PaneState::from_parts(tabs, active_tab_id)
}

/// Accepts modern tab records with dirty flags cleared.
#[must_use]
pub fn accept_modern(tabs: Vec<Tab>, active_tab_id: TabId) -> PaneState {
    let tabs = dedupe_tabs(tabs.into_iter().map(|tab| tab.persisted()));
    PaneState::from_parts(tabs, active_tab_id)
}

/// Keeps the first tab for each id.
fn dedupe_tabs(tabs: impl Iterator<Item = Tab>) -> Vec<Tab> {
    let mut seen = HashSet::new();
    tabs.filter(|tab| seen.insert(tab.id.clone())).collect()
}
