//! Tabs and per-pane state

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::layout::TabId;
use crate::tab::ViewType;

/// A single open view.
///
/// `dirty` mirrors the externally owned dirty map and is never serialized:
/// it is skipped on write and defaults to `false` on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Workspace-unique, stable id.
    pub id: TabId,
    /// Logical resource id (filesystem path or synthetic id).
    pub path: String,
    /// Text shown in the tab header.
    pub label: String,
    /// Which kind of view renders the tab.
    pub view_type: ViewType,
    /// Optional hint for the renderer (e.g. `"preview"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Unsaved changes flag, owned by editor collaborators.
    #[serde(skip)]
    pub dirty: bool,
    /// Opaque bag of extra data.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Tab {
    /// Creates a clean tab with no intent and empty metadata.
    #[must_use]
    pub fn new(
        id: impl Into<TabId>,
        path: impl Into<String>,
        label: impl Into<String>,
        view_type: ViewType,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            label: label.into(),
            view_type,
            intent: None,
            dirty: false,
            metadata: Map::new(),
        }
    }

    /// Sets the intent.
    #[must_use]
    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    /// Returns a copy with the dirty flag cleared, as it is persisted.
    #[must_use]
    pub fn persisted(&self) -> Self {
        Self {
            dirty: false,
            ..self.clone()
        }
    }
}

/// The ordered tabs of one pane plus its active tab.
///
/// Invariant: `active_tab_id` is empty or the id of a tab in `tabs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneState {
    tabs: Vec<Tab>,
    active_tab_id: TabId,
}

impl PaneState {
    /// Creates an empty pane.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pane holding one tab, which is active.
    #[must_use]
    pub fn with_tab(tab: Tab) -> Self {
        let active_tab_id = tab.id.clone();
        Self {
            tabs: vec![tab],
            active_tab_id,
        }
    }

    /// Creates a pane from parts, repairing an active id that names no tab.
    ///
    /// An unknown non-empty active id falls back to the last tab's id.
    #[must_use]
    pub fn from_parts(tabs: Vec<Tab>, active_tab_id: TabId) -> Self {
        let active_tab_id = if active_tab_id.is_none()
            || tabs.iter().any(|tab| tab.id == active_tab_id)
        {
            active_tab_id
        } else {
            tabs.last().map(|tab| tab.id.clone()).unwrap_or_default()
        };
        Self {
            tabs,
            active_tab_id,
        }
    }

    /// Returns the tabs in display order.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Returns the active tab id (empty when none).
    #[must_use]
    pub const fn active_tab_id(&self) -> &TabId {
        &self.active_tab_id
    }

    /// Returns the active tab.
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.tab(&self.active_tab_id)
    }

    /// Returns the number of tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    /// Returns true if the pane holds no tabs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Returns true if the pane holds a tab with this id.
    #[must_use]
    pub fn contains(&self, tab_id: &TabId) -> bool {
        self.tabs.iter().any(|tab| &tab.id == tab_id)
    }

    /// Returns the tab with this id.
    #[must_use]
    pub fn tab(&self, tab_id: &TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| &tab.id == tab_id)
    }

    /// Returns the tab with this id mutably.
    pub fn tab_mut(&mut self, tab_id: &TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| &tab.id == tab_id)
    }

    /// Returns mutable access to every tab.
    pub fn tabs_mut(&mut self) -> impl Iterator<Item = &mut Tab> {
        self.tabs.iter_mut()
    }

    /// Appends a tab without changing the active tab.
    pub fn push(&mut self, tab: Tab) {
        self.tabs.push(tab);
    }

    /// Makes `tab_id` active. Returns false if the pane has no such tab.
    pub fn set_active(&mut self, tab_id: &TabId) -> bool {
        if self.contains(tab_id) {
            self.active_tab_id = tab_id.clone();
            true
        } else {
            false
        }
    }

    /// Removes a tab.
    ///
    /// If it was active, the first remaining tab becomes active, or none if
    /// the pane is now empty.
    pub fn remove(&mut self, tab_id: &TabId) -> Option<Tab> {
        let index = self.tabs.iter().position(|tab| &tab.id == tab_id)?;
        let removed = self.tabs.remove(index);
        if &self.active_tab_id == tab_id {
            self.active_tab_id = self
                .tabs
                .first()
                .map(|tab| tab.id.clone())
                .unwrap_or_default();
        }
        Some(removed)
    }

    /// Returns a copy with every tab's dirty flag cleared.
    #[must_use]
    pub fn persisted(&self) -> Self {
        Self {
            tabs: self.tabs.iter().map(Tab::persisted).collect(),
            active_tab_id: self.active_tab_id.clone(),
        }
    }
}
