//! Side table from pane ids to pane state

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::state::{PaneState, Tab};
use crate::layout::{PaneId, TabId};
use crate::tab::ViewType;

/// Maps pane ids to their tabs.
///
/// The registry carries no topology: the layout tree decides where a pane
/// sits, the registry decides what it holds. The workspace keeps the set of
/// keys equal to the set of leaves in the tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneRegistry {
    panes: BTreeMap<PaneId, PaneState>,
}

impl PaneRegistry {
    /// Creates a registry holding one empty root pane.
    #[must_use]
    pub fn new() -> Self {
        let mut panes = BTreeMap::new();
        panes.insert(PaneId::root(), PaneState::new());
        Self { panes }
    }

    /// Creates a registry from existing entries.
    #[must_use]
    pub fn from_panes(panes: BTreeMap<PaneId, PaneState>) -> Self {
        Self { panes }
    }

    /// Returns the number of panes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panes.len()
    }

    /// Returns true if there are no panes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    /// Returns true if the pane exists.
    #[must_use]
    pub fn contains(&self, pane_id: &PaneId) -> bool {
        self.panes.contains_key(pane_id)
    }

    /// Returns every pane id in key order.
    pub fn ids(&self) -> impl Iterator<Item = &PaneId> {
        self.panes.keys()
    }

    /// Iterates over every pane.
    pub fn iter(&self) -> impl Iterator<Item = (&PaneId, &PaneState)> {
        self.panes.iter()
    }

    /// Returns a pane.
    #[must_use]
    pub fn get(&self, pane_id: &PaneId) -> Option<&PaneState> {
        self.panes.get(pane_id)
    }

    /// Returns a pane mutably.
    pub fn get_mut(&mut self, pane_id: &PaneId) -> Option<&mut PaneState> {
        self.panes.get_mut(pane_id)
    }

    /// Inserts a pane, returning the state it replaced.
    pub fn insert(&mut self, pane_id: PaneId, state: PaneState) -> Option<PaneState> {
        self.panes.insert(pane_id, state)
    }

    /// Removes a pane.
    pub fn remove(&mut self, pane_id: &PaneId) -> Option<PaneState> {
        self.panes.remove(pane_id)
    }

    /// Keeps only the panes for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&PaneId) -> bool) {
        self.panes.retain(|pane_id, _| keep(pane_id));
    }

    /// Finds the first pane, in `order`, that holds `tab_id`.
    ///
    /// Panes not listed in `order` are not searched.
    #[must_use]
    pub fn locate<'a>(&self, tab_id: &TabId, order: &'a [PaneId]) -> Option<&'a PaneId> {
        order.iter().find(|pane_id| {
            self.panes
                .get(*pane_id)
                .is_some_and(|pane| pane.contains(tab_id))
        })
    }

    /// Returns the first tab with this id in any pane.
    #[must_use]
    pub fn find_tab(&self, tab_id: &TabId) -> Option<(&PaneId, &Tab)> {
        self.panes
            .iter()
            .find_map(|(pane_id, pane)| pane.tab(tab_id).map(|tab| (pane_id, tab)))
    }

    /// Returns every `(pane, tab)` pair whose tab has the given view type.
    #[must_use]
    pub fn tabs_of_view_type(&self, view_type: ViewType) -> Vec<(&PaneId, &Tab)> {
        self.panes
            .iter()
            .flat_map(|(pane_id, pane)| {
                pane.tabs()
                    .iter()
                    .filter(move |tab| tab.view_type == view_type)
                    .map(move |tab| (pane_id, tab))
            })
            .collect()
    }

    /// Updates label and, optionally, view type of every tab carrying `tab_id`.
    ///
    /// Order and active selection are untouched. Returns how many tabs changed.
    pub fn rename(&mut self, tab_id: &TabId, label: &str, view_type: Option<ViewType>) -> usize {
        let mut renamed = 0;
        for pane in self.panes.values_mut() {
            if let Some(tab) = pane.tab_mut(tab_id) {
                label.clone_into(&mut tab.label);
                if let Some(view_type) = view_type {
                    tab.view_type = view_type;
                }
                renamed += 1;
            }
        }
        renamed
    }

    /// Sets the dirty flag on every tab showing `path`. Returns how many changed.
    pub fn mark_dirty(&mut self, path: &str, dirty: bool) -> usize {
        let mut marked = 0;
        for pane in self.panes.values_mut() {
            for tab in pane.tabs_mut().filter(|tab| tab.path == path) {
                tab.dirty = dirty;
                marked += 1;
            }
        }
        marked
    }

    /// Returns true if any tab shows `path`.
    #[must_use]
    pub fn shows_path(&self, path: &str) -> bool {
        self.panes
            .values()
            .any(|pane| pane.tabs().iter().any(|tab| tab.path == path))
    }

    /// Returns the total number of tabs across panes.
    #[must_use]
    pub fn tab_count(&self) -> usize {
        self.panes.values().map(PaneState::len).sum()
    }

    /// Returns a copy with every dirty flag cleared.
    #[must_use]
    pub fn persisted(&self) -> Self {
        Self {
            panes: self
                .panes
                .iter()
                .map(|(pane_id, pane)| (pane_id.clone(), pane.persisted()))
                .collect(),
        }
    }
}
