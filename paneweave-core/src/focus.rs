//! Active pane tracking and selection sync

use std::sync::Arc;

use crate::collab::SelectionSink;
use crate::layout::{LayoutNode, PaneId};
use crate::pane::Tab;

/// Tracks the focused pane and tells the selection sink about resource tabs
/// that become active.
#[derive(Clone, Default)]
pub struct FocusController {
    active_pane: PaneId,
    selection: Option<Arc<dyn SelectionSink>>,
}

impl std::fmt::Debug for FocusController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusController")
            .field("active_pane", &self.active_pane)
            .field("has_selection_sink", &self.selection.is_some())
            .finish()
    }
}

impl FocusController {
    /// Creates a controller focused on `active_pane`
    #[must_use]
    pub fn new(active_pane: PaneId) -> Self {
        Self {
            active_pane,
            selection: None,
        }
    }

    /// Sets the sink notified on resource activation
    #[must_use]
    pub fn with_selection_sink(mut self, sink: Arc<dyn SelectionSink>) -> Self {
        self.selection = Some(sink);
        self
    }

    /// Returns the focused pane
    #[must_use]
    pub const fn active_pane(&self) -> &PaneId {
        &self.active_pane
    }

    /// Moves focus to `pane_id`. Returns false if it already had focus.
    pub fn focus(&mut self, pane_id: &PaneId) -> bool {
        if &self.active_pane == pane_id {
            return false;
        }
        tracing::trace!(from = %self.active_pane, to = %pane_id, "Focus moved");
        self.active_pane = pane_id.clone();
        true
    }

    /// Resets focus after `removed` left the layout, if it was focused.
    ///
    /// Focus goes to the root pane, or to the first leaf when the layout
    /// has no root leaf.
    pub fn on_pane_removed(&mut self, removed: &PaneId, layout: &LayoutNode) {
        if &self.active_pane != removed {
            return;
        }
        let root = PaneId::root();
        self.active_pane = if layout.contains_pane(&root) {
            root
        } else {
            layout.first_pane().clone()
        };
        tracing::debug!(removed = %removed, focus = %self.active_pane, "Focused pane removed");
    }

    /// Reports an activated tab to the selection sink.
    ///
    /// Only resource-bearing tabs (editor, binary, image) are reported.
    /// Returns true if the sink was called.
    pub fn notify_activation(&self, tab: &Tab) -> bool {
        if !tab.view_type.is_resource() {
            return false;
        }
        let Some(sink) = &self.selection else {
            return false;
        };
        sink.on_tab_select(&tab.path);
        true
    }
}
