use crate::layout::{LayoutError, LayoutNode, LayoutResult, PaneId, PruneResult, TabId};
use crate::pane::PaneRegistry;

use super::CloseOutcome;

/// Removes a pane from the layout and the registry.
///
/// The root pane and the last remaining leaf are never removed; both give
/// `CloseOutcome::Noop`.
///
/// # Errors
///
/// Returns `LayoutError::PaneNotFound` if the layout has no such leaf.
pub fn apply_pane_close(
    layout: &mut LayoutNode,
    panes: &mut PaneRegistry,
    pane_id: &PaneId,
) -> LayoutResult<CloseOutcome> {
    if pane_id.is_root() {
        return Ok(CloseOutcome::Noop);
    }
    match layout.prune(pane_id) {
        PruneResult::NotFound => Err(LayoutError::PaneNotFound(pane_id.clone())),
        PruneResult::RemovedSelf => Ok(CloseOutcome::Noop),
        PruneResult::Pruned(tree) => {
            *layout = tree;
            panes.remove(pane_id);
            Ok(CloseOutcome::Applied {
                pruned_pane: Some(pane_id.clone()),
            })
        }
    }
}

/// Removes one tab, collapsing its pane if it was the pane's only tab.
///
/// # Errors
///
/// Returns an error if the pane or the tab does not exist.
pub fn apply_tab_close(
    layout: &mut LayoutNode,
    panes: &mut PaneRegistry,
    pane_id: &PaneId,
    tab_id: &TabId,
) -> LayoutResult<CloseOutcome> {
    let pane = panes
        .get(pane_id)
        .ok_or_else(|| LayoutError::PaneNotFound(pane_id.clone()))?;
    if !pane.contains(tab_id) {
        return Err(LayoutError::TabNotFound(tab_id.clone()));
    }

    if pane.len() == 1 {
        let outcome = apply_pane_close(layout, panes, pane_id)?;
        if outcome.is_applied() {
            return Ok(outcome);
        }
    }

    let pane = panes
        .get_mut(pane_id)
        .ok_or_else(|| LayoutError::PaneNotFound(pane_id.clone()))?;
    pane.remove(tab_id);
    Ok(CloseOutcome::Applied { pruned_pane: None })
}
