//! Property-based tests for workspace invariants
//!
//! Random sequences of splits, opens, activations and closes are applied to
//! a workspace; after every step the tree and the registry must agree, the
//! focused pane must exist, active tabs must be valid and no singleton view
//! type may appear twice.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::executor::block_on;
use paneweave_core::{
    AutoConfirm, Collaborators, EngineSettings, LayoutNode, OpenRequest, PaneId, SplitDirection,
    TabId, ViewType, Workspace,
};
use proptest::prelude::*;

// ============================================================================
// Test Strategies
// ============================================================================

const PATHS: &[&str] = &["/a", "/b", "/c.txt", "/srv/data.bin", "terminal:1", "logs:app"];

#[derive(Debug, Clone)]
enum Op {
    Split { pane: usize, vertical: bool, seed: bool },
    Open { pane: usize, path: usize, directory: bool },
    Activate { pane: usize, tab: usize },
    CloseTab { pane: usize, tab: usize },
    ClosePane { pane: usize },
    Dirty { path: usize, dirty: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => (0usize..8, any::<bool>(), any::<bool>())
            .prop_map(|(pane, vertical, seed)| Op::Split { pane, vertical, seed }),
        4 => (0usize..8, 0..PATHS.len(), prop::bool::weighted(0.2))
            .prop_map(|(pane, path, directory)| Op::Open { pane, path, directory }),
        1 => (0usize..8, 0usize..8).prop_map(|(pane, tab)| Op::Activate { pane, tab }),
        2 => (0usize..8, 0usize..8).prop_map(|(pane, tab)| Op::CloseTab { pane, tab }),
        1 => (0usize..8).prop_map(|pane| Op::ClosePane { pane }),
        1 => (0..PATHS.len(), any::<bool>()).prop_map(|(path, dirty)| Op::Dirty { path, dirty }),
    ]
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 0..40)
}

fn new_workspace(accept: bool) -> Workspace {
    let confirm = if accept {
        AutoConfirm::accept()
    } else {
        AutoConfirm::decline()
    };
    Workspace::new(Collaborators::new(Arc::new(confirm)), &EngineSettings::default())
}

const fn split_direction(vertical: bool) -> SplitDirection {
    if vertical {
        SplitDirection::Vertical
    } else {
        SplitDirection::Horizontal
    }
}

fn pick_pane(ws: &Workspace, index: usize) -> PaneId {
    let panes = ws.pane_ids();
    panes[index % panes.len()].clone()
}

fn pick_tab(ws: &Workspace, pane: &PaneId, index: usize) -> Option<TabId> {
    let tabs = ws.pane(pane)?.tabs();
    (!tabs.is_empty()).then(|| tabs[index % tabs.len()].id.clone())
}

fn apply(ws: &mut Workspace, op: &Op) {
    match op {
        Op::Split {
            pane,
            vertical,
            seed,
        } => {
            let pane = pick_pane(ws, *pane);
            let direction = split_direction(*vertical);
            let target = if *seed { pick_tab(ws, &pane, 0) } else { None };
            let _ = ws.split(&pane, direction, target.as_ref());
        }
        Op::Open {
            pane,
            path,
            directory,
        } => {
            let mut request = OpenRequest::new(PATHS[*path]).in_pane(pick_pane(ws, *pane));
            if *directory {
                request = request.with_view_type(ViewType::Directory);
            }
            let _ = ws.open(request);
        }
        Op::Activate { pane, tab } => {
            let pane = pick_pane(ws, *pane);
            if let Some(tab) = pick_tab(ws, &pane, *tab) {
                let _ = ws.activate(&pane, &tab);
            }
        }
        Op::CloseTab { pane, tab } => {
            let pane = pick_pane(ws, *pane);
            if let Some(tab) = pick_tab(ws, &pane, *tab) {
                let _ = block_on(ws.close_tab(&pane, &tab));
            }
        }
        Op::ClosePane { pane } => {
            let pane = pick_pane(ws, *pane);
            let _ = block_on(ws.close_pane(&pane));
        }
        Op::Dirty { path, dirty } => ws.on_unsaved_change(PATHS[*path], *dirty),
    }
}

fn check_invariants(ws: &Workspace) -> Result<(), TestCaseError> {
    let leaves: BTreeSet<PaneId> = ws.pane_ids().into_iter().collect();
    let registered: BTreeSet<PaneId> = ws.panes().ids().cloned().collect();
    prop_assert_eq!(&leaves, &registered, "tree and registry disagree");
    prop_assert!(ws.layout().has_unique_leaves());
    prop_assert!(leaves.contains(&PaneId::root()), "root pane vanished");
    prop_assert!(leaves.contains(ws.active_pane_id()), "focused pane missing");

    for (pane_id, pane) in ws.panes().iter() {
        let active = pane.active_tab_id();
        prop_assert!(
            active.is_none() || pane.contains(active),
            "pane {} has dangling active tab {}",
            pane_id,
            active
        );
        let ids: BTreeSet<&TabId> = pane.tabs().iter().map(|tab| &tab.id).collect();
        prop_assert_eq!(ids.len(), pane.len(), "duplicate tab in pane {}", pane_id);
    }

    for view_type in ws.singleton_policy().singleton_types() {
        prop_assert!(ws.tabs_of_view_type(view_type).len() <= 1);
    }
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// Tree and registry stay in bijection through any operation sequence.
    #[test]
    fn prop_invariants_hold(ops in ops_strategy(), accept in any::<bool>()) {
        let mut ws = new_workspace(accept);
        for op in &ops {
            apply(&mut ws, op);
            check_invariants(&ws)?;
        }
    }

    /// A split immediately undone by closing the new pane restores the tree.
    #[test]
    fn prop_split_then_close_restores_layout(
        ops in ops_strategy(),
        pane in 0usize..8,
        vertical in any::<bool>(),
    ) {
        let mut ws = new_workspace(true);
        for op in &ops {
            apply(&mut ws, op);
        }
        let before: LayoutNode = ws.layout().clone();
        let registered = ws.panes().len();

        let source = pick_pane(&ws, pane);
        let direction = split_direction(vertical);
        let created = ws.split(&source, direction, None).unwrap();
        let outcome = block_on(ws.close_pane(&created)).unwrap();

        prop_assert!(outcome.is_applied());
        prop_assert_eq!(ws.layout(), &before);
        prop_assert_eq!(ws.panes().len(), registered);
    }

    /// Opening the same non-singleton path twice keeps one tab.
    #[test]
    fn prop_reopen_is_idempotent(ops in ops_strategy(), path in 0usize..3) {
        let mut ws = new_workspace(true);
        for op in &ops {
            apply(&mut ws, op);
        }
        let first = ws.open(OpenRequest::new(PATHS[path])).unwrap();
        let count = ws.panes().tab_count();
        let second = ws.open(OpenRequest::new(PATHS[path])).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(ws.panes().tab_count(), count);
        prop_assert_eq!(ws.active_tab().map(|tab| tab.id.clone()), Some(first));
    }
}
