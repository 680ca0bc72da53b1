//! Property-based tests for snapshot persistence
//!
//! Encoded snapshots must decode to the same workspace (dirty flags aside)
//! and legacy path lists must migrate with the documented active-tab rule.

use paneweave_core::persist::migrate_legacy;
use paneweave_core::{
    LayoutNode, OpenRequest, PaneId, PaneRegistry, PaneState, SplitDirection, Tab, TabFactory,
    TabId, ViewType, WorkspaceSnapshot, decode_snapshot, encode_snapshot,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

// ============================================================================
// Test Strategies
// ============================================================================

const PATHS: &[&str] = &[
    "/home/user/notes.md",
    "/srv/data.bin",
    "/tmp/a",
    "/tmp/b/",
    "relative.txt",
    "terminal:main",
];

const VIEW_TYPES: &[ViewType] = &[
    ViewType::Editor,
    ViewType::Binary,
    ViewType::Image,
    ViewType::Directory,
];

fn tab_strategy() -> impl Strategy<Value = Tab> {
    (
        0..PATHS.len(),
        prop::option::of(0..VIEW_TYPES.len()),
        prop::option::of("[a-z]{1,8}"),
        prop::option::of(prop_oneof![Just("preview"), Just("pinned")]),
        any::<bool>(),
        prop::option::of(0u32..4096),
        any::<bool>(),
    )
        .prop_map(|(path, view_type, label, intent, dirty, size, blank_label)| {
            let mut request = OpenRequest::new(PATHS[path]);
            request.view_type = view_type.map(|index| VIEW_TYPES[index]);
            request.label = label;
            request.intent = intent.map(str::to_owned);
            if let Some(size) = size {
                request = request.with_extra("size", size);
            }
            let mut tab = TabFactory::build(&request, TabId::new(PATHS[path]));
            tab.dirty = dirty;
            // Renaming to "" is allowed and must survive a reload.
            if blank_label {
                tab.label.clear();
            }
            tab
        })
}

fn pane_strategy() -> impl Strategy<Value = PaneState> {
    (prop::collection::vec(tab_strategy(), 0..5), any::<prop::sample::Index>()).prop_map(
        |(tabs, active)| {
            let mut pane = PaneState::new();
            for tab in tabs {
                if !pane.contains(&tab.id) {
                    pane.push(tab);
                }
            }
            if !pane.is_empty() {
                let id = pane.tabs()[active.index(pane.len())].id.clone();
                pane.set_active(&id);
            }
            pane
        },
    )
}

/// A layout grown by splits and resized, with every leaf registered.
fn snapshot_strategy() -> impl Strategy<Value = WorkspaceSnapshot> {
    prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 0..6)
        .prop_flat_map(|splits| {
            let mut layout = LayoutNode::default();
            for (n, (target, vertical)) in splits.into_iter().enumerate() {
                let leaves = layout.pane_ids();
                let target = leaves[target.index(leaves.len())].clone();
                let direction = if vertical {
                    SplitDirection::Vertical
                } else {
                    SplitDirection::Horizontal
                };
                let fresh = PaneId::numbered(n as u64 + 1);
                if let Some(next) = layout.split_pane(&target, direction, &fresh) {
                    layout = next;
                }
            }
            let count = layout.leaf_count();
            let branches = layout.branch_refs().len();
            (
                Just(layout),
                prop::collection::vec(10.0f64..=90.0, branches),
                prop::collection::vec(pane_strategy(), count),
                any::<prop::sample::Index>(),
            )
        })
        .prop_map(|(mut layout, sizes, panes, active)| {
            for (branch, size) in layout.branch_refs().into_iter().zip(sizes) {
                if let Some(next) = layout.resize(&branch, size) {
                    layout = next;
                }
            }
            let leaves = layout.pane_ids();
            let registry: BTreeMap<PaneId, PaneState> =
                leaves.iter().cloned().zip(panes).collect();
            WorkspaceSnapshot {
                panes: PaneRegistry::from_panes(registry),
                active_pane_id: leaves[active.index(leaves.len())].clone(),
                layout,
            }
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Decoding an encoded snapshot gives it back without dirty flags.
    #[test]
    fn prop_snapshot_round_trip(snapshot in snapshot_strategy()) {
        let blob = encode_snapshot(&snapshot).unwrap();
        let decoded = decode_snapshot(&blob).unwrap();

        prop_assert!(!decoded.needs_rewrite(), "clean blob reported damage: {:?}", decoded);
        prop_assert_eq!(&decoded.snapshot.layout, &snapshot.layout);
        prop_assert_eq!(&decoded.snapshot.active_pane_id, &snapshot.active_pane_id);
        prop_assert_eq!(&decoded.snapshot.panes, &snapshot.panes.persisted());
    }

    /// The stored form never carries a dirty flag.
    #[test]
    fn prop_encoded_blob_has_no_dirty_field(snapshot in snapshot_strategy()) {
        let blob = encode_snapshot(&snapshot).unwrap();
        prop_assert!(!blob.contains("\"dirty\""));
    }

    /// Legacy paths become tabs in order, one per distinct path.
    #[test]
    fn prop_legacy_migration_keeps_order(
        files in prop::collection::vec(prop::sample::select(PATHS), 0..8),
    ) {
        let files: Vec<String> = files.into_iter().map(str::to_owned).collect();
        let pane = migrate_legacy(&files, None);

        let mut expected: Vec<&str> = Vec::new();
        for file in &files {
            if !expected.contains(&file.as_str()) {
                expected.push(file);
            }
        }
        let paths: Vec<&str> = pane.tabs().iter().map(|tab| tab.path.as_str()).collect();
        prop_assert_eq!(paths, expected);
        prop_assert!(pane.tabs().iter().all(|tab| tab.id.as_str() == tab.path));
    }

    /// The active tab is the stored active path, or the last tab otherwise.
    #[test]
    fn prop_legacy_active_tab_rule(
        files in prop::collection::vec(prop::sample::select(PATHS), 0..8),
        active in prop::option::of(prop::sample::select(PATHS)),
    ) {
        let files: Vec<String> = files.into_iter().map(str::to_owned).collect();
        let pane = migrate_legacy(&files, active);

        let expected = match active {
            Some(active) if files.iter().any(|file| file == active) => TabId::new(active),
            _ => pane.tabs().last().map(|tab| tab.id.clone()).unwrap_or_default(),
        };
        prop_assert_eq!(pane.active_tab_id(), &expected);
    }
}
