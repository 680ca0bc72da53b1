//! Integration tests for session persistence
//!
//! A workspace bound to a session writes its snapshot after every accepted
//! mutation; restoring the same session from the same store must give the
//! same workspace back.

use std::sync::Arc;

use paneweave_core::{
    Collaborators, EngineSettings, FileStore, LayoutNode, MemoryStore, OpenRequest, PaneId,
    SessionId, SessionStore, SplitDirection, TabId, ViewType, Workspace, decode_snapshot,
};
use tempfile::TempDir;

fn restore(session: &SessionId, store: &Arc<dyn SessionStore>) -> Workspace {
    Workspace::restore(
        session.clone(),
        Arc::clone(store),
        Collaborators::default(),
        &EngineSettings::default(),
    )
}

// ========== Round Trip Tests ==========

/// Tests that a workspace survives a restart through the file store
#[test]
fn file_store_round_trip_restores_workspace() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store: Arc<dyn SessionStore> = Arc::new(FileStore::new(temp_dir.path()));
    let session = SessionId::new("default");

    let before = {
        let mut workspace = restore(&session, &store);
        workspace.open(OpenRequest::new("/src/main.rs")).unwrap();
        workspace.open(OpenRequest::new("terminal:1")).unwrap();
        let pane = workspace
            .split(&PaneId::root(), SplitDirection::Horizontal, None)
            .unwrap();
        workspace
            .open(OpenRequest::new("/docs").with_view_type(ViewType::Directory).in_pane(pane))
            .unwrap();
        workspace.on_unsaved_change("/src/main.rs", true);
        workspace.snapshot()
    };

    assert!(temp_dir.path().join("default.json").exists());

    let restored = restore(&session, &store);
    assert_eq!(restored.layout(), &before.layout);
    assert_eq!(restored.active_pane_id(), &before.active_pane_id);
    assert_eq!(restored.panes(), &before.panes.persisted());
    assert!(!restored.is_dirty("/src/main.rs"));
}

/// Tests that sessions are isolated from each other
#[test]
fn sessions_do_not_share_state() {
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
    let work = SessionId::new("work");
    let home = SessionId::new("home");

    let mut workspace = restore(&work, &store);
    workspace.open(OpenRequest::new("/report.md")).unwrap();

    let other = restore(&home, &store);
    assert_eq!(other.panes().tab_count(), 0);
    assert_eq!(store.list().unwrap(), vec![work.clone()]);

    let again = restore(&work, &store);
    assert!(again.find_tab(&TabId::new("/report.md")).is_some());
}

/// Tests that an unbound workspace never writes
#[test]
fn unbound_workspace_is_not_persisted() {
    let mut workspace = Workspace::new(Collaborators::default(), &EngineSettings::default());
    workspace.open(OpenRequest::new("/a")).unwrap();
    assert!(workspace.session().is_none());
}

/// Tests that a corrupt blob restores an empty workspace
#[test]
fn corrupt_blob_restores_empty_root() {
    let session = SessionId::new("broken");
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::with_blob(&session, "{not json"));

    let workspace = restore(&session, &store);
    assert_eq!(workspace.layout(), &LayoutNode::default());
    assert_eq!(workspace.panes().tab_count(), 0);
    assert_eq!(workspace.active_pane_id(), &PaneId::root());
}

// ========== Legacy Migration Tests ==========

const LEGACY_BLOB: &str = r#"{
    "panes": {
        "root": {"files": ["/a", "/b"], "activeFile": "/b"},
        "pane-3": {"files": ["/c", "logs:app"], "activeFile": "/gone"}
    },
    "layout": {
        "type": "branch",
        "direction": "vertical",
        "size": 40,
        "children": [
            {"type": "leaf", "paneId": "root"},
            {"type": "leaf", "paneId": "pane-3"}
        ]
    },
    "activePaneId": "pane-3"
}"#;

/// Tests that legacy panes migrate on restore
#[test]
fn legacy_session_migrates_on_restore() {
    let session = SessionId::new("legacy");
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::with_blob(&session, LEGACY_BLOB));

    let workspace = restore(&session, &store);

    let root = workspace.pane(&PaneId::root()).unwrap();
    let ids: Vec<&str> = root.tabs().iter().map(|tab| tab.id.as_str()).collect();
    assert_eq!(ids, vec!["/a", "/b"]);
    assert_eq!(root.active_tab_id(), &TabId::new("/b"));

    let other = workspace.pane(&PaneId::new("pane-3")).unwrap();
    assert_eq!(other.active_tab_id(), &TabId::new("logs:app"));
    assert_eq!(other.tabs()[1].view_type, ViewType::Logs);
    assert_eq!(other.tabs()[1].label, "Logs");

    assert_eq!(workspace.active_pane_id(), &PaneId::new("pane-3"));
}

/// Tests that the migrated form is written on the first mutation
#[test]
fn migrated_session_is_rewritten_on_first_change() {
    let session = SessionId::new("legacy");
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::with_blob(&session, LEGACY_BLOB));

    let mut workspace = restore(&session, &store);
    assert!(store.read(&session).unwrap().unwrap().contains("\"files\""));

    workspace.activate(&PaneId::root(), &TabId::new("/a")).unwrap();

    let blob = store.read(&session).unwrap().unwrap();
    assert!(!blob.contains("\"files\""));
    let decoded = decode_snapshot(&blob).unwrap();
    assert!(!decoded.needs_rewrite());
    assert_eq!(decoded.snapshot.active_pane_id, PaneId::root());
}

/// Tests that new panes never reuse a restored pane number
#[test]
fn restored_workspace_continues_pane_numbering() {
    let session = SessionId::new("legacy");
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::with_blob(&session, LEGACY_BLOB));

    let mut workspace = restore(&session, &store);
    let pane = workspace
        .split(&PaneId::root(), SplitDirection::Horizontal, None)
        .unwrap();
    assert_eq!(pane, PaneId::numbered(4));
}
