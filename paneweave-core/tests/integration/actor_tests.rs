//! Integration tests for the workspace actor
//!
//! Several tasks share one [`WorkspaceHandle`]; commands are applied one at
//! a time, so concurrent callers always observe a consistent workspace.

use std::sync::Arc;

use paneweave_core::{
    AutoConfirm, Collaborators, EngineSettings, MemoryStore, OpenRequest, PaneId, SessionId,
    SessionStore, SplitDirection, Workspace, WorkspaceError, decode_snapshot, spawn_workspace,
};

/// Tests that concurrent opens from many tasks all land
#[tokio::test]
async fn concurrent_commands_are_serialized() {
    let workspace = Workspace::new(Collaborators::default(), &EngineSettings::default());
    let (handle, task) = spawn_workspace(workspace);

    let mut joins = Vec::new();
    for i in 0..8 {
        let handle = handle.clone();
        joins.push(tokio::spawn(async move {
            handle.open(OpenRequest::new(format!("/file-{i}.txt"))).await
        }));
    }
    for join in joins {
        join.await.expect("Task panicked").unwrap();
    }

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.panes.tab_count(), 8);

    drop(handle);
    let workspace = task.await.expect("Workspace task panicked");
    assert_eq!(workspace.panes().tab_count(), 8);
}

/// Tests a split and close cycle through the handle, with persistence
#[tokio::test]
async fn handle_drives_bound_workspace() {
    let session = SessionId::new("actor");
    let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::new());
    let workspace = Workspace::restore(
        session.clone(),
        Arc::clone(&store),
        Collaborators::new(Arc::new(AutoConfirm::accept())),
        &EngineSettings::default(),
    );
    let (handle, _task) = spawn_workspace(workspace);

    let tab = handle.open(OpenRequest::new("/x.txt")).await.unwrap();
    let pane = handle
        .split(PaneId::root(), SplitDirection::Vertical, Some(tab.clone()))
        .await
        .unwrap();
    handle.on_unsaved_change("/x.txt", true).await.unwrap();

    let outcome = handle.close_pane(pane.clone()).await.unwrap();
    assert!(outcome.is_applied());
    handle.flush().await.unwrap();

    let blob = store.read(&session).unwrap().unwrap();
    let stored = decode_snapshot(&blob).unwrap().snapshot;
    assert_eq!(stored.panes.len(), 1);
    assert_eq!(stored.active_pane_id, PaneId::root());
    assert!(stored.panes.get(&PaneId::root()).unwrap().contains(&tab));
}

/// Tests that layout errors reach the caller unchanged
#[tokio::test]
async fn handle_reports_layout_errors() {
    let workspace = Workspace::new(Collaborators::default(), &EngineSettings::default());
    let (handle, _task) = spawn_workspace(workspace);

    let error = handle
        .split(PaneId::new("pane-9"), SplitDirection::Horizontal, None)
        .await
        .unwrap_err();
    assert!(matches!(error, WorkspaceError::Layout(_)));
    assert!(error.to_string().contains("pane-9"));
}
