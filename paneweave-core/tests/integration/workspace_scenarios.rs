//! Integration tests for workspace behavior with host collaborators
//!
//! These tests plug prompt, busy probe, metadata and selection
//! implementations into a workspace the way a host would.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use paneweave_core::{
    BusyCheckPolicy, BusyProbe, CloseOutcome, CloseStage, Collaborators, ConfirmPrompt,
    ConfirmRequest, EngineSettings, LayoutNode, Metadata, MetadataProvider, OpenRequest, PaneId,
    ProbeError, SelectionSink, SplitDirection, TabId, ViewType, Workspace,
};

// ========== Test Collaborators ==========

/// Prompt that records questions and answers from a fixed script
struct ScriptedPrompt {
    answers: Mutex<Vec<bool>>,
    asked: Mutex<Vec<ConfirmRequest>>,
}

impl ScriptedPrompt {
    fn new(answers: &[bool]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().rev().copied().collect()),
            asked: Mutex::new(Vec::new()),
        })
    }

    fn asked(&self) -> Vec<ConfirmRequest> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmPrompt for ScriptedPrompt {
    async fn confirm(&self, request: &ConfirmRequest) -> bool {
        self.asked.lock().unwrap().push(request.clone());
        self.answers.lock().unwrap().pop().unwrap_or(false)
    }
}

/// Busy probe with a fixed answer
enum TerminalState {
    Busy,
    Idle,
    Unreachable,
}

#[async_trait]
impl BusyProbe for TerminalState {
    async fn is_busy(&self, _tab_id: &TabId) -> Result<bool, ProbeError> {
        match self {
            Self::Busy => Ok(true),
            Self::Idle => Ok(false),
            Self::Unreachable => Err(ProbeError::Failed("connection refused".to_owned())),
        }
    }
}

/// Metadata provider that counts calls
#[derive(Default)]
struct CountingProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl MetadataProvider for CountingProvider {
    async fn stat(&self, path: &str) -> Result<Metadata, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Metadata {
            size: Some(path.len() as u64),
            ..Metadata::default()
        })
    }
}

/// Selection sink that records paths
#[derive(Default)]
struct RecordingSink {
    selected: Mutex<Vec<String>>,
}

impl SelectionSink for RecordingSink {
    fn on_tab_select(&self, path: &str) {
        self.selected.lock().unwrap().push(path.to_owned());
    }
}

fn workspace_with(collaborators: Collaborators) -> Workspace {
    Workspace::new(collaborators, &EngineSettings::default())
}

// ========== Layout Scenarios ==========

/// Tests splitting a pane seeded with an open file
#[test]
fn split_clones_target_tab_into_new_pane() {
    let mut workspace = workspace_with(Collaborators::default());
    let tab = workspace.open(OpenRequest::new("/x.txt")).unwrap();

    let pane = workspace
        .split(&PaneId::root(), SplitDirection::Vertical, Some(&tab))
        .unwrap();

    let expected = LayoutNode::branch(
        SplitDirection::Vertical,
        LayoutNode::leaf(PaneId::root()),
        LayoutNode::leaf(pane.clone()),
    );
    assert_eq!(workspace.layout(), &expected);
    assert_eq!(workspace.active_pane_id(), &pane);

    let copy = workspace.pane(&pane).unwrap();
    assert_eq!(copy.len(), 1);
    assert_eq!(copy.active_tab_id(), &tab);
    assert_eq!(copy.tabs()[0].view_type, ViewType::Editor);
    assert_eq!(workspace.pane(&PaneId::root()).unwrap().len(), 1);
}

/// Tests that a singleton view type keeps one tab across panes
#[test]
fn singleton_view_follows_latest_path() {
    let mut workspace = workspace_with(Collaborators::default());
    let first = workspace
        .open(OpenRequest::new("/a").with_view_type(ViewType::Directory))
        .unwrap();
    let pane = workspace
        .split(&PaneId::root(), SplitDirection::Horizontal, None)
        .unwrap();
    let second = workspace
        .open(
            OpenRequest::new("/b")
                .with_view_type(ViewType::Directory)
                .in_pane(pane),
        )
        .unwrap();

    assert_eq!(first, second);
    let directories = workspace.tabs_of_view_type(ViewType::Directory);
    assert_eq!(directories.len(), 1);
    assert_eq!(directories[0].1.path, "/b");
    assert_eq!(workspace.active_pane_id(), &PaneId::root());
}

/// Tests that closing the last tab of a split pane removes the pane
#[test]
fn closing_last_tab_collapses_split() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let mut workspace = workspace_with(Collaborators::default());
        let tab = workspace.open(OpenRequest::new("/notes.md")).unwrap();
        let pane = workspace
            .split(&PaneId::root(), SplitDirection::Vertical, Some(&tab))
            .unwrap();

        let outcome = workspace.close_tab(&pane, &tab).await.unwrap();
        assert_eq!(
            outcome,
            CloseOutcome::Applied {
                pruned_pane: Some(pane.clone())
            }
        );
        assert_eq!(workspace.layout(), &LayoutNode::default());
        assert!(workspace.pane(&pane).is_none());
        assert_eq!(workspace.active_pane_id(), &PaneId::root());

        let outcome = workspace.close_tab(&PaneId::root(), &tab).await.unwrap();
        assert_eq!(outcome, CloseOutcome::Applied { pruned_pane: None });
        assert!(workspace.pane(&PaneId::root()).unwrap().is_empty());
    });
}

// ========== Close Pipeline Scenarios ==========

/// Tests that a declined discard leaves the pane untouched
#[test]
fn declined_discard_keeps_dirty_tab() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let prompt = ScriptedPrompt::new(&[false, true]);
        let mut workspace = workspace_with(Collaborators::new(prompt.clone()));
        workspace.open(OpenRequest::new("/a")).unwrap();
        let tab = workspace.open(OpenRequest::new("/b")).unwrap();
        workspace.on_unsaved_change("/b", true);
        let before = workspace.pane(&PaneId::root()).unwrap().clone();

        let outcome = workspace.close_tab(&PaneId::root(), &tab).await.unwrap();
        assert_eq!(
            outcome,
            CloseOutcome::Cancelled {
                stage: CloseStage::DirtyCheck
            }
        );
        assert_eq!(workspace.pane(&PaneId::root()).unwrap(), &before);
        assert!(workspace.is_dirty("/b"));

        let outcome = workspace.close_tab(&PaneId::root(), &tab).await.unwrap();
        assert!(outcome.is_applied());
        assert!(!workspace.is_dirty("/b"));
        assert_eq!(
            workspace.pane(&PaneId::root()).unwrap().active_tab_id(),
            &TabId::new("/a")
        );

        let asked = prompt.asked();
        assert_eq!(asked.len(), 2);
        assert!(matches!(
            &asked[0],
            ConfirmRequest::DiscardChanges { path, .. } if path == "/b"
        ));
    });
}

/// Tests that a busy terminal asks before closing
#[test]
fn busy_terminal_requires_confirmation() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let prompt = ScriptedPrompt::new(&[false]);
        let mut workspace = workspace_with(
            Collaborators::new(prompt.clone()).with_busy_probe(Arc::new(TerminalState::Busy)),
        );
        let tab = workspace.open(OpenRequest::new("terminal:build")).unwrap();

        let outcome = workspace.close_tab(&PaneId::root(), &tab).await.unwrap();
        assert_eq!(
            outcome,
            CloseOutcome::Cancelled {
                stage: CloseStage::BusyCheck
            }
        );
        assert!(matches!(
            prompt.asked().as_slice(),
            [ConfirmRequest::CloseBusy { label, .. }] if label == "Terminal"
        ));
    });
}

/// Tests that an idle terminal closes without a prompt
#[test]
fn idle_terminal_closes_silently() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let prompt = ScriptedPrompt::new(&[]);
        let mut workspace = workspace_with(
            Collaborators::new(prompt.clone()).with_busy_probe(Arc::new(TerminalState::Idle)),
        );
        let tab = workspace.open(OpenRequest::new("terminal:1")).unwrap();

        let outcome = workspace.close_tab(&PaneId::root(), &tab).await.unwrap();
        assert!(outcome.is_applied());
        assert!(prompt.asked().is_empty());
    });
}

/// Tests both readings of an unreachable busy probe
#[test]
fn probe_failure_follows_policy() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        for (policy, closes) in [
            (BusyCheckPolicy::FailOpen, true),
            (BusyCheckPolicy::FailClosed, false),
        ] {
            let settings = EngineSettings {
                busy_check_policy: policy,
                busy_check_timeout_ms: 100,
                ..EngineSettings::default()
            };
            let collaborators = Collaborators::new(ScriptedPrompt::new(&[]))
                .with_busy_probe(Arc::new(TerminalState::Unreachable));
            let mut workspace = Workspace::new(collaborators, &settings);
            let tab = workspace.open(OpenRequest::new("terminal:1")).unwrap();

            let outcome = workspace.close_tab(&PaneId::root(), &tab).await.unwrap();
            assert_eq!(outcome.is_applied(), closes, "policy {policy:?}");
        }
    });
}

/// Tests that closing a pane asks once per dirty tab
#[test]
fn close_pane_gates_every_tab() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let prompt = ScriptedPrompt::new(&[true, false]);
        let mut workspace = workspace_with(Collaborators::new(prompt.clone()));
        let pane = workspace
            .split(&PaneId::root(), SplitDirection::Horizontal, None)
            .unwrap();
        workspace.open(OpenRequest::new("/one")).unwrap();
        workspace.open(OpenRequest::new("/two")).unwrap();
        workspace.on_unsaved_change("/one", true);
        workspace.on_unsaved_change("/two", true);

        let outcome = workspace.close_pane(&pane).await.unwrap();
        assert_eq!(
            outcome,
            CloseOutcome::Cancelled {
                stage: CloseStage::DirtyCheck
            }
        );
        assert_eq!(prompt.asked().len(), 2);
        assert_eq!(workspace.pane(&pane).unwrap().len(), 2);
        assert!(workspace.is_dirty("/one"));
    });
}

// ========== Collaborator Scenarios ==========

/// Tests that opening a file fetches its metadata in the background
#[test]
fn open_enriches_resource_metadata() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let provider = Arc::new(CountingProvider::default());
        let mut workspace = workspace_with(
            Collaborators::default().with_metadata_provider(provider.clone()),
        );
        workspace.open(OpenRequest::new("/data/file.csv")).unwrap();
        workspace.open(OpenRequest::new("terminal:1")).unwrap();

        tokio::time::timeout(Duration::from_secs(5), workspace.metadata_cache().wait_idle())
            .await
            .expect("enrichment did not finish");

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(workspace.metadata("/data/file.csv").unwrap().size, Some(14));
        assert!(workspace.metadata("terminal:1").is_none());
    });
}

/// Tests that cached metadata goes away with the last tab showing a path
#[test]
fn closing_last_view_of_a_path_forgets_metadata() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        let provider = Arc::new(CountingProvider::default());
        let mut workspace =
            workspace_with(Collaborators::default().with_metadata_provider(provider));
        let a = workspace.open(OpenRequest::new("/data/a.csv")).unwrap();
        workspace.open(OpenRequest::new("/data/b.csv")).unwrap();
        let pane = workspace
            .split(&PaneId::root(), SplitDirection::Vertical, Some(&a))
            .unwrap();
        tokio::time::timeout(Duration::from_secs(5), workspace.metadata_cache().wait_idle())
            .await
            .expect("enrichment did not finish");
        assert_eq!(workspace.metadata_cache().len(), 2);

        // The root pane still shows /data/a.csv.
        assert!(workspace.close_pane(&pane).await.unwrap().is_applied());
        assert!(workspace.metadata("/data/a.csv").is_some());

        let outcome = workspace.close_tab(&PaneId::root(), &a).await.unwrap();
        assert!(outcome.is_applied());
        assert!(workspace.metadata("/data/a.csv").is_none());
        assert!(workspace.metadata("/data/b.csv").is_some());
        assert_eq!(workspace.metadata_cache().len(), 1);
    });
}

/// Tests that the selection sink follows resource tabs only
#[test]
fn selection_sink_sees_resource_tabs() {
    let sink = Arc::new(RecordingSink::default());
    let mut workspace = workspace_with(Collaborators::default().with_selection_sink(sink.clone()));

    let readme = workspace.open(OpenRequest::new("/README.md")).unwrap();
    workspace.open(OpenRequest::new("logs:app")).unwrap();
    workspace.activate(&PaneId::root(), &readme).unwrap();

    assert_eq!(
        *sink.selected.lock().unwrap(),
        vec!["/README.md".to_owned(), "/README.md".to_owned()]
    );
}
