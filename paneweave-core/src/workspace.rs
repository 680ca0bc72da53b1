//! The workspace aggregate
//!
//! [`Workspace`] owns the layout tree, the pane registry and the focus, and
//! is the only place they change. Every accepted mutation touches the tree
//! at most once and is followed by a best-effort snapshot write when the
//! workspace is bound to a session.
//!
//! # Example
//!
//! ```
//! use paneweave_core::{Collaborators, EngineSettings, OpenRequest, SplitDirection, Workspace};
//!
//! let mut workspace = Workspace::new(Collaborators::default(), &EngineSettings::default());
//! let tab = workspace.open(OpenRequest::new("/x.txt")).unwrap();
//! let root = workspace.active_pane_id().clone();
//! let pane = workspace.split(&root, SplitDirection::Vertical, Some(&tab)).unwrap();
//!
//! assert_eq!(workspace.active_pane_id(), &pane);
//! assert_eq!(workspace.pane(&pane).unwrap().active_tab_id(), &tab);
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::close::{
    CloseOrchestrator, CloseOutcome, GateVerdict, apply_pane_close, apply_tab_close,
};
use crate::collab::{
    AutoConfirm, BusyProbe, ConfirmPrompt, DirtyMap, Metadata, MetadataProvider, SelectionSink,
};
use crate::config::EngineSettings;
use crate::focus::FocusController;
use crate::layout::{
    BranchRef, LayoutError, LayoutNode, LayoutResult, PaneId, SessionId, SplitDirection, TabId,
};
use crate::metadata::MetadataCache;
use crate::pane::{PaneRegistry, PaneState, Tab};
use crate::persist::{
    SessionStore, SessionWriter, WorkspaceSnapshot, decode_snapshot, encode_snapshot,
};
use crate::tab::{OpenRequest, SingletonPolicy, TabFactory, ViewType};
use crate::tracing::span_names;

/// Host-supplied implementations of the engine's external interfaces.
#[derive(Clone)]
pub struct Collaborators {
    /// Asks the user to confirm destructive closes
    pub confirm: Arc<dyn ConfirmPrompt>,
    /// Reports whether a terminal tab is busy
    pub busy_probe: Option<Arc<dyn BusyProbe>>,
    /// Fetches resource metadata
    pub metadata: Option<Arc<dyn MetadataProvider>>,
    /// Follows the active resource
    pub selection: Option<Arc<dyn SelectionSink>>,
}

impl Collaborators {
    /// Creates collaborators with only a confirmation prompt.
    #[must_use]
    pub fn new(confirm: Arc<dyn ConfirmPrompt>) -> Self {
        Self {
            confirm,
            busy_probe: None,
            metadata: None,
            selection: None,
        }
    }

    /// Sets the busy probe
    #[must_use]
    pub fn with_busy_probe(mut self, probe: Arc<dyn BusyProbe>) -> Self {
        self.busy_probe = Some(probe);
        self
    }

    /// Sets the metadata provider
    #[must_use]
    pub fn with_metadata_provider(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = Some(provider);
        self
    }

    /// Sets the selection sink
    #[must_use]
    pub fn with_selection_sink(mut self, sink: Arc<dyn SelectionSink>) -> Self {
        self.selection = Some(sink);
        self
    }
}

impl Default for Collaborators {
    /// No probes, no sinks, and a prompt that declines every question.
    fn default() -> Self {
        Self::new(Arc::new(AutoConfirm::decline()))
    }
}

/// Split-pane workspace with tabs, gated closes and session persistence.
pub struct Workspace {
    writer: Option<SessionWriter>,
    layout: LayoutNode,
    panes: PaneRegistry,
    focus: FocusController,
    dirty: DirtyMap,
    singletons: SingletonPolicy,
    closer: CloseOrchestrator,
    metadata_provider: Option<Arc<dyn MetadataProvider>>,
    metadata: MetadataCache,
    enrichment_timeout: Duration,
    next_pane: u64,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("session", &self.session())
            .field("layout", &self.layout)
            .field("panes", &self.panes)
            .field("active_pane", self.focus.active_pane())
            .field("closer", &self.closer)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Creates an unbound workspace with one empty root pane.
    ///
    /// Nothing is persisted.
    #[must_use]
    pub fn new(collaborators: Collaborators, settings: &EngineSettings) -> Self {
        Self::assemble(WorkspaceSnapshot::default(), collaborators, settings)
    }

    /// Creates a workspace bound to `session`, restoring what `store` holds.
    ///
    /// Legacy panes are migrated. A missing, unreadable or unparseable blob
    /// yields one empty root pane; the failure is logged, never returned.
    #[must_use]
    pub fn restore(
        session: SessionId,
        store: Arc<dyn SessionStore>,
        collaborators: Collaborators,
        settings: &EngineSettings,
    ) -> Self {
        let snapshot = {
            let _span =
                tracing::info_span!(span_names::RESTORE, session_id = %session).entered();
            load_snapshot(&session, store.as_ref())
        };
        let mut workspace = Self::assemble(snapshot, collaborators, settings);
        workspace.writer = Some(SessionWriter::new(session, store));
        workspace
    }

    /// Creates an unbound workspace from a snapshot, e.g. one decoded by
    /// the caller.
    #[must_use]
    pub fn from_snapshot(
        snapshot: WorkspaceSnapshot,
        collaborators: Collaborators,
        settings: &EngineSettings,
    ) -> Self {
        Self::assemble(snapshot, collaborators, settings)
    }

    fn assemble(
        snapshot: WorkspaceSnapshot,
        collaborators: Collaborators,
        settings: &EngineSettings,
    ) -> Self {
        let next_pane = snapshot
            .layout
            .pane_ids()
            .iter()
            .filter_map(PaneId::sequence)
            .max()
            .map_or(1, |max| max.saturating_add(1));

        let mut closer = CloseOrchestrator::new(collaborators.confirm).with_settings(settings);
        if let Some(probe) = collaborators.busy_probe {
            closer = closer.with_busy_probe(probe);
        }
        let mut focus = FocusController::new(snapshot.active_pane_id);
        if let Some(sink) = collaborators.selection {
            focus = focus.with_selection_sink(sink);
        }

        Self {
            writer: None,
            layout: snapshot.layout,
            panes: snapshot.panes,
            focus,
            dirty: DirtyMap::new(),
            singletons: settings.singleton_policy(),
            closer,
            metadata_provider: collaborators.metadata,
            metadata: MetadataCache::new(),
            enrichment_timeout: settings.enrichment_timeout(),
            next_pane,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the bound session, if any
    #[must_use]
    pub fn session(&self) -> Option<&SessionId> {
        self.writer.as_ref().map(SessionWriter::session)
    }

    /// Returns the layout tree
    #[must_use]
    pub const fn layout(&self) -> &LayoutNode {
        &self.layout
    }

    /// Returns the pane registry
    #[must_use]
    pub const fn panes(&self) -> &PaneRegistry {
        &self.panes
    }

    /// Returns the focused pane
    #[must_use]
    pub const fn active_pane_id(&self) -> &PaneId {
        self.focus.active_pane()
    }

    /// Returns the active tab of the focused pane
    #[must_use]
    pub fn active_tab(&self) -> Option<&Tab> {
        self.panes.get(self.focus.active_pane())?.active_tab()
    }

    /// Returns a pane's state
    #[must_use]
    pub fn pane(&self, pane_id: &PaneId) -> Option<&PaneState> {
        self.panes.get(pane_id)
    }

    /// Returns pane ids in layout order (first to last leaf)
    #[must_use]
    pub fn pane_ids(&self) -> Vec<PaneId> {
        self.layout.pane_ids()
    }

    /// Finds a tab by id, searching panes in layout order.
    #[must_use]
    pub fn find_tab(&self, tab_id: &TabId) -> Option<(&PaneId, &Tab)> {
        let order = self.layout.pane_ids();
        let owner = self.panes.locate(tab_id, &order)?;
        self.panes
            .iter()
            .find(|(pane_id, _)| *pane_id == owner)
            .and_then(|(pane_id, pane)| pane.tab(tab_id).map(|tab| (pane_id, tab)))
    }

    /// Returns every tab of a view type with its pane.
    #[must_use]
    pub fn tabs_of_view_type(&self, view_type: ViewType) -> Vec<(&PaneId, &Tab)> {
        self.panes.tabs_of_view_type(view_type)
    }

    /// Returns true if `path` has unsaved changes
    #[must_use]
    pub fn is_dirty(&self, path: &str) -> bool {
        self.dirty.is_dirty(path)
    }

    /// Returns the unsaved-change flags
    #[must_use]
    pub const fn dirty_map(&self) -> &DirtyMap {
        &self.dirty
    }

    /// Returns enriched metadata for a path, if a fetch has completed.
    #[must_use]
    pub fn metadata(&self, path: &str) -> Option<Metadata> {
        self.metadata.get(path)
    }

    /// Returns the metadata cache
    #[must_use]
    pub const fn metadata_cache(&self) -> &MetadataCache {
        &self.metadata
    }

    /// Returns the singleton policy in force
    #[must_use]
    pub const fn singleton_policy(&self) -> &SingletonPolicy {
        &self.singletons
    }

    /// Returns the current `{panes, layout, activePaneId}` triple.
    ///
    /// Dirty flags are included; [`encode_snapshot`] strips them.
    #[must_use]
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            panes: self.panes.clone(),
            layout: self.layout.clone(),
            active_pane_id: self.focus.active_pane().clone(),
        }
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Splits `pane_id`, inserting a new pane after it, and focuses the new
    /// pane.
    ///
    /// The new pane starts with a copy of `target_tab` (searched in the
    /// source pane first, then anywhere), or of the source pane's active
    /// tab when no target is given. Singleton tabs are never copied.
    ///
    /// # Errors
    ///
    /// Returns `PaneNotFound` or `TabNotFound`; the workspace is unchanged.
    pub fn split(
        &mut self,
        pane_id: &PaneId,
        direction: SplitDirection,
        target_tab: Option<&TabId>,
    ) -> LayoutResult<PaneId> {
        let _span =
            tracing::debug_span!(span_names::SPLIT, pane_id = %pane_id, %direction).entered();

        let source = self
            .panes
            .get(pane_id)
            .ok_or_else(|| LayoutError::PaneNotFound(pane_id.clone()))?;
        let seed = match target_tab {
            Some(tab_id) => Some(
                source
                    .tab(tab_id)
                    .or_else(|| self.find_tab(tab_id).map(|(_, tab)| tab))
                    .ok_or_else(|| LayoutError::TabNotFound(tab_id.clone()))?,
            ),
            None => source.active_tab(),
        };
        let seed = seed
            .filter(|tab| !self.singletons.is_singleton(tab.view_type))
            .cloned();

        let new_pane = self.free_pane_id();
        self.layout = self
            .layout
            .split_pane(pane_id, direction, &new_pane)
            .ok_or_else(|| LayoutError::PaneNotFound(pane_id.clone()))?;
        self.next_pane = new_pane
            .sequence()
            .map_or(self.next_pane, |seq| seq.saturating_add(1));

        let seeded = seed.as_ref().map(|tab| tab.id.clone());
        self.panes.insert(
            new_pane.clone(),
            seed.map_or_else(PaneState::new, PaneState::with_tab),
        );
        self.focus.focus(&new_pane);

        tracing::debug!(new_pane = %new_pane, seeded = ?seeded, "Pane split");
        self.persist();
        Ok(new_pane)
    }

    /// Returns `pane-<next>`, or the lowest unused number once that id is
    /// taken.
    fn free_pane_id(&self) -> PaneId {
        let candidate = PaneId::numbered(self.next_pane);
        if !self.panes.contains(&candidate) {
            return candidate;
        }
        (1..=u64::MAX)
            .map(PaneId::numbered)
            .find(|pane_id| !self.panes.contains(pane_id))
            .unwrap_or(candidate)
    }

    /// Removes a pane without running the close gates.
    ///
    /// Returns `Ok(false)` for the root pane and for the last leaf, which
    /// are never removed.
    ///
    /// # Errors
    ///
    /// Returns `PaneNotFound` if the pane does not exist.
    pub fn prune(&mut self, pane_id: &PaneId) -> LayoutResult<bool> {
        if !self.panes.contains(pane_id) {
            return Err(LayoutError::PaneNotFound(pane_id.clone()));
        }
        let paths = self.pane_paths(pane_id);
        let outcome = apply_pane_close(&mut self.layout, &mut self.panes, pane_id)?;
        Ok(self.finish_close(outcome, &paths).is_applied())
    }

    /// Sets a branch's size, clamped to the allowed range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRatio` for non-finite sizes and `BranchNotFound` if
    /// no branch matches `branch`.
    pub fn resize(&mut self, branch: &BranchRef, size: f64) -> LayoutResult<()> {
        if !size.is_finite() {
            return Err(LayoutError::InvalidRatio(size));
        }
        self.layout = self
            .layout
            .resize(branch, size)
            .ok_or_else(|| LayoutError::BranchNotFound(branch.clone()))?;
        tracing::debug!(branch = %branch, size, "Branch resized");
        self.persist();
        Ok(())
    }

    // ========================================================================
    // Tabs
    // ========================================================================

    /// Opens a tab and makes it active.
    ///
    /// Singleton view types reuse the existing tab of that type wherever it
    /// is. Otherwise the tab id is the path: re-opening activates the
    /// existing tab, a new path is appended to the target pane (the focused
    /// pane unless the request names one). The owning pane gets focus.
    ///
    /// Resource paths are enriched with metadata in the background.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPath` for an empty path and `PaneNotFound` if the
    /// target pane does not exist.
    pub fn open(&mut self, request: OpenRequest) -> LayoutResult<TabId> {
        let _span = tracing::debug_span!(span_names::OPEN, path = %request.path).entered();

        if request.path.is_empty() {
            return Err(LayoutError::EmptyPath);
        }

        let target = request
            .pane
            .clone()
            .unwrap_or_else(|| self.focus.active_pane().clone());
        if !self.panes.contains(&target) {
            return Err(LayoutError::PaneNotFound(target));
        }

        let view_type = TabFactory::resolve_view_type(&request.path, request.view_type);
        let reused = if self.singletons.is_singleton(view_type) {
            self.reuse_singleton(view_type, &request)
        } else {
            None
        };
        let (owner, tab_id) = match reused {
            Some(found) => found,
            None => self.open_by_path(&target, &request)?,
        };

        if let Some(pane) = self.panes.get_mut(&owner) {
            pane.set_active(&tab_id);
        }
        self.focus.focus(&owner);
        if let Some(tab) = self.panes.get(&owner).and_then(|pane| pane.tab(&tab_id)) {
            self.focus.notify_activation(tab);
        }

        if !TabFactory::is_synthetic(&request.path)
            && let Some(provider) = &self.metadata_provider
        {
            self.metadata.spawn_enrichment(
                Arc::clone(provider),
                request.path.clone(),
                self.enrichment_timeout,
            );
        }

        tracing::debug!(pane_id = %owner, tab_id = %tab_id, %view_type, "Tab opened");
        self.persist();
        Ok(tab_id)
    }

    /// Points the live singleton tab of `view_type` at the request's path.
    fn reuse_singleton(
        &mut self,
        view_type: ViewType,
        request: &OpenRequest,
    ) -> Option<(PaneId, TabId)> {
        let (owner, tab_id) = self
            .panes
            .tabs_of_view_type(view_type)
            .first()
            .map(|(pane_id, tab)| ((*pane_id).clone(), tab.id.clone()))?;
        let dirty = self.dirty.is_dirty(&request.path);
        let tab = self.panes.get_mut(&owner)?.tab_mut(&tab_id)?;
        let previous = std::mem::replace(&mut tab.path, request.path.clone());
        tab.label = TabFactory::resolve_label(&request.path, request.label.as_deref());
        tab.intent.clone_from(&request.intent);
        tab.metadata.clone_from(&request.extra);
        tab.dirty = dirty;
        self.forget_metadata(&[previous]);
        tracing::debug!(pane_id = %owner, tab_id = %tab_id, "Reused singleton tab");
        Some((owner, tab_id))
    }

    /// Finds the tab for the request's path, or appends a new one to
    /// `target`.
    fn open_by_path(
        &mut self,
        target: &PaneId,
        request: &OpenRequest,
    ) -> LayoutResult<(PaneId, TabId)> {
        let tab_id = TabId::new(request.path.as_str());
        let mut order = vec![target.clone()];
        order.extend(self.layout.pane_ids().into_iter().filter(|id| id != target));
        if let Some(owner) = self.panes.locate(&tab_id, &order) {
            return Ok((owner.clone(), tab_id));
        }

        let mut tab = TabFactory::build(request, tab_id.clone());
        tab.dirty = self.dirty.is_dirty(&tab.path);
        self.panes
            .get_mut(target)
            .ok_or_else(|| LayoutError::PaneNotFound(target.clone()))?
            .push(tab);
        Ok((target.clone(), tab_id))
    }

    /// Changes the label, and optionally the view type, of every tab with
    /// this id. Order and active selection are kept.
    ///
    /// # Errors
    ///
    /// Returns `TabNotFound` if no pane holds the tab.
    pub fn rename(
        &mut self,
        tab_id: &TabId,
        label: &str,
        view_type: Option<ViewType>,
    ) -> LayoutResult<usize> {
        let renamed = self.panes.rename(tab_id, label, view_type);
        if renamed == 0 {
            return Err(LayoutError::TabNotFound(tab_id.clone()));
        }
        tracing::debug!(tab_id = %tab_id, label, renamed, "Tab renamed");
        self.persist();
        Ok(renamed)
    }

    /// Makes `tab_id` the active tab of `pane_id` and focuses the pane.
    ///
    /// Resource tabs are reported to the selection sink.
    ///
    /// # Errors
    ///
    /// Returns `PaneNotFound` or `TabNotFound`; the workspace is unchanged.
    pub fn activate(&mut self, pane_id: &PaneId, tab_id: &TabId) -> LayoutResult<()> {
        let pane = self
            .panes
            .get_mut(pane_id)
            .ok_or_else(|| LayoutError::PaneNotFound(pane_id.clone()))?;
        if !pane.set_active(tab_id) {
            return Err(LayoutError::TabNotFound(tab_id.clone()));
        }
        self.focus.focus(pane_id);
        if let Some(tab) = self.panes.get(pane_id).and_then(|pane| pane.tab(tab_id)) {
            self.focus.notify_activation(tab);
        }
        tracing::debug!(pane_id = %pane_id, tab_id = %tab_id, "Tab activated");
        self.persist();
        Ok(())
    }

    /// Records an editor's unsaved-change flag for `path`.
    ///
    /// Dirty flags are never persisted, so nothing is written.
    pub fn on_unsaved_change(&mut self, path: &str, dirty: bool) {
        self.dirty.set(path, dirty);
        let tabs = self.panes.mark_dirty(path, dirty);
        tracing::trace!(path, dirty, tabs, "Unsaved change reported");
    }

    // ========================================================================
    // Close
    // ========================================================================

    /// Closes one tab after the busy and dirty gates.
    ///
    /// The last tab of a non-root pane takes the pane with it. A declined
    /// gate returns `CloseOutcome::Cancelled` with nothing changed.
    ///
    /// # Errors
    ///
    /// Returns `PaneNotFound` or `TabNotFound`.
    pub async fn close_tab(
        &mut self,
        pane_id: &PaneId,
        tab_id: &TabId,
    ) -> LayoutResult<CloseOutcome> {
        let span = tracing::debug_span!(span_names::CLOSE, pane_id = %pane_id, tab_id = %tab_id);
        self.close_tab_gated(pane_id, tab_id).instrument(span).await
    }

    async fn close_tab_gated(
        &mut self,
        pane_id: &PaneId,
        tab_id: &TabId,
    ) -> LayoutResult<CloseOutcome> {
        let tab = self
            .panes
            .get(pane_id)
            .ok_or_else(|| LayoutError::PaneNotFound(pane_id.clone()))?
            .tab(tab_id)
            .ok_or_else(|| LayoutError::TabNotFound(tab_id.clone()))?
            .clone();

        let verdict = self.closer.gate(&tab, &self.dirty).await;
        match verdict {
            GateVerdict::Cancelled(stage) => return Ok(CloseOutcome::Cancelled { stage }),
            GateVerdict::Proceed { discarded } => self.discard_changes(&discarded),
        }

        let outcome = apply_tab_close(&mut self.layout, &mut self.panes, pane_id, tab_id)?;
        Ok(self.finish_close(outcome, &[tab.path]))
    }

    /// Closes a whole pane after running the gates for each of its tabs.
    ///
    /// The root pane and the last leaf give `CloseOutcome::Noop` without
    /// asking anything.
    ///
    /// # Errors
    ///
    /// Returns `PaneNotFound` if the pane does not exist.
    pub async fn close_pane(&mut self, pane_id: &PaneId) -> LayoutResult<CloseOutcome> {
        let span = tracing::debug_span!(span_names::CLOSE, pane_id = %pane_id);
        self.close_pane_gated(pane_id).instrument(span).await
    }

    async fn close_pane_gated(&mut self, pane_id: &PaneId) -> LayoutResult<CloseOutcome> {
        let pane = self
            .panes
            .get(pane_id)
            .ok_or_else(|| LayoutError::PaneNotFound(pane_id.clone()))?;
        if pane_id.is_root() || self.layout.leaf_count() == 1 {
            return Ok(CloseOutcome::Noop);
        }
        let tabs = pane.tabs().to_vec();
        let paths: Vec<String> = tabs.iter().map(|tab| tab.path.clone()).collect();

        let verdict = self.closer.gate_all(&tabs, &self.dirty).await;
        match verdict {
            GateVerdict::Cancelled(stage) => return Ok(CloseOutcome::Cancelled { stage }),
            GateVerdict::Proceed { discarded } => self.discard_changes(&discarded),
        }

        let outcome = apply_pane_close(&mut self.layout, &mut self.panes, pane_id)?;
        Ok(self.finish_close(outcome, &paths))
    }

    fn discard_changes(&mut self, paths: &[String]) {
        for path in paths {
            self.dirty.clear(path);
            self.panes.mark_dirty(path, false);
        }
    }

    fn pane_paths(&self, pane_id: &PaneId) -> Vec<String> {
        self.panes
            .get(pane_id)
            .map(|pane| pane.tabs().iter().map(|tab| tab.path.clone()).collect())
            .unwrap_or_default()
    }

    /// Drops cached metadata for paths no tab shows any more.
    fn forget_metadata(&self, paths: &[String]) {
        for path in paths {
            if !self.panes.shows_path(path) {
                self.metadata.forget(path);
            }
        }
    }

    fn finish_close(&mut self, outcome: CloseOutcome, closed_paths: &[String]) -> CloseOutcome {
        if let CloseOutcome::Applied { pruned_pane } = &outcome {
            if let Some(pruned) = pruned_pane {
                self.focus.on_pane_removed(pruned, &self.layout);
            }
            self.forget_metadata(closed_paths);
            tracing::debug!(pruned = ?pruned_pane, "Close applied");
            self.persist();
        }
        outcome
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Queues a write of the current snapshot if the workspace is bound to
    /// a session.
    ///
    /// Inside a tokio runtime the write happens in the background; see
    /// [`Workspace::flush`]. Failures are logged and otherwise ignored.
    pub fn persist(&self) {
        let Some(writer) = &self.writer else {
            return;
        };
        let _span =
            tracing::debug_span!(span_names::PERSIST, session_id = %writer.session()).entered();
        match encode_snapshot(&self.snapshot()) {
            Ok(blob) => writer.submit(blob),
            Err(error) => {
                let session = writer.session();
                tracing::warn!(session_id = %session, %error, "Failed to encode workspace");
            }
        }
    }

    /// Waits until every queued snapshot write has reached the store.
    pub async fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush().await;
        }
    }
}

/// Reads and decodes a session, falling back to an empty workspace.
fn load_snapshot(session: &SessionId, store: &dyn SessionStore) -> WorkspaceSnapshot {
    let blob = match store.read(session) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            tracing::debug!(session_id = %session, "No stored workspace, starting empty");
            return WorkspaceSnapshot::default();
        }
        Err(error) => {
            tracing::warn!(session_id = %session, %error, "Failed to read workspace");
            return WorkspaceSnapshot::default();
        }
    };
    match decode_snapshot(&blob) {
        Ok(decoded) => {
            if decoded.needs_rewrite() {
                tracing::info!(
                    session_id = %session,
                    legacy = decoded.legacy_panes.len(),
                    malformed = decoded.malformed_panes.len(),
                    orphaned = decoded.orphaned_panes.len(),
                    layout_replaced = decoded.layout_replaced,
                    "Migrated stored workspace"
                );
            }
            decoded.snapshot
        }
        Err(error) => {
            tracing::warn!(session_id = %session, %error, "Stored workspace unreadable");
            WorkspaceSnapshot::default()
        }
    }
}
