//! Single-owner workspace task
//!
//! On a multi-threaded host the workspace lives inside one tokio task and
//! every mutation arrives as a message. Messages are applied strictly in
//! arrival order; a close that is waiting on a confirmation holds the queue
//! until it finishes, so no other mutation can interleave with it.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::close::CloseOutcome;
use crate::error::WorkspaceError;
use crate::layout::{BranchRef, LayoutResult, PaneId, SplitDirection, TabId};
use crate::persist::WorkspaceSnapshot;
use crate::tab::{OpenRequest, ViewType};
use crate::workspace::Workspace;

/// Queue depth for pending commands
const COMMAND_BUFFER: usize = 32;

type Reply<T> = oneshot::Sender<T>;

enum Command {
    Split {
        pane_id: PaneId,
        direction: SplitDirection,
        target_tab: Option<TabId>,
        reply: Reply<LayoutResult<PaneId>>,
    },
    CloseTab {
        pane_id: PaneId,
        tab_id: TabId,
        reply: Reply<LayoutResult<CloseOutcome>>,
    },
    ClosePane {
        pane_id: PaneId,
        reply: Reply<LayoutResult<CloseOutcome>>,
    },
    Open {
        request: OpenRequest,
        reply: Reply<LayoutResult<TabId>>,
    },
    Rename {
        tab_id: TabId,
        label: String,
        view_type: Option<ViewType>,
        reply: Reply<LayoutResult<usize>>,
    },
    Activate {
        pane_id: PaneId,
        tab_id: TabId,
        reply: Reply<LayoutResult<()>>,
    },
    Resize {
        branch: BranchRef,
        size: f64,
        reply: Reply<LayoutResult<()>>,
    },
    UnsavedChange {
        path: String,
        dirty: bool,
        reply: Reply<()>,
    },
    Snapshot {
        reply: Reply<WorkspaceSnapshot>,
    },
    Flush {
        reply: Reply<()>,
    },
}

impl Command {
    async fn apply(self, workspace: &mut Workspace) {
        // A dropped receiver only means the caller stopped waiting.
        match self {
            Self::Split {
                pane_id,
                direction,
                target_tab,
                reply,
            } => {
                let _ = reply.send(workspace.split(&pane_id, direction, target_tab.as_ref()));
            }
            Self::CloseTab {
                pane_id,
                tab_id,
                reply,
            } => {
                let _ = reply.send(workspace.close_tab(&pane_id, &tab_id).await);
            }
            Self::ClosePane { pane_id, reply } => {
                let _ = reply.send(workspace.close_pane(&pane_id).await);
            }
            Self::Open { request, reply } => {
                let _ = reply.send(workspace.open(request));
            }
            Self::Rename {
                tab_id,
                label,
                view_type,
                reply,
            } => {
                let _ = reply.send(workspace.rename(&tab_id, &label, view_type));
            }
            Self::Activate {
                pane_id,
                tab_id,
                reply,
            } => {
                let _ = reply.send(workspace.activate(&pane_id, &tab_id));
            }
            Self::Resize {
                branch,
                size,
                reply,
            } => {
                let _ = reply.send(workspace.resize(&branch, size));
            }
            Self::UnsavedChange { path, dirty, reply } => {
                workspace.on_unsaved_change(&path, dirty);
                let _ = reply.send(());
            }
            Self::Snapshot { reply } => {
                let _ = reply.send(workspace.snapshot());
            }
            Self::Flush { reply } => {
                workspace.flush().await;
                let _ = reply.send(());
            }
        }
    }
}

/// Cloneable handle to a workspace running in its own task.
///
/// Every method fails with `WorkspaceError::Closed` once the task is gone.
#[derive(Debug, Clone)]
pub struct WorkspaceHandle {
    commands: mpsc::Sender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Split { .. } => "Split",
            Self::CloseTab { .. } => "CloseTab",
            Self::ClosePane { .. } => "ClosePane",
            Self::Open { .. } => "Open",
            Self::Rename { .. } => "Rename",
            Self::Activate { .. } => "Activate",
            Self::Resize { .. } => "Resize",
            Self::UnsavedChange { .. } => "UnsavedChange",
            Self::Snapshot { .. } => "Snapshot",
            Self::Flush { .. } => "Flush",
        };
        f.write_str(name)
    }
}

/// Moves `workspace` into a new task and returns a handle to it.
///
/// The task ends, returning the workspace, when every handle is dropped.
/// Pending snapshot writes are flushed first.
/// Must be called from within a tokio runtime.
#[must_use]
pub fn spawn_workspace(workspace: Workspace) -> (WorkspaceHandle, JoinHandle<Workspace>) {
    let (commands, mut inbox) = mpsc::channel::<Command>(COMMAND_BUFFER);
    let task = tokio::spawn(async move {
        let mut workspace = workspace;
        while let Some(command) = inbox.recv().await {
            tracing::trace!(?command, "Workspace command");
            command.apply(&mut workspace).await;
        }
        workspace.flush().await;
        tracing::debug!("Workspace task stopped");
        workspace
    });
    (WorkspaceHandle { commands }, task)
}

impl WorkspaceHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, WorkspaceError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| WorkspaceError::Closed)?;
        response.await.map_err(|_| WorkspaceError::Closed)
    }

    /// See [`Workspace::split`].
    ///
    /// # Errors
    ///
    /// Returns the layout error, or `Closed` if the task is gone.
    pub async fn split(
        &self,
        pane_id: PaneId,
        direction: SplitDirection,
        target_tab: Option<TabId>,
    ) -> Result<PaneId, WorkspaceError> {
        Ok(self
            .request(|reply| Command::Split {
                pane_id,
                direction,
                target_tab,
                reply,
            })
            .await??)
    }

    /// See [`Workspace::close_tab`].
    ///
    /// # Errors
    ///
    /// Returns the layout error, or `Closed` if the task is gone.
    pub async fn close_tab(
        &self,
        pane_id: PaneId,
        tab_id: TabId,
    ) -> Result<CloseOutcome, WorkspaceError> {
        Ok(self
            .request(|reply| Command::CloseTab {
                pane_id,
                tab_id,
                reply,
            })
            .await??)
    }

    /// See [`Workspace::close_pane`].
    ///
    /// # Errors
    ///
    /// Returns the layout error, or `Closed` if the task is gone.
    pub async fn close_pane(&self, pane_id: PaneId) -> Result<CloseOutcome, WorkspaceError> {
        Ok(self
            .request(|reply| Command::ClosePane { pane_id, reply })
            .await??)
    }

    /// See [`Workspace::open`].
    ///
    /// # Errors
    ///
    /// Returns the layout error, or `Closed` if the task is gone.
    pub async fn open(&self, request: OpenRequest) -> Result<TabId, WorkspaceError> {
        Ok(self
            .request(|reply| Command::Open { request, reply })
            .await??)
    }

    /// See [`Workspace::rename`].
    ///
    /// # Errors
    ///
    /// Returns the layout error, or `Closed` if the task is gone.
    pub async fn rename(
        &self,
        tab_id: TabId,
        label: impl Into<String>,
        view_type: Option<ViewType>,
    ) -> Result<usize, WorkspaceError> {
        let label = label.into();
        Ok(self
            .request(|reply| Command::Rename {
                tab_id,
                label,
                view_type,
                reply,
            })
            .await??)
    }

    /// See [`Workspace::activate`].
    ///
    /// # Errors
    ///
    /// Returns the layout error, or `Closed` if the task is gone.
    pub async fn activate(&self, pane_id: PaneId, tab_id: TabId) -> Result<(), WorkspaceError> {
        Ok(self
            .request(|reply| Command::Activate {
                pane_id,
                tab_id,
                reply,
            })
            .await??)
    }

    /// See [`Workspace::resize`].
    ///
    /// # Errors
    ///
    /// Returns the layout error, or `Closed` if the task is gone.
    pub async fn resize(&self, branch: BranchRef, size: f64) -> Result<(), WorkspaceError> {
        Ok(self
            .request(|reply| Command::Resize {
                branch,
                size,
                reply,
            })
            .await??)
    }

    /// See [`Workspace::on_unsaved_change`].
    ///
    /// # Errors
    ///
    /// Returns `Closed` if the task is gone.
    pub async fn on_unsaved_change(
        &self,
        path: impl Into<String>,
        dirty: bool,
    ) -> Result<(), WorkspaceError> {
        let path = path.into();
        self.request(|reply| Command::UnsavedChange { path, dirty, reply })
            .await
    }

    /// Returns the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Closed` if the task is gone.
    pub async fn snapshot(&self) -> Result<WorkspaceSnapshot, WorkspaceError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// See [`Workspace::flush`].
    ///
    /// # Errors
    ///
    /// Returns `Closed` if the task is gone.
    pub async fn flush(&self) -> Result<(), WorkspaceError> {
        self.request(|reply| Command::Flush { reply }).await
    }
}
