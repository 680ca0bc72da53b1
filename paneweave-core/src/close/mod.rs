//! Gated closing of tabs and panes
//!
//! A close runs through
//! `Requested -> BusyCheck -> DirtyCheck -> Confirmed -> Applied`, and may
//! leave towards `Cancelled` from either check. The gates live in
//! [`CloseOrchestrator`] and never touch workspace state; the mutation is a
//! separate, synchronous [`apply_tab_close`] / [`apply_pane_close`] step, so
//! a cancelled close has nothing to undo.

mod apply;
mod orchestrator;

use std::fmt;

use crate::layout::PaneId;

pub use apply::{apply_pane_close, apply_tab_close};
pub use orchestrator::{CloseOrchestrator, GateVerdict};

/// Stage of the close pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseStage {
    /// Close was asked for
    Requested,
    /// Asking the busy probe (terminal tabs only)
    BusyCheck,
    /// Checking for unsaved changes
    DirtyCheck,
    /// Every gate passed
    Confirmed,
    /// The workspace was mutated
    Applied,
    /// A gate was declined
    Cancelled,
}

impl fmt::Display for CloseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Requested => "requested",
            Self::BusyCheck => "busy_check",
            Self::DirtyCheck => "dirty_check",
            Self::Confirmed => "confirmed",
            Self::Applied => "applied",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Result of a close request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The close went through.
    Applied {
        /// Pane removed from the layout, if the close collapsed one
        pruned_pane: Option<PaneId>,
    },
    /// The user declined at `stage`; nothing changed.
    Cancelled {
        /// Gate that was declined
        stage: CloseStage,
    },
    /// Nothing to close (the root pane, for instance).
    Noop,
}

impl CloseOutcome {
    /// Returns true if the workspace changed
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Returns true if a gate was declined
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
