//! Error types for layout operations

use super::types::{BranchRef, PaneId, TabId};

/// Errors returned by operations that address a pane, tab or branch that
/// does not exist. State is left unchanged whenever one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The specified pane was not found.
    #[error("pane not found: {0}")]
    PaneNotFound(PaneId),

    /// The specified tab was not found.
    #[error("tab not found: {0}")]
    TabNotFound(TabId),

    /// The specified branch was not found.
    #[error("branch not found: {0}")]
    BranchNotFound(BranchRef),

    /// Branch size was not a finite number.
    #[error("invalid branch size: {0}")]
    InvalidRatio(f64),

    /// A tab cannot be opened for an empty path.
    #[error("cannot open a tab for an empty path")]
    EmptyPath,
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
