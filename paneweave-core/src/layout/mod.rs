//! Workspace layout tree
//!
//! The pane topology of a workspace is a binary tree whose leaves name panes
//! by id. Tab contents live in the [`crate::pane::PaneRegistry`], keyed by the
//! same ids, so reshaping the tree never touches tab data.
//!
//! # Module Structure
//!
//! - `types` - Identifiers (`PaneId`, `TabId`, `SessionId`), `SplitDirection`, `BranchRef`
//! - `tree` - The tree itself (`LayoutNode`, `Branch`, `PruneResult`)
//! - `error` - `LayoutError`
//!
//! # Example
//!
//! ```
//! use paneweave_core::layout::{LayoutNode, PaneId, PruneResult, SplitDirection};
//!
//! let tree = LayoutNode::default();
//! let new_pane = PaneId::numbered(1);
//! let split = tree
//!     .split_pane(&PaneId::root(), SplitDirection::Vertical, &new_pane)
//!     .unwrap();
//! assert_eq!(split.leaf_count(), 2);
//!
//! // Pruning the new pane collapses the branch again
//! assert_eq!(split.prune(&new_pane), PruneResult::Pruned(tree));
//! ```

mod error;
mod tree;
mod types;

pub use error::{LayoutError, LayoutResult};
pub use tree::{
    Branch, DEFAULT_BRANCH_SIZE, LayoutNode, MAX_BRANCH_SIZE, MIN_BRANCH_SIZE, PruneResult,
};
pub use types::{
    BranchRef, PANE_ID_PREFIX, PaneId, ROOT_PANE_ID, SessionId, SplitDirection, TabId,
};
