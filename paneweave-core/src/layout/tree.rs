//! Layout tree describing pane topology
//!
//! The layout is an immutable binary tree. Every mutation walks the tree by
//! structural recursion and returns a new tree; nodes never point back to
//! their parents and never hold tab data, which lives in the pane registry.
//!
//! # Tree Structure
//!
//! ```text
//! Branch(vertical, 50)
//! ├── Leaf(root)
//! └── Branch(horizontal, 50)
//!     ├── Leaf(pane-1)
//!     └── Leaf(pane-2)
//! ```
//!
//! Serialized form (the same JSON the persistence codec stores):
//!
//! ```json
//! {"type":"branch","direction":"vertical","size":50.0,
//!  "children":[{"type":"leaf","paneId":"root"},{"type":"leaf","paneId":"pane-1"}]}
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::types::{BranchRef, PaneId, SplitDirection};

/// Default branch size (percentage of space given to the first child).
pub const DEFAULT_BRANCH_SIZE: f64 = 50.0;

/// Minimum branch size accepted by [`LayoutNode::resize`].
pub const MIN_BRANCH_SIZE: f64 = 10.0;

/// Maximum branch size accepted by [`LayoutNode::resize`].
pub const MAX_BRANCH_SIZE: f64 = 90.0;

/// A node of the layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayoutNode {
    /// A pane.
    Leaf {
        /// Id of the pane displayed here.
        #[serde(rename = "paneId")]
        pane_id: PaneId,
    },
    /// Two children sharing the available space.
    Branch(Branch),
}

/// A branch of the layout tree. Always has exactly two children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// How the two children are arranged.
    pub direction: SplitDirection,
    /// Percentage of space allocated to the first child.
    pub size: f64,
    /// First (left/top) and second (right/bottom) child.
    pub children: Box<[LayoutNode; 2]>,
}

impl Branch {
    /// Creates a branch with the default 50/50 size.
    #[must_use]
    pub fn new(direction: SplitDirection, first: LayoutNode, second: LayoutNode) -> Self {
        Self {
            direction,
            size: DEFAULT_BRANCH_SIZE,
            children: Box::new([first, second]),
        }
    }

    /// Returns the first child.
    #[must_use]
    pub fn first(&self) -> &LayoutNode {
        &self.children[0]
    }

    /// Returns the second child.
    #[must_use]
    pub fn second(&self) -> &LayoutNode {
        &self.children[1]
    }

    /// Returns a copy of this branch with its children replaced.
    #[must_use]
    fn with_children(&self, first: LayoutNode, second: LayoutNode) -> Self {
        Self {
            direction: self.direction,
            size: self.size,
            children: Box::new([first, second]),
        }
    }

    /// Returns the reference that addresses this branch.
    #[must_use]
    pub fn branch_ref(&self) -> BranchRef {
        BranchRef {
            leading: self.first().first_pane().clone(),
            trailing: self.second().first_pane().clone(),
        }
    }
}

/// Outcome of pruning a pane from a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PruneResult {
    /// The pane was not in the tree.
    NotFound,
    /// The pane was removed; holds the collapsed tree.
    Pruned(LayoutNode),
    /// The tree is the pane's bare leaf; removing it would leave no tree.
    RemovedSelf,
}

impl PruneResult {
    /// Returns true if the pane was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

impl LayoutNode {
    /// Creates a leaf.
    #[must_use]
    pub fn leaf(pane_id: impl Into<PaneId>) -> Self {
        Self::Leaf {
            pane_id: pane_id.into(),
        }
    }

    /// Creates a branch with the default size.
    #[must_use]
    pub fn branch(direction: SplitDirection, first: Self, second: Self) -> Self {
        Self::Branch(Branch::new(direction, first, second))
    }

    /// Returns true if this is a leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Returns the branch if this is a branch node.
    #[must_use]
    pub const fn as_branch(&self) -> Option<&Branch> {
        match self {
            Self::Leaf { .. } => None,
            Self::Branch(branch) => Some(branch),
        }
    }

    /// Returns the pane id if this is a leaf.
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&PaneId> {
        match self {
            Self::Leaf { pane_id } => Some(pane_id),
            Self::Branch(_) => None,
        }
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Returns all pane ids in pre-order (depth-first, first child first).
    #[must_use]
    pub fn pane_ids(&self) -> Vec<PaneId> {
        let mut ids = Vec::new();
        self.collect_pane_ids(&mut ids);
        ids
    }

    fn collect_pane_ids(&self, ids: &mut Vec<PaneId>) {
        match self {
            Self::Leaf { pane_id } => ids.push(pane_id.clone()),
            Self::Branch(branch) => {
                for child in branch.children.iter() {
                    child.collect_pane_ids(ids);
                }
            }
        }
    }

    /// Returns the number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Branch(branch) => branch.children.iter().map(Self::leaf_count).sum(),
        }
    }

    /// Returns the depth of the tree. A bare leaf has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Branch(branch) => 1 + branch.first().depth().max(branch.second().depth()),
        }
    }

    /// Returns true if a leaf carries `pane_id`.
    #[must_use]
    pub fn contains_pane(&self, pane_id: &PaneId) -> bool {
        match self {
            Self::Leaf { pane_id: id } => id == pane_id,
            Self::Branch(branch) => branch.children.iter().any(|c| c.contains_pane(pane_id)),
        }
    }

    /// Returns the first (leftmost/topmost) pane.
    #[must_use]
    pub fn first_pane(&self) -> &PaneId {
        match self {
            Self::Leaf { pane_id } => pane_id,
            Self::Branch(branch) => branch.first().first_pane(),
        }
    }

    /// Finds the branch addressed by `branch_ref`.
    #[must_use]
    pub fn find_branch(&self, branch_ref: &BranchRef) -> Option<&Branch> {
        match self {
            Self::Leaf { .. } => None,
            Self::Branch(branch) => {
                if branch.first().first_pane() == &branch_ref.leading
                    && branch.second().first_pane() == &branch_ref.trailing
                {
                    Some(branch)
                } else {
                    branch
                        .first()
                        .find_branch(branch_ref)
                        .or_else(|| branch.second().find_branch(branch_ref))
                }
            }
        }
    }

    /// Returns references to every branch in pre-order.
    #[must_use]
    pub fn branch_refs(&self) -> Vec<BranchRef> {
        let mut refs = Vec::new();
        self.collect_branch_refs(&mut refs);
        refs
    }

    fn collect_branch_refs(&self, refs: &mut Vec<BranchRef>) {
        if let Self::Branch(branch) = self {
            refs.push(branch.branch_ref());
            branch.first().collect_branch_refs(refs);
            branch.second().collect_branch_refs(refs);
        }
    }

    /// Returns true if no pane id appears on more than one leaf.
    #[must_use]
    pub fn has_unique_leaves(&self) -> bool {
        let ids = self.pane_ids();
        let unique: HashSet<&PaneId> = ids.iter().collect();
        unique.len() == ids.len()
    }

    // ========================================================================
    // Mutation (each returns a rebuilt tree)
    // ========================================================================

    /// Replaces the leaf of `target` with a branch holding the old leaf first
    /// and a new leaf for `new_pane` second.
    ///
    /// Returns `None` if `target` is not in the tree.
    #[must_use]
    pub fn split_pane(
        &self,
        target: &PaneId,
        direction: SplitDirection,
        new_pane: &PaneId,
    ) -> Option<Self> {
        match self {
            Self::Leaf { pane_id } if pane_id == target => Some(Self::branch(
                direction,
                self.clone(),
                Self::leaf(new_pane.clone()),
            )),
            Self::Leaf { .. } => None,
            Self::Branch(branch) => {
                if let Some(first) = branch.first().split_pane(target, direction, new_pane) {
                    Some(Self::Branch(branch.with_children(first, branch.second().clone())))
                } else {
                    let second = branch.second().split_pane(target, direction, new_pane)?;
                    Some(Self::Branch(branch.with_children(branch.first().clone(), second)))
                }
            }
        }
    }

    /// Removes the leaf of `target`, collapsing its parent branch into the
    /// remaining sibling.
    #[must_use]
    pub fn prune(&self, target: &PaneId) -> PruneResult {
        match self {
            Self::Leaf { pane_id } if pane_id == target => PruneResult::RemovedSelf,
            Self::Leaf { .. } => PruneResult::NotFound,
            Self::Branch(branch) => match branch.first().prune(target) {
                PruneResult::RemovedSelf => PruneResult::Pruned(branch.second().clone()),
                PruneResult::Pruned(first) => PruneResult::Pruned(Self::Branch(
                    branch.with_children(first, branch.second().clone()),
                )),
                PruneResult::NotFound => match branch.second().prune(target) {
                    PruneResult::RemovedSelf => PruneResult::Pruned(branch.first().clone()),
                    PruneResult::Pruned(second) => PruneResult::Pruned(Self::Branch(
                        branch.with_children(branch.first().clone(), second),
                    )),
                    PruneResult::NotFound => PruneResult::NotFound,
                },
            },
        }
    }

    /// Sets the size of the addressed branch, clamped to
    /// [`MIN_BRANCH_SIZE`]..=[`MAX_BRANCH_SIZE`].
    ///
    /// Returns `None` if no branch matches.
    #[must_use]
    pub fn resize(&self, branch_ref: &BranchRef, size: f64) -> Option<Self> {
        let Self::Branch(branch) = self else {
            return None;
        };
        if branch.first().first_pane() == &branch_ref.leading
            && branch.second().first_pane() == &branch_ref.trailing
        {
            return Some(Self::Branch(Branch {
                direction: branch.direction,
                size: size.clamp(MIN_BRANCH_SIZE, MAX_BRANCH_SIZE),
                children: branch.children.clone(),
            }));
        }
        if let Some(first) = branch.first().resize(branch_ref, size) {
            return Some(Self::Branch(branch.with_children(first, branch.second().clone())));
        }
        let second = branch.second().resize(branch_ref, size)?;
        Some(Self::Branch(branch.with_children(branch.first().clone(), second)))
    }
}

impl Default for LayoutNode {
    fn default() -> Self {
        Self::leaf(PaneId::root())
    }
}
