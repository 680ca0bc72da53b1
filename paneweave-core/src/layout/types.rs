//! Core type definitions for the workspace layout
//!
//! This module contains the identifier types and enums shared by the layout
//! tree, the pane registry and the persistence codec.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the pane that exists from the first launch and is never pruned.
pub const ROOT_PANE_ID: &str = "root";

/// Prefix used for panes created by a split.
pub const PANE_ID_PREFIX: &str = "pane-";

/// Opaque identifier of a pane.
///
/// The id is stored verbatim in the layout tree leaves and as the key of the
/// pane registry, so both sides of the tree/registry bijection compare equal
/// ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaneId(String);

impl PaneId {
    /// Creates a pane id from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the well-known root pane id.
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_PANE_ID.to_owned())
    }

    /// Returns the id of the `n`-th split pane (`pane-n`).
    #[must_use]
    pub fn numbered(n: u64) -> Self {
        Self(format!("{PANE_ID_PREFIX}{n}"))
    }

    /// Returns true for the root pane.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_PANE_ID
    }

    /// Returns the numeric suffix of a `pane-n` id.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix(PANE_ID_PREFIX)?.parse().ok()
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PaneId {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaneId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PaneId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Workspace-unique identifier of a tab.
///
/// For ordinary resources the id equals the path the tab was first opened
/// with. The empty id means "no tab" and is used as a pane's active tab when
/// the pane holds nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    /// Creates a tab id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the empty id used for "no active tab".
    #[must_use]
    pub const fn none() -> Self {
        Self(String::new())
    }

    /// Returns true if this is the empty id.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TabId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Identifier of the hosting session (profile) a workspace is persisted under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Creates a session id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the storage key the workspace blob of this session lives under.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("workspace-layout:{}", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Split direction for dividing panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Split horizontally, creating top and bottom panes.
    Horizontal,
    /// Split vertically, creating left and right panes.
    Vertical,
}

impl fmt::Display for SplitDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

impl std::str::FromStr for SplitDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            _ => Err(()),
        }
    }
}

/// Addresses a branch of the layout tree.
///
/// `leading` is the first leaf of the branch's first child and `trailing`
/// the first leaf of its second child. The branch is their lowest common
/// ancestor, so the pair names exactly one branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchRef {
    /// First leaf of the first child.
    pub leading: PaneId,
    /// First leaf of the second child.
    pub trailing: PaneId,
}

impl BranchRef {
    /// Creates a branch reference.
    #[must_use]
    pub fn new(leading: impl Into<PaneId>, trailing: impl Into<PaneId>) -> Self {
        Self {
            leading: leading.into(),
            trailing: trailing.into(),
        }
    }
}

impl fmt::Display for BranchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Branch({} | {})", self.leading, self.trailing)
    }
}
