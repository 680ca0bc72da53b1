//! Which view types may have at most one live tab per workspace

use std::collections::BTreeSet;

use super::view_type::ViewType;

/// View types that are singletons unless settings override the table.
pub const DEFAULT_SINGLETONS: &[ViewType] = &[
    ViewType::Directory,
    ViewType::Details,
    ViewType::Trash,
    ViewType::Logs,
];

/// Static table consulted when a tab is opened.
///
/// Opening a singleton view type while a tab of that type exists reuses the
/// existing tab. The table is never used to deduplicate tabs after the fact:
/// if a restored workspace already holds two tabs of a singleton type, both
/// stay until closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingletonPolicy {
    singletons: BTreeSet<ViewType>,
}

impl SingletonPolicy {
    /// Creates the built-in policy.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_view_types(DEFAULT_SINGLETONS.iter().copied())
    }

    /// Creates a policy where exactly the given view types are singletons.
    #[must_use]
    pub fn from_view_types(view_types: impl IntoIterator<Item = ViewType>) -> Self {
        Self {
            singletons: view_types.into_iter().collect(),
        }
    }

    /// Creates a policy with no singletons.
    #[must_use]
    pub fn none() -> Self {
        Self {
            singletons: BTreeSet::new(),
        }
    }

    /// Returns true if at most one tab of this view type may exist.
    #[must_use]
    pub fn is_singleton(&self, view_type: ViewType) -> bool {
        self.singletons.contains(&view_type)
    }

    /// Returns the singleton view types.
    #[must_use]
    pub fn singleton_types(&self) -> Vec<ViewType> {
        self.singletons.iter().copied().collect()
    }
}

impl Default for SingletonPolicy {
    fn default() -> Self {
        Self::builtin()
    }
}
