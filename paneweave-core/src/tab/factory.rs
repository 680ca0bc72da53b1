//! Builds tab records from open requests
//!
//! Paths starting with a reserved prefix (see [`SYNTHETIC_KINDS`]) are
//! synthetic ids: they name a view rather than a filesystem resource, map to
//! a fixed view type and carry a fixed label.

use serde_json::{Map, Value};

use super::view_type::ViewType;
use crate::layout::{PaneId, TabId};
use crate::pane::Tab;

/// A reserved synthetic id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticKind {
    /// Prefix the path starts with.
    pub prefix: &'static str,
    /// View type the prefix maps to.
    pub view_type: ViewType,
    /// Label used when none is given.
    pub name: &'static str,
}

/// Reserved synthetic id prefixes.
pub const SYNTHETIC_KINDS: &[SyntheticKind] = &[
    SyntheticKind {
        prefix: "terminal:",
        view_type: ViewType::Terminal,
        name: "Terminal",
    },
    SyntheticKind {
        prefix: "details:",
        view_type: ViewType::Details,
        name: "Details",
    },
    SyntheticKind {
        prefix: "trash:",
        view_type: ViewType::Trash,
        name: "Trash",
    },
    SyntheticKind {
        prefix: "logs:",
        view_type: ViewType::Logs,
        name: "Logs",
    },
];

/// A request to open a tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenRequest {
    /// Resource path or synthetic id.
    pub path: String,
    /// Explicit view type; resolved from the path when absent.
    pub view_type: Option<ViewType>,
    /// Explicit label; resolved from the path when absent.
    pub label: Option<String>,
    /// Renderer hint.
    pub intent: Option<String>,
    /// Extra metadata merged into the tab.
    pub extra: Map<String, Value>,
    /// Pane to open in; the active pane when absent.
    pub pane: Option<PaneId>,
}

impl OpenRequest {
    /// Creates a request for a path with everything else resolved.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the view type.
    #[must_use]
    pub const fn with_view_type(mut self, view_type: ViewType) -> Self {
        self.view_type = Some(view_type);
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the intent.
    #[must_use]
    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    /// Adds one extra metadata entry.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Targets a specific pane.
    #[must_use]
    pub fn in_pane(mut self, pane: impl Into<PaneId>) -> Self {
        self.pane = Some(pane.into());
        self
    }
}

/// Resolves view types and labels and builds [`Tab`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabFactory;

impl TabFactory {
    /// Returns the synthetic kind of a path, if it is a synthetic id.
    #[must_use]
    pub fn synthetic_kind(path: &str) -> Option<&'static SyntheticKind> {
        SYNTHETIC_KINDS
            .iter()
            .find(|kind| path.starts_with(kind.prefix))
    }

    /// Returns true if the path is a synthetic id rather than a resource.
    #[must_use]
    pub fn is_synthetic(path: &str) -> bool {
        Self::synthetic_kind(path).is_some()
    }

    /// Explicit view type, else the synthetic mapping, else `editor`.
    #[must_use]
    pub fn resolve_view_type(path: &str, explicit: Option<ViewType>) -> ViewType {
        explicit
            .or_else(|| Self::synthetic_kind(path).map(|kind| kind.view_type))
            .unwrap_or_default()
    }

    /// Explicit label, else the synthetic name, else the path's basename.
    ///
    /// A path with no basename (such as `/`) is its own label.
    #[must_use]
    pub fn resolve_label(path: &str, explicit: Option<&str>) -> String {
        if let Some(label) = explicit.filter(|label| !label.is_empty()) {
            return label.to_owned();
        }
        if let Some(kind) = Self::synthetic_kind(path) {
            return kind.name.to_owned();
        }
        match basename(path) {
            Some(name) => name.to_owned(),
            None => path.to_owned(),
        }
    }

    /// Builds a tab for a request under the given id.
    #[must_use]
    pub fn build(request: &OpenRequest, id: TabId) -> Tab {
        Tab {
            id,
            path: request.path.clone(),
            label: Self::resolve_label(&request.path, request.label.as_deref()),
            view_type: Self::resolve_view_type(&request.path, request.view_type),
            intent: request.intent.clone(),
            dirty: false,
            metadata: request.extra.clone(),
        }
    }

    /// Builds the tab a legacy path-only pane entry stands for.
    #[must_use]
    pub fn from_path(path: &str) -> Tab {
        Self::build(&OpenRequest::new(path), TabId::new(path))
    }
}

/// Last non-empty `/`-separated segment of a path.
fn basename(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
