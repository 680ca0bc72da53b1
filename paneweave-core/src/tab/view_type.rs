//! View type tags and the renderer registry
//!
//! The engine only reasons about the *set* of view types. Concrete renderers
//! are supplied by the host through a [`RendererRegistry`] and never
//! inspected here.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of view a tab shows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    /// Text editor for a file.
    #[default]
    Editor,
    /// Hex/binary viewer for a file.
    Binary,
    /// Image preview for a file.
    Image,
    /// Interactive terminal.
    Terminal,
    /// Directory listing.
    Directory,
    /// Resource details / metadata panel.
    Details,
    /// Trash browser.
    Trash,
    /// Log viewer.
    Logs,
}

impl ViewType {
    /// Returns every view type in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Editor,
            Self::Binary,
            Self::Image,
            Self::Terminal,
            Self::Directory,
            Self::Details,
            Self::Trash,
            Self::Logs,
        ]
    }

    /// Returns the serialized tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Editor => "editor",
            Self::Binary => "binary",
            Self::Image => "image",
            Self::Terminal => "terminal",
            Self::Directory => "directory",
            Self::Details => "details",
            Self::Trash => "trash",
            Self::Logs => "logs",
        }
    }

    /// Returns true for views that display a filesystem resource.
    ///
    /// Activating one of these updates the external selection; activating
    /// anything else must leave it alone.
    #[must_use]
    pub const fn is_resource(self) -> bool {
        matches!(self, Self::Editor | Self::Binary | Self::Image)
    }

    /// Returns true for terminal views, which are busy-checked before close.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal)
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|view_type| view_type.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// Maps view types to host-supplied renderers.
///
/// `R` is whatever the host uses to draw a tab (a widget factory, a component
/// handle, ...). The engine never calls into it.
#[derive(Debug, Clone)]
pub struct RendererRegistry<R> {
    renderers: HashMap<ViewType, R>,
}

impl<R> RendererRegistry<R> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Registers the renderer for a view type, returning the one it replaces.
    pub fn register(&mut self, view_type: ViewType, renderer: R) -> Option<R> {
        self.renderers.insert(view_type, renderer)
    }

    /// Returns the renderer for a view type.
    #[must_use]
    pub fn get(&self, view_type: ViewType) -> Option<&R> {
        self.renderers.get(&view_type)
    }

    /// Returns true if a renderer is registered for the view type.
    #[must_use]
    pub fn is_registered(&self, view_type: ViewType) -> bool {
        self.renderers.contains_key(&view_type)
    }

    /// Returns the view types that have no renderer yet.
    #[must_use]
    pub fn missing(&self) -> Vec<ViewType> {
        ViewType::all()
            .iter()
            .copied()
            .filter(|view_type| !self.is_registered(*view_type))
            .collect()
    }
}

impl<R> Default for RendererRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}
