//! Tab construction
//!
//! - `view_type` - the `ViewType` tag set and `RendererRegistry`
//! - `factory` - `TabFactory` resolving view type and label for an `OpenRequest`
//! - `singleton` - `SingletonPolicy`, the view types capped at one tab per workspace

mod factory;
mod singleton;
mod view_type;

pub use factory::{OpenRequest, SYNTHETIC_KINDS, SyntheticKind, TabFactory};
pub use singleton::{DEFAULT_SINGLETONS, SingletonPolicy};
pub use view_type::{RendererRegistry, ViewType};
