//! Pane registry and tab records
//!
//! - `state` - `Tab` and `PaneState`
//! - `registry` - `PaneRegistry`, the id-keyed side table the layout tree points into

mod registry;
mod state;

pub use registry::PaneRegistry;
pub use state::{PaneState, Tab};
