//! Engine configuration
//!
//! [`EngineSettings`] is a plain value handed to the workspace;
//! [`SettingsManager`] reads and writes it as TOML.

mod manager;
pub mod settings;

pub use manager::{SETTINGS_FILE, SettingsManager};
pub use settings::{
    BusyCheckPolicy, DEFAULT_BUSY_CHECK_TIMEOUT_MS, DEFAULT_ENRICHMENT_TIMEOUT_MS, EngineSettings,
};
