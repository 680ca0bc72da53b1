//! `Paneweave` Core Library
//!
//! A workspace layout engine: a split-pane tree whose leaves hold ordered
//! tabs, with gated closes and session persistence that migrates older
//! stored shapes.
//!
//! # Crate Structure
//!
//! - [`layout`] - Layout tree (`LayoutNode`) and the ids it is built from
//! - [`pane`] - Pane registry and tab records
//! - [`tab`] - View types, tab construction, singleton policy
//! - [`close`] - Busy/dirty gates and close application
//! - [`persist`] - Snapshot codec and session stores
//! - [`workspace`] - The [`Workspace`] aggregate tying it all together
//! - [`actor`] - Running a workspace in its own task
//! - [`config`] - Engine settings
//! - [`collab`] - Interfaces the host implements

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod actor;
pub mod close;
pub mod collab;
pub mod config;
pub mod error;
pub mod focus;
pub mod layout;
pub mod metadata;
pub mod pane;
pub mod persist;
pub mod tab;
pub mod tracing;
pub mod workspace;

pub use actor::{WorkspaceHandle, spawn_workspace};
pub use close::{CloseOrchestrator, CloseOutcome, CloseStage, GateVerdict};
pub use collab::{
    AutoConfirm, BusyProbe, ConfirmPrompt, ConfirmRequest, DirtyMap, Metadata, MetadataProvider,
    SelectionSink,
};
pub use config::{BusyCheckPolicy, EngineSettings, SettingsManager};
pub use error::{
    ConfigError, ConfigResult, ProbeError, StorageError, StorageResult, WorkspaceError,
};
pub use focus::FocusController;
pub use layout::{
    Branch, BranchRef, LayoutError, LayoutNode, LayoutResult, PaneId, PruneResult, SessionId,
    SplitDirection, TabId,
};
pub use metadata::{CachedMetadata, MetadataCache};
pub use pane::{PaneRegistry, PaneState, Tab};
pub use persist::{
    DecodedWorkspace, FileStore, MemoryStore, PaneShape, SessionStore, SessionWriter,
    WorkspaceSnapshot, decode_snapshot, encode_snapshot,
};
pub use tab::{OpenRequest, RendererRegistry, SingletonPolicy, TabFactory, ViewType};
pub use tracing::{TracingConfig, TracingError, TracingLevel, TracingOutput, init_tracing};
pub use workspace::{Collaborators, Workspace};
