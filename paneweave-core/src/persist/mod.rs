//! Workspace persistence
//!
//! [`codec`] turns a workspace snapshot into the stored JSON blob and back,
//! migrating older pane shapes on the way in. [`store`] holds the blobs and
//! [`writer`] writes them off the caller's thread.

pub mod codec;
pub mod store;
pub mod writer;

pub use codec::{
    DecodedWorkspace, PaneShape, WorkspaceSnapshot, accept_modern, classify_pane,
    decode_snapshot, encode_snapshot, migrate_legacy,
};
pub use store::{
    FileStore, MemoryStore, SESSION_FILE_EXTENSION, SessionStore, validate_session_id,
};
pub use writer::SessionWriter;
