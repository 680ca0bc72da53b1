//! Shared utility functions used across command modules.

use std::path::{Path, PathBuf};

use paneweave_core::persist::validate_session_id;
use paneweave_core::{
    DecodedWorkspace, FileStore, SessionId, SessionStore, SettingsManager, decode_snapshot,
};

use crate::error::CliError;

/// Directories given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StorePaths<'a> {
    /// Explicit store directory
    pub store: Option<&'a Path>,
    /// Explicit configuration directory
    pub config: Option<&'a Path>,
}

/// Resolves the store directory: `--store`, else `storage_dir` from settings,
/// else the platform data directory.
pub fn resolve_store_dir(paths: &StorePaths<'_>) -> Result<PathBuf, CliError> {
    if let Some(store) = paths.store {
        return Ok(store.to_path_buf());
    }

    let manager = match paths.config {
        Some(dir) => SettingsManager::with_config_dir(dir),
        None => SettingsManager::new()?,
    };
    let settings = manager.load()?;
    settings
        .storage_dir()
        .ok_or_else(|| CliError::Config("no storage directory available".to_string()))
}

/// Opens the file store the command operates on.
pub fn open_store(paths: &StorePaths<'_>) -> Result<FileStore, CliError> {
    let dir = resolve_store_dir(paths)?;
    tracing::debug!(dir = %dir.display(), "Using session store");
    Ok(FileStore::new(dir))
}

/// Parses and validates a session id argument.
pub fn parse_session(raw: &str) -> Result<SessionId, CliError> {
    let session = SessionId::new(raw);
    validate_session_id(&session)?;
    Ok(session)
}

/// Reads and decodes a stored session.
pub fn load_session(
    store: &dyn SessionStore,
    session: &SessionId,
) -> Result<DecodedWorkspace, CliError> {
    let blob = store
        .read(session)?
        .ok_or_else(|| CliError::SessionNotFound(session.to_string()))?;
    Ok(decode_snapshot(&blob)?)
}
