//! Session stores
//!
//! A store maps a session id to one opaque JSON blob. The engine only ever
//! reads a blob once at construction and overwrites it after each mutation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{StorageError, StorageResult};
use crate::layout::SessionId;

/// File extension for stored sessions
pub const SESSION_FILE_EXTENSION: &str = "json";

/// Key-value storage for workspace blobs.
pub trait SessionStore: Send + Sync {
    /// Reads the blob for `session`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self, session: &SessionId) -> StorageResult<Option<String>>;

    /// Replaces the blob for `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, session: &SessionId, blob: &str) -> StorageResult<()>;

    /// Deletes the blob for `session`. Returns false if none was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn delete(&self, session: &SessionId) -> StorageResult<bool>;

    /// Lists stored session ids in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be enumerated.
    fn list(&self) -> StorageResult<Vec<SessionId>>;
}

/// Checks that a session id is usable as a file name.
///
/// Accepts ASCII letters, digits, `.`, `_` and `-`; rejects empty ids and
/// ids starting with a dot.
///
/// # Errors
///
/// Returns `StorageError::InvalidSessionId` otherwise.
pub fn validate_session_id(session: &SessionId) -> StorageResult<()> {
    let id = session.as_str();
    let valid = !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidSessionId(id.to_owned()))
    }
}

/// In-process store, used by tests and by sessions that need no disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding one blob.
    #[must_use]
    pub fn with_blob(session: &SessionId, blob: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().insert(session.storage_key(), blob.into());
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemoryStore {
    fn read(&self, session: &SessionId) -> StorageResult<Option<String>> {
        Ok(self.lock().get(&session.storage_key()).cloned())
    }

    fn write(&self, session: &SessionId, blob: &str) -> StorageResult<()> {
        self.lock().insert(session.storage_key(), blob.to_owned());
        Ok(())
    }

    fn delete(&self, session: &SessionId) -> StorageResult<bool> {
        Ok(self.lock().remove(&session.storage_key()).is_some())
    }

    fn list(&self) -> StorageResult<Vec<SessionId>> {
        let prefix = SessionId::new("").storage_key();
        Ok(self
            .lock()
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(SessionId::new)
            .collect())
    }
}

/// Directory-backed store with one `<session>.json` file per session.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash never leaves a half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the storage directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path for `session`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidSessionId` for unusable ids.
    pub fn session_path(&self, session: &SessionId) -> StorageResult<PathBuf> {
        validate_session_id(session)?;
        Ok(self
            .dir
            .join(format!("{}.{SESSION_FILE_EXTENSION}", session.as_str())))
    }
}

impl SessionStore for FileStore {
    fn read(&self, session: &SessionId) -> StorageResult<Option<String>> {
        let path = self.session_path(session)?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, session: &SessionId, blob: &str) -> StorageResult<()> {
        let path = self.session_path(session)?;
        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension(format!("{SESSION_FILE_EXTENSION}.tmp"));
        fs::write(&tmp, blob)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::trace!(path = %path.display(), bytes = blob.len(), "Wrote session file");
        Ok(())
    }

    fn delete(&self, session: &SessionId) -> StorageResult<bool> {
        let path = self.session_path(session)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> StorageResult<Vec<SessionId>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut sessions = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SESSION_FILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let session = SessionId::new(stem);
            if validate_session_id(&session).is_ok() {
                sessions.push(session);
            }
        }
        sessions.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(sessions)
    }
}
