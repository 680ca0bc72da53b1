//! Background session writes
//!
//! Inside a tokio runtime each write runs on the blocking pool, so a slow
//! disk never stalls the caller. Outside a runtime the write runs inline.
//! Every write is numbered when it is submitted; a write that finds a newer
//! one already stored is skipped, so the store always ends up holding the
//! latest snapshot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use super::store::SessionStore;
use crate::layout::SessionId;

/// Fire-and-forget writer for one session.
pub struct SessionWriter {
    session: SessionId,
    store: Arc<dyn SessionStore>,
    submitted: AtomicU64,
    stored: Arc<Mutex<u64>>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl std::fmt::Debug for SessionWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionWriter")
            .field("session", &self.session)
            .field("submitted", &self.submitted.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl SessionWriter {
    /// Creates a writer for `session` backed by `store`.
    #[must_use]
    pub fn new(session: SessionId, store: Arc<dyn SessionStore>) -> Self {
        Self {
            session,
            store,
            submitted: AtomicU64::new(0),
            stored: Arc::new(Mutex::new(0)),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Returns the session written to
    #[must_use]
    pub const fn session(&self) -> &SessionId {
        &self.session
    }

    /// Queues `blob` for writing and returns immediately.
    ///
    /// Failures are logged at `warn`.
    pub fn submit(&self, blob: String) {
        let write = PendingWrite {
            generation: self.submitted.fetch_add(1, Ordering::Relaxed) + 1,
            session: self.session.clone(),
            store: Arc::clone(&self.store),
            stored: Arc::clone(&self.stored),
            blob,
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            write.run();
            return;
        };
        let handle = runtime.spawn_blocking(move || write.run());
        let mut pending = self.pending();
        pending.retain(|write| !write.is_finished());
        pending.push(handle);
    }

    /// Waits until every write submitted so far has finished.
    pub async fn flush(&self) {
        let pending = std::mem::take(&mut *self.pending());
        for result in futures::future::join_all(pending).await {
            if let Err(error) = result {
                tracing::warn!(session_id = %self.session, %error, "Session write aborted");
            }
        }
    }

    fn pending(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct PendingWrite {
    generation: u64,
    session: SessionId,
    store: Arc<dyn SessionStore>,
    stored: Arc<Mutex<u64>>,
    blob: String,
}

impl PendingWrite {
    fn run(self) {
        let mut stored = self.stored.lock().unwrap_or_else(PoisonError::into_inner);
        if *stored > self.generation {
            tracing::trace!(
                session_id = %self.session,
                generation = self.generation,
                "Skipping superseded session write"
            );
            return;
        }
        match self.store.write(&self.session, &self.blob) {
            Ok(()) => *stored = self.generation,
            Err(error) => {
                tracing::warn!(session_id = %self.session, %error, "Failed to persist workspace");
            }
        }
    }
}
