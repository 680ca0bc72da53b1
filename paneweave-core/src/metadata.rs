//! Side cache of resource metadata
//!
//! Opening a tab for a real resource kicks off a background `stat` through
//! the host's [`MetadataProvider`]. Results are merged into this cache keyed
//! by path; failures and timeouts are logged and otherwise ignored, so a tab
//! always opens even when its metadata never arrives.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::collab::{Metadata, MetadataProvider};
use crate::error::ProbeError;

/// A cached metadata entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedMetadata {
    /// Merged metadata.
    pub metadata: Metadata,
    /// When the last fetch for this path completed.
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CachedMetadata>,
    pending: Vec<JoinHandle<()>>,
}

/// Shared, cloneable metadata cache.
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    state: Arc<Mutex<CacheState>>,
}

impl MetadataCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached metadata for a path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Metadata> {
        self.lock()
            .entries
            .get(path)
            .map(|entry| entry.metadata.clone())
    }

    /// Returns the cached entry, including its fetch time.
    #[must_use]
    pub fn entry(&self, path: &str) -> Option<CachedMetadata> {
        self.lock().entries.get(path).cloned()
    }

    /// Returns the number of cached paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Merges fresh metadata into the entry for a path.
    ///
    /// Fields present in `fresh` replace cached ones; `extra` maps are
    /// merged key by key.
    pub fn merge(&self, path: &str, fresh: Metadata) {
        let mut state = self.lock();
        let fetched_at = Utc::now();
        match state.entries.get_mut(path) {
            Some(entry) => {
                let cached = &mut entry.metadata;
                if fresh.size.is_some() {
                    cached.size = fresh.size;
                }
                if fresh.modified.is_some() {
                    cached.modified = fresh.modified;
                }
                if fresh.mime.is_some() {
                    cached.mime = fresh.mime;
                }
                cached.is_dir = fresh.is_dir;
                cached.extra.extend(fresh.extra);
                entry.fetched_at = fetched_at;
            }
            None => {
                state.entries.insert(
                    path.to_owned(),
                    CachedMetadata {
                        metadata: fresh,
                        fetched_at,
                    },
                );
            }
        }
    }

    /// Drops the entry for a path.
    pub fn forget(&self, path: &str) {
        self.lock().entries.remove(path);
    }

    /// Fetches metadata for a path in the background and merges the result.
    ///
    /// Needs a tokio runtime; without one the fetch is skipped. Errors and
    /// timeouts are logged at `warn` and dropped.
    pub fn spawn_enrichment(
        &self,
        provider: Arc<dyn MetadataProvider>,
        path: String,
        timeout: Duration,
    ) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(path = %path, "No async runtime, skipping metadata enrichment");
            return;
        };
        let cache = self.clone();
        let handle = runtime.spawn(async move {
            let result = match tokio::time::timeout(timeout, provider.stat(&path)).await {
                Ok(result) => result,
                Err(_) => Err(ProbeError::TimedOut(timeout)),
            };
            match result {
                Ok(metadata) => {
                    tracing::debug!(path = %path, "Metadata enrichment completed");
                    cache.merge(&path, metadata);
                }
                Err(error) => {
                    tracing::warn!(path = %path, %error, "Metadata enrichment failed");
                }
            }
        });
        let mut state = self.lock();
        state.pending.retain(|pending| !pending.is_finished());
        state.pending.push(handle);
    }

    /// Waits until every enrichment started so far has finished.
    pub async fn wait_idle(&self) {
        let pending = std::mem::take(&mut self.lock().pending);
        for result in futures::future::join_all(pending).await {
            if let Err(error) = result {
                tracing::warn!(%error, "Metadata enrichment task aborted");
            }
        }
    }
}
