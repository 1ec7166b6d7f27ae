//! Process-lifetime cache of raw animal collections
//!
//! Entries are keyed by scope token and never expire. A per-scope async
//! lock makes concurrent callers for the same scope share a single fetch:
//! the first caller fetches while the rest wait, then read its result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use log::{debug, info};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{HerdError, Result};
use crate::models::RawAnimalRecord;

/// Cached animal records with the time they were fetched
#[derive(Debug, Clone)]
pub struct CachedAnimals {
    /// Records as returned by the bulk endpoint, already unwrapped
    pub records: Arc<Vec<RawAnimalRecord>>,
    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

/// Memoizes bulk animal fetches per scope token
#[derive(Debug, Default)]
pub struct AnimalCache {
    entries: RwLock<HashMap<String, CachedAnimals>>,
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AnimalCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, CachedAnimals>>> {
        self.entries.read().map_err(|_| {
            HerdError::InvalidOperation("Failed to acquire read lock on animal cache".to_string())
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, CachedAnimals>>> {
        self.entries.write().map_err(|_| {
            HerdError::InvalidOperation("Failed to acquire write lock on animal cache".to_string())
        })
    }

    /// Cached records for the scope, or the result of a single shared fetch
    ///
    /// Failed fetches are not cached; the next caller tries again.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        scope: &str,
        fetch_fn: F,
    ) -> Result<Arc<Vec<RawAnimalRecord>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<RawAnimalRecord>>>,
    {
        if let Some(hit) = self.get(scope)? {
            return Ok(hit.records);
        }

        let _guard = self.acquire(scope).await;

        // Another caller may have filled the entry while we waited.
        if let Some(hit) = self.get(scope)? {
            debug!("Joined in-flight fetch for scope {scope}");
            return Ok(hit.records);
        }

        let records = Arc::new(fetch_fn().await?);
        let entry = CachedAnimals {
            records: Arc::clone(&records),
            fetched_at: Utc::now(),
        };
        self.write()?.insert(scope.to_string(), entry);

        info!("Cached {} animal records for scope {scope}", records.len());
        Ok(records)
    }

    /// Cached entry for the scope, if any
    pub fn get(&self, scope: &str) -> Result<Option<CachedAnimals>> {
        Ok(self.read()?.get(scope).cloned())
    }

    /// Drop the entry for one scope; the next access refetches
    pub fn invalidate(&self, scope: &str) -> Result<bool> {
        let removed = self.write()?.remove(scope).is_some();
        if removed {
            debug!("Invalidated animal cache for scope {scope}");
        }
        Ok(removed)
    }

    /// Drop every entry
    pub fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    async fn acquire(&self, scope: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut inflight = self.inflight.lock().await;
            Arc::clone(
                inflight
                    .entry(scope.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}
