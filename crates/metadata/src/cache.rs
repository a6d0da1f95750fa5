//! In-process caching: a single-flight map and a TTL cache.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use animeart_core::types::ImageResult;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::MetadataError;
use crate::provider::ImageCache;

/// Coalesces concurrent calls for the same key into one computation.
///
/// Every caller that arrives while a computation for its key is in flight
/// receives a clone of that computation's output. The entry is dropped once
/// the computation finishes, so later calls start fresh.
pub struct SingleFlight<T> {
    calls: Mutex<HashMap<String, Arc<OnceCell<T>>>>,
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub async fn run<F, Fut>(&self, key: &str, compute: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let cell = {
            let mut calls = self.calls.lock().await;
            let cell = calls.entry(key.to_string()).or_default();
            if Arc::strong_count(cell) > 1 {
                debug!(key, "joining in-flight computation");
            }
            Arc::clone(cell)
        };

        let value = cell.get_or_init(compute).await.clone();

        let mut calls = self.calls.lock().await;
        if calls.get(key).is_some_and(|c| Arc::ptr_eq(c, &cell)) {
            calls.remove(key);
        }
        value
    }

    /// Number of keys with a computation in flight.
    pub async fn in_flight(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

struct Entry {
    images: ImageResult,
    expires_at: Instant,
}

/// Process-local [`ImageCache`] with per-entry expiry.
#[derive(Default)]
pub struct MemoryImageCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn live_entries(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }
}

#[async_trait::async_trait]
impl ImageCache for MemoryImageCache {
    async fn get(&self, key: &str) -> Result<Option<ImageResult>, MetadataError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.images.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &str,
        images: &ImageResult,
        ttl: Duration,
    ) -> Result<(), MetadataError> {
        self.entries.lock().await.insert(
            key.to_string(),
            Entry {
                images: images.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }
}
