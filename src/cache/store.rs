//! In-memory response store.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::http::{ApiResponse, ResponseSnapshot};

/// A memoized response and its absolute expiry.
#[derive(Debug, Clone)]
struct CacheEntry {
    response: ResponseSnapshot,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// A thread-safe map of cache key -> memoized response.
///
/// Cloning shares the underlying map. Expired entries are removed lazily,
/// on lookup; nothing sweeps the map in the background.
#[derive(Debug, Clone, Default)]
pub struct ResponseStore {
    inner: Arc<DashMap<String, CacheEntry>>,
}

impl ResponseStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh copy of the live response stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<ApiResponse> {
        let now = Instant::now();
        // Removal is conditional so a concurrent overwrite with a live entry survives.
        let removed = self
            .inner
            .remove_if(key, |_, entry| !entry.is_live(now))
            .is_some();
        if removed {
            tracing::trace!(key, "Cache entry expired");
            return None;
        }
        self.inner.get(key).map(|entry| entry.response.to_response())
    }

    /// Memoize `response` under `key` for `ttl`, overwriting any prior entry.
    pub fn insert(&self, key: String, response: &ApiResponse, ttl: Duration) {
        let entry = CacheEntry {
            response: ResponseSnapshot::capture(response),
            expires_at: Instant::now() + ttl,
        };
        self.inner.insert(key, entry);
    }

    /// Remove every entry whose key contains `fragment`. Returns the number removed.
    pub fn invalidate_matching(&self, fragment: &str) -> usize {
        let before = self.inner.len();
        self.inner.retain(|key, _| !key.contains(fragment));
        before.saturating_sub(self.inner.len())
    }

    /// Whether a live entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        self.inner
            .get(key)
            .map(|entry| entry.is_live(now))
            .unwrap_or(false)
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.clear();
    }
}
