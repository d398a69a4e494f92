//! Cache store.

use super::clock::{Clock, SystemClock};
use super::key::CacheKey;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// Lifetime of a cached user record.
pub const USER_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub invalidations: u64,
}

impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
struct AtomicStats {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    invalidations: AtomicU64,
}

impl AtomicStats {
    fn to_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

/// One map from key to `{value, fetched_at}`; value and timestamp are never stored apart.
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    stats: AtomicStats,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: USER_CACHE_TTL,
            clock,
            stats: AtomicStats::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, if any. An expired entry is dropped and reported as a miss.
    ///
    /// Hits only take the read lock; the write lock is needed just to drop a stale entry.
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let now = self.clock.now();
        let fresh = match self.read().get(key) {
            Some(entry) if entry.is_fresh(now, self.ttl) => Some(entry.value.clone()),
            Some(_) => None,
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "cache miss");
                return None;
            }
        };

        if let Some(value) = fresh {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "cache hit");
            return Some(value);
        }

        // Re-check under the write lock: a concurrent insert may have refreshed it.
        let mut entries = self.write();
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now, self.ttl) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "cache hit");
                Some(entry.value.clone())
            }
            _ => {
                entries.remove(key);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "cache entry expired");
                None
            }
        }
    }

    /// Store `value` stamped with the current time, replacing any previous entry.
    ///
    /// Expired entries for other keys are swept out at the same time.
    pub fn insert(&self, key: CacheKey, value: Value) {
        let fetched_at = self.clock.now();
        let ttl = self.ttl;
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, e| e.is_fresh(fetched_at, ttl));
        let swept = before - entries.len();
        entries.insert(key.clone(), CacheEntry { value, fetched_at });
        drop(entries);
        self.stats.inserts.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, swept, "cache insert");
    }

    /// Drop the entry for `key`. Returns whether one was present; absent keys are fine.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let removed = self.write().remove(key).is_some();
        self.stats.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, removed, "cache invalidate");
        removed
    }

    pub fn clear(&self) {
        let mut entries = self.write();
        let dropped = entries.len();
        entries.clear();
        debug!(dropped, "cache cleared");
    }

    /// Fresh entries only.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.read()
            .values()
            .filter(|e| e.is_fresh(now, self.ttl))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a fresh entry exists, without touching the counters.
    pub fn contains(&self, key: &CacheKey) -> bool {
        let now = self.clock.now();
        self.read()
            .get(key)
            .is_some_and(|e| e.is_fresh(now, self.ttl))
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.to_stats()
    }

    // Entries are plain data, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
