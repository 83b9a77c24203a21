//! In-memory TTL cache
//!
//! Thread-safe key/value store with per-entry expiry. Expired entries are
//! evicted lazily on the read that observes them; there is no background
//! sweeper and no size bound.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Thread-safe cache with per-entry TTL
///
/// Values are cloned on the way in and on the way out, so callers never share
/// a mutable reference with the cached copy.
pub struct TtlCache<V> {
    /// Entries keyed by caller-chosen cache key
    entries: DashMap<String, CacheEntry<V>>,
    /// Cache statistics
    stats: CacheStats,
}

/// A cached value with its absolute expiry
struct CacheEntry<V> {
    value: V,
    /// `None` when `now + ttl` is past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    /// An entry is live while `now < expires_at`
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Cache statistics tracked atomically
#[derive(Debug)]
pub struct CacheStats {
    /// Total cache hits (entries served from cache)
    pub hits: AtomicU64,
    /// Total cache misses (entries not found or expired)
    pub misses: AtomicU64,
    /// Total evictions (expired entries removed)
    pub evictions: AtomicU64,
}

impl CacheStats {
    fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Get current cache hit count
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Get current cache miss count
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get current eviction count
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Calculate hit rate as a fraction (0.0-1.0)
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Create a new empty cache
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            stats: CacheStats::new(),
        }
    }

    /// Get a cached value if it exists and hasn't expired
    ///
    /// Returns `None` if the key doesn't exist or the entry has expired.
    /// Expired entries are removed as a side effect.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
        } else {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        // The shard guard is released here. Re-check under the write lock so a
        // fresh value stored in between is left alone.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(Instant::now()))
            .is_some()
        {
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a value under `key`, replacing any previous entry
    ///
    /// # Arguments
    ///
    /// * `key` - Cache key
    /// * `value` - Value to cache (an owned copy is kept)
    /// * `ttl` - Time-to-live; the entry expires at `now + ttl`
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        let expires_at = Instant::now().checked_add(ttl);
        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    /// Remove a single entry. Missing keys are ignored.
    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.stats.hits(),
            misses: self.stats.misses(),
            evictions: self.stats.evictions(),
            size: self.entries.len(),
            hit_rate: self.stats.hit_rate(),
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of cache statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStatsSnapshot {
    /// Total cache hits
    pub hits: u64,
    /// Total cache misses
    pub misses: u64,
    /// Total evictions
    pub evictions: u64,
    /// Current number of entries
    pub size: usize,
    /// Hit rate (0.0-1.0)
    pub hit_rate: f64,
}
