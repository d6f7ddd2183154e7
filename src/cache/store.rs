//! TTL cache with bounded size.
//!
//! # Responsibilities
//! - Store values with a per-entry time-to-live
//! - Hide expired entries and drop them when a read discovers them
//! - Evict the least recently accessed entry when full
//!
//! # Design Decisions
//! - Last access is a monotonically increasing tick, so two entries never
//!   share an eviction rank
//! - Overwriting an existing key never evicts another entry
//! - Operations never fail; poisoning is recovered from

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::cache::entry::CacheEntry;
use crate::observability::metrics;

#[derive(Debug)]
struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    access: HashMap<String, u64>,
    tick: u64,
}

impl<V> CacheStore<V> {
    fn touch(&mut self, key: &str) {
        self.tick += 1;
        self.access.insert(key.to_string(), self.tick);
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        self.access.remove(key);
        self.entries.remove(key)
    }

    fn evict_least_recent(&mut self) -> Option<String> {
        let oldest = self
            .access
            .iter()
            .min_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)))
            .map(|(key, _)| key.clone())?;
        self.remove(&oldest);
        Some(oldest)
    }
}

/// In-memory cache keyed by request key.
#[derive(Debug)]
pub struct TtlCache<V> {
    default_ttl: Duration,
    max_size: usize,
    store: Mutex<CacheStore<V>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache. A `max_size` of zero is treated as one.
    pub fn new(default_ttl: Duration, max_size: usize) -> Self {
        Self {
            default_ttl,
            max_size: max_size.max(1),
            store: Mutex::new(CacheStore {
                entries: HashMap::new(),
                access: HashMap::new(),
                tick: 0,
            }),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Look up a live entry, refreshing its access tick.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut store = self.lock_store();

        let expired = match store.entries.get(key) {
            None => {
                metrics::record_cache_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            store.remove(key);
            tracing::debug!(key = %key, "Cache entry expired");
            metrics::record_cache_miss();
            metrics::record_cache_size(store.entries.len());
            return None;
        }

        store.touch(key);
        metrics::record_cache_hit();
        store.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store `value` under `key` with the default TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Store `value` under `key`, expiring `ttl` from now.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let mut store = self.lock_store();

        if !store.entries.contains_key(&key) && store.entries.len() >= self.max_size {
            if let Some(evicted) = store.evict_least_recent() {
                tracing::debug!(key = %evicted, max_size = self.max_size, "Evicted cache entry");
                metrics::record_cache_eviction();
            }
        }

        store.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        store.touch(&key);
        metrics::record_cache_size(store.entries.len());
    }

    /// True if a live entry exists. Does not refresh the access tick.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock_store()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Remove an entry, returning its value if it was still live.
    pub fn remove(&self, key: &str) -> Option<V> {
        let mut store = self.lock_store();
        let removed = store.remove(key);
        metrics::record_cache_size(store.entries.len());
        removed
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value)
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut store = self.lock_store();
        let expired: Vec<String> = store
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            store.remove(key);
        }
        metrics::record_cache_size(store.entries.len());
        expired.len()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        let mut store = self.lock_store();
        store.entries.clear();
        store.access.clear();
        metrics::record_cache_size(0);
    }

    /// Number of stored entries, including expired ones not yet discovered.
    pub fn size(&self) -> usize {
        self.lock_store().entries.len()
    }

    fn lock_store(&self) -> MutexGuard<'_, CacheStore<V>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
