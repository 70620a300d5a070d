// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Short-TTL in-memory cache for aggregate statistics.
//!
//! Dashboard stats (revenue, lesson totals) are cheap to serve stale for
//! a couple of minutes and expensive to recompute on every request. Keys
//! are opaque strings built by the caller from the statistic name and its
//! filter scope (year, month); the cache never parses them.
//!
//! The clock is injected so tests can drive TTL expiry deterministically
//! instead of sleeping.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// Source of "now" for TTL checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct CacheEntry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
}

/// Key-value cache with a single per-instance TTL.
///
/// Reads and writes are unsynchronized beyond the underlying map: a
/// `set` race resolves last-writer-wins, and an expiry race costs at
/// most one recompute.
pub struct StatsCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> StatsCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Look up a key, treating entries past their TTL as misses.
    ///
    /// Expired entries are evicted on the way out so the map does not
    /// accumulate dead keys between recomputes.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();

        let expired = match self.entries.get(key) {
            Some(entry) => {
                if now - entry.inserted_at < self.ttl {
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(key);
            tracing::trace!(key, "Evicted expired stats cache entry");
        }

        None
    }

    /// Store a value, unconditionally overwriting and resetting the TTL.
    pub fn set(&self, key: &str, value: V) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: self.clock.now(),
            },
        );
    }

    /// Drop a key, e.g. when the caller's filter parameters change.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }
}
