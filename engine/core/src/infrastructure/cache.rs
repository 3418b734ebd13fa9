// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Time-bounded memoization of external handler results.
//!
//! One instance is built at startup and handed to every handler that needs
//! it. Expired entries are not purged; they read as misses and get
//! overwritten by the next successful fetch.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    stored_at: Instant,
}

pub struct TtlCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached value for `key` if it is younger than the TTL.
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock();
        let hit = entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone());

        let result = if hit.is_some() { "hit" } else { "miss" };
        metrics::counter!("parley_cache_lookups_total", "result" => result).increment(1);
        tracing::trace!(key, result, "Cache lookup");
        hit
    }

    /// Overwrite `key`, stamped with the current time.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let entry = CacheEntry {
            value: value.into(),
            stored_at: Instant::now(),
        };
        self.entries.lock().insert(key.into(), entry);
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
