// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Knowledge Base
//!
//! Owns the learned corpus. Readers take an immutable snapshot and never
//! block on writers; appends are serialized and publish a new snapshot before
//! rewriting the backing store.

use crate::domain::{seed_entries, KnowledgeEntry, KnowledgeError, KnowledgeStore};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

pub struct KnowledgeBase {
    store: Arc<dyn KnowledgeStore>,
    entries: RwLock<Arc<Vec<KnowledgeEntry>>>,
    write_lock: Mutex<()>,
    // Set when load could not read the store; cleared once it is moved aside
    unreadable: AtomicBool,
}

impl KnowledgeBase {
    /// Load the corpus from `store`.
    ///
    /// An absent or empty store is initialised with the seed set. A store that
    /// cannot be read is left untouched and the seed set is served from
    /// memory; the first append moves the unreadable store aside before
    /// writing.
    pub async fn load(store: Arc<dyn KnowledgeStore>) -> Self {
        let mut unreadable = false;
        let entries = match store.read_all().await {
            Ok(Some(entries)) if !entries.is_empty() => {
                info!(location = %store.location(), entries = entries.len(), "Loaded knowledge base");
                entries
            }
            Ok(_) => {
                let seed = seed_entries();
                match store.write_all(&seed).await {
                    Ok(()) => info!(location = %store.location(), "Created knowledge base with seed data"),
                    Err(e) => warn!(error = %e, "Failed to persist seed data, continuing in memory"),
                }
                seed
            }
            Err(e) => {
                error!(error = %e, "Failed to load knowledge base, falling back to seed data");
                unreadable = true;
                seed_entries()
            }
        };

        let kb = Self::from_entries(store, entries);
        kb.unreadable.store(unreadable, Ordering::SeqCst);
        kb
    }

    /// Wrap an existing collection without touching the store.
    pub fn from_entries(store: Arc<dyn KnowledgeStore>, entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            store,
            entries: RwLock::new(Arc::new(entries)),
            write_lock: Mutex::new(()),
            unreadable: AtomicBool::new(false),
        }
    }

    /// Snapshot reflecting every append made so far in this process.
    pub fn all(&self) -> Arc<Vec<KnowledgeEntry>> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Add `entry` and rewrite the backing store.
    ///
    /// The entry stays in memory even when the rewrite fails; the error is
    /// returned so callers can report it. A store that failed to load is
    /// never overwritten in place.
    pub async fn append(&self, entry: KnowledgeEntry) -> Result<(), KnowledgeError> {
        let _guard = self.write_lock.lock().await;

        let updated = {
            let current = self.entries.read();
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(entry);
            Arc::new(next)
        };
        *self.entries.write() = updated.clone();

        let result = match self.set_aside_unreadable().await {
            Ok(()) => self.store.write_all(&updated).await,
            Err(e) => Err(e),
        };
        let persisted = if result.is_ok() { "true" } else { "false" };
        metrics::counter!("parley_knowledge_appends_total", "persisted" => persisted).increment(1);

        match &result {
            Ok(()) => info!(entries = updated.len(), "Knowledge base updated"),
            Err(e) => error!(error = %e, "Failed to persist knowledge base, entry kept in memory"),
        }
        result
    }

    async fn set_aside_unreadable(&self) -> Result<(), KnowledgeError> {
        if !self.unreadable.load(Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(moved_to) = self.store.quarantine().await? {
            warn!(
                location = %self.store.location(),
                moved_to = %moved_to,
                "Moved unreadable knowledge store aside"
            );
        }
        self.unreadable.store(false, Ordering::SeqCst);
        Ok(())
    }
}
