// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Knowledge entries and the persistence port for the learned corpus.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A learned query/response pair.
///
/// `query` keeps the phrasing the user originally typed or said. Matching
/// normalizes it again on every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub query: String,
    pub response: String,
}

impl KnowledgeEntry {
    pub fn new(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
        }
    }
}

/// Entries written to a fresh store on first run.
pub fn seed_entries() -> Vec<KnowledgeEntry> {
    vec![
        KnowledgeEntry::new("hello", "Hi! How can I help you today?"),
        KnowledgeEntry::new("how are you", "I'm doing well, thank you for asking!"),
        KnowledgeEntry::new("what is your name", "I'm a chatbot assistant, nice to meet you!"),
        KnowledgeEntry::new("goodbye", "Goodbye! Have a great day!"),
        KnowledgeEntry::new("thanks", "You're welcome!"),
    ]
}

#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    #[error("Failed to read knowledge store {location}: {reason}")]
    Read { location: String, reason: String },

    #[error("Failed to write knowledge store {location}: {reason}")]
    Write { location: String, reason: String },

    #[error("Knowledge store {location} is malformed: {reason}")]
    Malformed { location: String, reason: String },
}

/// Durable backing store for the knowledge base.
///
/// Implementations rewrite the whole collection on every write and must never
/// leave a half-written store behind.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Read the persisted entries. `Ok(None)` means the store does not exist
    /// yet or is empty.
    async fn read_all(&self) -> Result<Option<Vec<KnowledgeEntry>>, KnowledgeError>;

    /// Replace the persisted collection with `entries`.
    async fn write_all(&self, entries: &[KnowledgeEntry]) -> Result<(), KnowledgeError>;

    /// Move an unreadable store out of the way so the next write does not
    /// destroy it. Returns where the old content went, or `None` if there
    /// was nothing to move.
    async fn quarantine(&self) -> Result<Option<String>, KnowledgeError> {
        Ok(None)
    }

    /// Human-readable location, used in logs.
    fn location(&self) -> String;
}
