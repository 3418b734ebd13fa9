// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Knowledge store adapters.
//!
//! [`JsonFileKnowledgeStore`] keeps the corpus as a pretty-printed JSON array
//! and replaces it atomically: the new content is written to a sibling temp
//! file, then renamed over the original. [`InMemoryKnowledgeStore`] is used by
//! tests and by callers that do not need durability.

use crate::domain::{KnowledgeEntry, KnowledgeError, KnowledgeStore};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::AsyncWriteExt;

pub struct JsonFileKnowledgeStore {
    path: PathBuf,
}

impl JsonFileKnowledgeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "knowledge.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, reason: impl ToString) -> KnowledgeError {
        KnowledgeError::Write {
            location: self.location(),
            reason: reason.to_string(),
        }
    }
}

/// Write `bytes` to `path` and flush them to disk before returning, so a
/// later rename never publishes an empty file.
async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[async_trait]
impl KnowledgeStore for JsonFileKnowledgeStore {
    async fn read_all(&self) -> Result<Option<Vec<KnowledgeEntry>>, KnowledgeError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(KnowledgeError::Read {
                    location: self.location(),
                    reason: e.to_string(),
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let entries: Vec<KnowledgeEntry> =
            serde_json::from_str(&content).map_err(|e| KnowledgeError::Malformed {
                location: self.location(),
                reason: e.to_string(),
            })?;
        Ok(Some(entries))
    }

    async fn write_all(&self, entries: &[KnowledgeEntry]) -> Result<(), KnowledgeError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.write_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(entries).map_err(|e| self.write_error(e))?;

        let temp = self.temp_path();
        if let Err(e) = write_synced(&temp, json.as_bytes()).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.write_error(e));
        }

        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(self.write_error(e));
        }

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "Knowledge store rewritten");
        Ok(())
    }

    async fn quarantine(&self) -> Result<Option<String>, KnowledgeError> {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "knowledge.json".into());
        name.push(format!(
            ".corrupt-{}",
            chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ")
        ));
        let target = self.path.with_file_name(name);

        match tokio::fs::rename(&self.path, &target).await {
            Ok(()) => Ok(Some(target.display().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.write_error(format!(
                "cannot move unreadable store aside to {}: {}",
                target.display(),
                e
            ))),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Volatile store. `fail_writes` simulates a disk that rejects commits.
#[derive(Default)]
pub struct InMemoryKnowledgeStore {
    entries: RwLock<Option<Vec<KnowledgeEntry>>>,
    fail_writes: AtomicBool,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            entries: RwLock::new(Some(entries)),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Option<Vec<KnowledgeEntry>> {
        self.entries.read().clone()
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn read_all(&self) -> Result<Option<Vec<KnowledgeEntry>>, KnowledgeError> {
        Ok(self.entries.read().clone())
    }

    async fn write_all(&self, entries: &[KnowledgeEntry]) -> Result<(), KnowledgeError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KnowledgeError::Write {
                location: self.location(),
                reason: "writes disabled".to_string(),
            });
        }
        *self.entries.write() = Some(entries.to_vec());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::seed_entries;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileKnowledgeStore::new(dir.path().join("knowledge.json"));
        assert!(store.read_all().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("knowledge.json");
        let store = JsonFileKnowledgeStore::new(&path);

        let entries = seed_entries();
        store.write_all(&entries).await.unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.read_all().await.unwrap(), Some(entries));
    }

    #[tokio::test]
    async fn test_file_is_pretty_printed_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("knowledge.json");
        let store = JsonFileKnowledgeStore::new(&path);
        store
            .write_all(&[KnowledgeEntry::new("favorite color", "blue")])
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("[\n"));
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["query"], "favorite color");
        assert_eq!(value[0]["response"], "blue");
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("knowledge.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonFileKnowledgeStore::new(&path);
        assert!(matches!(
            store.read_all().await,
            Err(KnowledgeError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_temp_write_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("knowledge.json");
        let store = JsonFileKnowledgeStore::new(&path);
        store.write_all(&seed_entries()).await.unwrap();

        // A directory in the temp file's place makes the write fail
        std::fs::create_dir(store.temp_path()).unwrap();

        let result = store
            .write_all(&[KnowledgeEntry::new("favorite color", "blue")])
            .await;
        assert!(matches!(result, Err(KnowledgeError::Write { .. })));
        assert_eq!(store.read_all().await.unwrap(), Some(seed_entries()));
    }

    #[tokio::test]
    async fn test_quarantine_moves_file_aside() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("knowledge.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileKnowledgeStore::new(&path);

        let moved = store.quarantine().await.unwrap().unwrap();
        assert!(!path.exists());
        assert!(moved.contains("knowledge.json.corrupt-"));
        assert_eq!(std::fs::read_to_string(&moved).unwrap(), "{not json");

        // Nothing left to move
        assert_eq!(store.quarantine().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_in_memory_failing_writes() {
        let store = InMemoryKnowledgeStore::new();
        store.set_fail_writes(true);
        assert!(store.write_all(&seed_entries()).await.is_err());
        assert!(store.snapshot().is_none());

        store.set_fail_writes(false);
        store.write_all(&seed_entries()).await.unwrap();
        assert_eq!(store.snapshot().map(|e| e.len()), Some(5));
    }
}
