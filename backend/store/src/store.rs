use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use glossbot_core::{EntrySummary, GlossError, GlossaryEntry, GlossaryStore};

/// Simple in-memory glossary for tests and `GLOSSBOT_STORE=memory`.
#[derive(Clone, Default)]
pub struct InMemoryGlossaryStore {
    entries: Arc<RwLock<HashMap<String, GlossaryEntry>>>,
}

impl InMemoryGlossaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    GlossError::Storage("in-memory glossary lock poisoned".into()).into()
}

#[async_trait]
impl GlossaryStore for InMemoryGlossaryStore {
    async fn get(&self, keyword: &str) -> Result<Option<GlossaryEntry>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(keyword).cloned())
    }

    async fn put(&self, entry: GlossaryEntry) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(entry.keyword.clone(), entry);
        Ok(())
    }

    async fn update_description(&self, keyword: &str, description: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries
            .entry(keyword.to_string())
            .and_modify(|e| e.description = description.to_string())
            .or_insert_with(|| GlossaryEntry {
                keyword: keyword.to_string(),
                description: description.to_string(),
                created_at: None,
            });
        Ok(())
    }

    async fn delete(&self, keyword: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(keyword);
        Ok(())
    }

    async fn scan_summaries(&self) -> Result<Vec<EntrySummary>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.values().map(GlossaryEntry::summary).collect())
    }

    async fn scan_keywords(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryGlossaryStore::new();
        store.put(GlossaryEntry::new("rust", "a language")).await.unwrap();

        let entry = store.get("rust").await.unwrap().unwrap();
        assert_eq!(entry.description, "a language");
        assert!(store.get("Rust").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let store = InMemoryGlossaryStore::new();
        store
            .put(GlossaryEntry::new("rust", "old").with_created_at(42))
            .await
            .unwrap();
        store.update_description("rust", "new").await.unwrap();

        let entry = store.get("rust").await.unwrap().unwrap();
        assert_eq!(entry.description, "new");
        assert_eq!(entry.created_at, Some(42));
    }

    #[tokio::test]
    async fn test_update_missing_creates_untimestamped_row() {
        let store = InMemoryGlossaryStore::new();
        store.update_description("ghost", "boo").await.unwrap();

        let entry = store.get("ghost").await.unwrap().unwrap();
        assert_eq!(entry.description, "boo");
        assert_eq!(entry.created_at, None);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = InMemoryGlossaryStore::new();
        store.delete("nothing").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_a_storage_error() {
        let store = InMemoryGlossaryStore::new();
        let entries = store.entries.clone();
        let _ = std::thread::spawn(move || {
            let _guard = entries.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        let err = store.get("rust").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GlossError>(),
            Some(GlossError::Storage(_))
        ));
        assert!(store.scan_keywords().await.is_err());
    }
}
