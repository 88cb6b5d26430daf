//! In-memory recent search store / 内存版最近搜索存储

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;

use super::RecentSearchStore;
use crate::error::StoreError;
use crate::models::RecentSearchEntry;

/// Keeps at most `limit` entries, front-to-back from newest to oldest
pub struct MemoryRecentStore {
    entries: Mutex<VecDeque<RecentSearchEntry>>,
    limit: usize,
}

impl MemoryRecentStore {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            limit,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl RecentSearchStore for MemoryRecentStore {
    async fn insert(&self, term: &str, created_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        entries.retain(|entry| entry.term != term);
        entries.push_front(RecentSearchEntry::new(term, created_at));
        entries.truncate(self.limit);
        Ok(())
    }

    async fn list_recent(&self) -> Result<Vec<RecentSearchEntry>, StoreError> {
        let entries = self.entries.lock();
        Ok(entries.iter().take(self.limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_most_recent_first_and_dedup() {
        let store = MemoryRecentStore::new(10);
        store.insert("cats", Utc::now()).await.unwrap();
        store.insert("dogs", Utc::now()).await.unwrap();
        store.insert("cats", Utc::now()).await.unwrap();

        let terms: Vec<String> = store
            .list_recent()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.term)
            .collect();
        assert_eq!(terms, vec!["cats", "dogs"]);
    }

    #[tokio::test]
    async fn test_limit() {
        let store = MemoryRecentStore::new(2);
        for term in ["a", "b", "c"] {
            store.insert(term, Utc::now()).await.unwrap();
        }
        assert_eq!(store.len(), 2);

        let listed = store.list_recent().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].term, "c");
        assert_eq!(listed[1].term, "b");
    }
}
