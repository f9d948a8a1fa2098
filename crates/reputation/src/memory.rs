//! In-memory reputation store
//!
//! Backs development and tests. Entry locking in the map serializes
//! same-source access; production deployments plug in a durable store
//! behind the same trait.

use async_trait::async_trait;
use dashmap::DashMap;

use newsflow_core::{ReputationStore, Result, SourceReputationRecord};

/// DashMap-backed reputation store
#[derive(Debug, Default)]
pub struct InMemoryReputationStore {
    records: DashMap<String, SourceReputationRecord>,
}

impl InMemoryReputationStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Number of sources seen so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ReputationStore for InMemoryReputationStore {
    async fn get_or_create(
        &self,
        source_name: &str,
        default_score: u8,
    ) -> Result<SourceReputationRecord> {
        let record = self
            .records
            .entry(source_name.to_string())
            .or_insert_with(|| SourceReputationRecord::new(source_name, default_score));
        Ok(record.clone())
    }

    async fn update(&self, record: &SourceReputationRecord) -> Result<()> {
        self.records
            .insert(record.source_name.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let store = InMemoryReputationStore::new();
        let first = store.get_or_create("src", 50).await.unwrap();
        let second = store.get_or_create("src", 99).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_update_round_trips() {
        let store = InMemoryReputationStore::new();
        let mut record = store.get_or_create("src", 50).await.unwrap();
        record.total_articles = 3;
        record.reputation_score = 77;
        store.update(&record).await.unwrap();

        let read_back = store.get_or_create("src", 50).await.unwrap();
        assert_eq!(read_back.total_articles, 3);
        assert_eq!(read_back.reputation_score, 77);
    }
}
