use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::store::{Collection, DocumentStore, StoreError, UniqueIndex};

/// Process-local store for tests and `STORE_BACKEND=memory`. Nothing survives
/// a restart.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<Collection, HashMap<String, String>>>,
    indexes: Mutex<HashMap<UniqueIndex, HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .documents
            .lock()
            .await
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn put(
        &self,
        collection: Collection,
        id: &str,
        document: String,
    ) -> Result<(), StoreError> {
        self.documents
            .lock()
            .await
            .entry(collection)
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        collection: Collection,
        id: &str,
        expected: &str,
        document: String,
    ) -> Result<bool, StoreError> {
        let mut documents = self.documents.lock().await;

        match documents.get_mut(&collection).and_then(|docs| docs.get_mut(id)) {
            Some(current) if current == expected => {
                *current = document;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .documents
            .lock()
            .await
            .get_mut(&collection)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    async fn all(&self, collection: Collection) -> Result<Vec<String>, StoreError> {
        Ok(self
            .documents
            .lock()
            .await
            .get(&collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        self.documents.lock().await.remove(&collection);
        Ok(())
    }

    async fn claim(&self, index: UniqueIndex, key: &str, id: &str) -> Result<bool, StoreError> {
        let mut indexes = self.indexes.lock().await;
        let entries = indexes.entry(index).or_default();

        if entries.contains_key(key) {
            return Ok(false);
        }

        entries.insert(key.to_string(), id.to_string());
        Ok(true)
    }

    async fn lookup(&self, index: UniqueIndex, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .indexes
            .lock()
            .await
            .get(&index)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn release(&self, index: UniqueIndex, key: &str) -> Result<(), StoreError> {
        if let Some(entries) = self.indexes.lock().await.get_mut(&index) {
            entries.remove(key);
        }
        Ok(())
    }

    async fn clear_index(&self, index: UniqueIndex) -> Result<(), StoreError> {
        self.indexes.lock().await.remove(&index);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_claim_is_exclusive() {
        let store = MemoryStore::new();

        assert!(store.claim(UniqueIndex::UserEmail, "a@b.co", "u1").await.unwrap());
        assert!(!store.claim(UniqueIndex::UserEmail, "a@b.co", "u2").await.unwrap());
        assert_eq!(
            store.lookup(UniqueIndex::UserEmail, "a@b.co").await.unwrap(),
            Some("u1".to_string())
        );

        store.release(UniqueIndex::UserEmail, "a@b.co").await.unwrap();
        assert!(store.claim(UniqueIndex::UserEmail, "a@b.co", "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_compare_and_swap() {
        let store = MemoryStore::new();
        store.put(Collection::Users, "u1", "v1".into()).await.unwrap();

        assert!(!store.compare_and_swap(Collection::Users, "u1", "v0", "v2".into()).await.unwrap());
        assert!(store.compare_and_swap(Collection::Users, "u1", "v1", "v2".into()).await.unwrap());
        assert_eq!(
            store.get(Collection::Users, "u1").await.unwrap(),
            Some("v2".to_string())
        );

        store.delete(Collection::Users, "u1").await.unwrap();
        assert!(!store.compare_and_swap(Collection::Users, "u1", "v2", "v3".into()).await.unwrap());
        assert!(store.get(Collection::Users, "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let store = MemoryStore::new();
        store.put(Collection::Cakes, "x", "{}".into()).await.unwrap();

        assert!(store.get(Collection::Orders, "x").await.unwrap().is_none());
        assert!(store.delete(Collection::Cakes, "x").await.unwrap());
        assert!(!store.delete(Collection::Cakes, "x").await.unwrap());
    }
}
