//! In-process object store
//!
//! Keeps objects in a map. Used by tests and for running the server
//! without an S3 endpoint (`S3_PROVIDER=memory`).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::StorageError;

use super::types::{encode_key, ObjectMetadata, StoredObject};
use super::ObjectStore;

struct Entry {
    data: Vec<u8>,
    content_type: String,
    stored_at: DateTime<Utc>,
}

/// Map-backed object store
#[derive(Clone)]
pub struct MemoryStore {
    objects: Arc<RwLock<BTreeMap<String, Entry>>>,
    base_url: String,
}

impl MemoryStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            objects: Arc::new(RwLock::new(BTreeMap::new())),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// All keys in lexical order
    pub fn keys(&self) -> Vec<String> {
        self.objects.read().keys().cloned().collect()
    }

    /// Stored bytes for a key
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().get(key).map(|e| e.data.clone())
    }

    /// Content type recorded for a key
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects.read().get(key).map(|e| e.content_type.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory://slipscan")
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn store(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let size = data.len();
        self.objects.write().insert(
            key.to_string(),
            Entry {
                data,
                content_type: content_type.to_string(),
                stored_at: Utc::now(),
            },
        );

        Ok(StoredObject {
            key: key.to_string(),
            url: self.url_for(key),
            size,
        })
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.get(key)
            .ok_or_else(|| StorageError::ObjectNotFound(key.to_string()))
    }

    async fn list_where(
        &self,
        prefix: &str,
        limit: usize,
        keep: for<'a> fn(&'a str) -> bool,
    ) -> Result<Vec<ObjectMetadata>, StorageError> {
        let objects = self.objects.read();
        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix) && keep(key))
            .take(limit)
            .map(|(key, entry)| ObjectMetadata {
                key: key.clone(),
                size: entry.data.len() as i64,
                last_modified: Some(entry.stored_at),
                content_type: Some(entry.content_type.clone()),
            })
            .collect())
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, encode_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_fetch() {
        let store = MemoryStore::new("http://cdn.test/");
        let stored = store
            .store("uploaded_files/slip.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();

        assert_eq!(stored.url, "http://cdn.test/uploaded_files/slip.png");
        assert_eq!(stored.size, 3);
        assert_eq!(store.fetch("uploaded_files/slip.png").await.unwrap(), vec![1, 2, 3]);
        assert_eq!(store.content_type("uploaded_files/slip.png").as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let store = MemoryStore::default();
        let result = store.fetch("nope").await;
        assert!(matches!(result, Err(StorageError::ObjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_respects_prefix_and_limit() {
        let store = MemoryStore::default();
        for name in ["a/1.jpg", "a/2.jpg", "a/3.jpg", "b/1.jpg"] {
            store.store(name, vec![0], "image/jpeg").await.unwrap();
        }

        let listed = store.list("a/", 2).await.unwrap();
        let keys: Vec<_> = listed.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/1.jpg", "a/2.jpg"]);

        assert_eq!(store.list("b/", 50).await.unwrap().len(), 1);
        assert!(store.list("c/", 50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_where_limit_counts_kept_keys() {
        let store = MemoryStore::default();
        for name in ["a/0.csv", "a/1.csv", "a/2.jpg", "a/3.jpg"] {
            store.store(name, vec![0], "application/octet-stream").await.unwrap();
        }

        let listed = store.list_where("a/", 2, |key| key.ends_with(".jpg")).await.unwrap();
        let keys: Vec<_> = listed.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/2.jpg", "a/3.jpg"]);
    }
}
