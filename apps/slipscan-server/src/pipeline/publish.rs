//! Artifact upload

use crate::storage::{ObjectStore, StoredObject};

/// Store one artifact; failures are logged and reported as `None`
pub async fn publish(
    store: &dyn ObjectStore,
    key: &str,
    data: Vec<u8>,
    content_type: &str,
) -> Option<StoredObject> {
    let size = data.len();
    match store.store(key, data, content_type).await {
        Ok(stored) => {
            tracing::debug!(key = %key, size, "Artifact stored");
            Some(stored)
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Artifact upload failed, omitting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::{MemoryStore, ObjectMetadata};
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl ObjectStore for BrokenStore {
        async fn store(&self, _key: &str, _data: Vec<u8>, _ct: &str) -> Result<StoredObject, StorageError> {
            Err(StorageError::ConnectionFailed("offline".into()))
        }

        async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
            Err(StorageError::ObjectNotFound(key.into()))
        }

        async fn list_where(
            &self,
            _prefix: &str,
            _limit: usize,
            _keep: for<'a> fn(&'a str) -> bool,
        ) -> Result<Vec<ObjectMetadata>, StorageError> {
            Ok(Vec::new())
        }

        fn url_for(&self, key: &str) -> String {
            key.to_string()
        }
    }

    #[tokio::test]
    async fn test_publish_returns_url() {
        let store = MemoryStore::new("http://files");
        let stored = publish(&store, "a/b.png", vec![1, 2], "image/png").await.unwrap();
        assert_eq!(stored.url, "http://files/a/b.png");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_publish_failure_is_omitted() {
        assert!(publish(&BrokenStore, "a/b.png", vec![1], "image/png").await.is_none());
    }
}
