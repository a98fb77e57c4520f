//! Storage module for processed artifacts
//!
//! Uploaded documents, annotated pages, CSV exports and charts all go
//! through the [`ObjectStore`] capability. S3-compatible backends (MinIO,
//! Cloudflare R2, Backblaze B2, AWS S3) are served by [`S3Client`].

mod memory;
mod s3_client;
mod types;

use async_trait::async_trait;

use crate::error::StorageError;

pub use memory::MemoryStore;
pub use s3_client::S3Client;
pub use types::*;

/// Object storage capability
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under `key` and return the public location
    async fn store(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Read an object's bytes
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// List at most `limit` objects under `prefix`, in key order
    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<ObjectMetadata>, StorageError> {
        self.list_where(prefix, limit, |_| true).await
    }

    /// List at most `limit` objects under `prefix` whose key passes `keep`.
    ///
    /// The limit counts kept objects only, so listing continues past
    /// rejected keys.
    async fn list_where(
        &self,
        prefix: &str,
        limit: usize,
        keep: for<'a> fn(&'a str) -> bool,
    ) -> Result<Vec<ObjectMetadata>, StorageError>;

    /// Public URL for a key
    fn url_for(&self, key: &str) -> String;
}
