//! S3-compatible storage client
//!
//! Wraps the AWS SDK for S3-compatible storage access.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};
use chrono::DateTime;

use crate::config::StorageConfig;
use crate::error::StorageError;

use super::types::{encode_key, ListOptions, ObjectMetadata, StoredObject};
use super::ObjectStore;

/// S3-compatible storage client
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3Client {
    /// Create a new S3 client from configuration
    pub async fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "slipscan",
        );

        let region = config
            .region
            .clone()
            .unwrap_or_else(|| "us-east-1".to_string());

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(region))
            .credentials_provider(credentials)
            .force_path_style(true) // Required for MinIO and other S3-compatible services
            .build();

        let client = Client::from_conf(s3_config);

        // Test connection by checking if bucket exists
        let bucket = config.bucket.clone();
        match client.head_bucket().bucket(&bucket).send().await {
            Ok(_) => {
                tracing::info!("Connected to S3 bucket: {}", bucket);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not verify bucket {}: {}. Will attempt operations anyway.",
                    bucket,
                    e
                );
            }
        }

        let public_url = config
            .public_url
            .clone()
            .unwrap_or_else(|| format!("{}/{}", config.endpoint.trim_end_matches('/'), bucket));

        Ok(Self {
            client,
            bucket,
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// List one page of objects in the bucket
    async fn list_page(
        &self,
        options: ListOptions,
    ) -> Result<(Vec<ObjectMetadata>, Option<String>), StorageError> {
        let mut request = self.client.list_objects_v2().bucket(&self.bucket);

        if let Some(prefix) = options.prefix {
            request = request.prefix(prefix);
        }

        if let Some(max_keys) = options.max_keys {
            request = request.max_keys(max_keys);
        }

        if let Some(token) = options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::SdkError(format!("Failed to list objects: {}", e)))?;

        let objects = response
            .contents()
            .iter()
            .map(|obj| ObjectMetadata {
                key: obj.key().unwrap_or_default().to_string(),
                size: obj.size().unwrap_or(0),
                last_modified: obj
                    .last_modified()
                    .and_then(|dt| DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())),
                content_type: None, // Not available in list response
            })
            .collect();

        let next = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(|s| s.to_string())
        } else {
            None
        };

        Ok((objects, next))
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn store(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("AccessDenied") {
                    StorageError::AccessDenied(key.to_string())
                } else {
                    StorageError::SdkError(format!("Failed to put object {}: {}", key, e))
                }
            })?;

        tracing::debug!(key = %key, size, "Stored object");

        Ok(StoredObject {
            key: key.to_string(),
            url: self.url_for(key),
            size,
        })
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("404") || e.to_string().contains("NoSuchKey") {
                    StorageError::ObjectNotFound(key.to_string())
                } else {
                    StorageError::SdkError(format!("Failed to get object {}: {}", key, e))
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::SdkError(format!("Failed to read object body: {}", e)))?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    async fn list_where(
        &self,
        prefix: &str,
        limit: usize,
        keep: for<'a> fn(&'a str) -> bool,
    ) -> Result<Vec<ObjectMetadata>, StorageError> {
        let mut all_objects = Vec::new();
        let mut continuation_token = None;

        while all_objects.len() < limit {
            let remaining = (limit - all_objects.len()).min(1000) as i32;
            let mut options = ListOptions::new()
                .with_prefix(prefix)
                .with_max_keys(remaining);

            if let Some(token) = continuation_token.take() {
                options = options.with_continuation_token(token);
            }

            let (objects, next) = self.list_page(options).await?;
            all_objects.extend(objects.into_iter().filter(|o| keep(&o.key)));

            match next {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }

        all_objects.truncate(limit);
        Ok(all_objects)
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, encode_key(key))
    }
}
