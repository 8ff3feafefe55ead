use crate::traits::{AssetStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};

/// S3-compatible asset store
#[derive(Clone)]
pub struct S3AssetStore {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    public_base_url: Option<String>,
}

impl S3AssetStore {
    /// Create a new S3AssetStore
    ///
    /// # Arguments
    /// * `bucket` - bucket name (normally `article-images`)
    /// * `region` - AWS region, or a region identifier for S3-compatible providers
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `public_base_url` - Optional CDN/base URL overriding the derived public URL
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_base_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3AssetStore {
            store,
            bucket,
            region,
            endpoint_url,
            public_base_url,
        })
    }

    fn generate_url(&self, key: &str) -> String {
        if let Some(ref base) = self.public_base_url {
            return format!("{}/{}", base.trim_end_matches('/'), key);
        }
        if let Some(ref endpoint) = self.endpoint_url {
            // Path-style for S3-compatible providers: {endpoint}/{bucket}/{key}
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl AssetStore for S3AssetStore {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        let size = data.len() as u64;
        let bytes = Bytes::from(data);
        let location = Path::from(key.to_string());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.put(&location, PutPayload::from(bytes)).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(key.to_string())
    }

    fn public_url(&self, key: &str) -> String {
        self.generate_url(key)
    }

    async fn delete(&self, keys: &[String]) -> StorageResult<()> {
        for key in keys {
            let location = Path::from(key.to_string());
            let result: ObjectResult<_> = self.store.delete(&location).await;
            match result {
                Ok(()) => {}
                Err(ObjectStoreError::NotFound { .. }) => {}
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %key,
                        "S3 delete failed"
                    );
                    return Err(StorageError::DeleteFailed(e.to_string()));
                }
            }
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let location = Path::from(key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with(endpoint: Option<&str>, public_base: Option<&str>) -> S3AssetStore {
        S3AssetStore::new(
            "article-images".to_string(),
            "ap-south-1".to_string(),
            endpoint.map(String::from),
            public_base.map(String::from),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_public_url_aws_format() {
        let store = store_with(None, None).await;
        assert_eq!(
            store.public_url("articles/1-a.png"),
            "https://article-images.s3.ap-south-1.amazonaws.com/articles/1-a.png"
        );
    }

    #[tokio::test]
    async fn test_public_url_custom_endpoint_is_path_style() {
        let store = store_with(Some("http://localhost:9000/"), None).await;
        assert_eq!(
            store.public_url("articles/1-a.png"),
            "http://localhost:9000/article-images/articles/1-a.png"
        );
    }

    #[tokio::test]
    async fn test_public_url_prefers_cdn_base() {
        let store = store_with(Some("http://localhost:9000"), Some("https://cdn.example.com")).await;
        assert_eq!(
            store.public_url("featured/1-a.jpg"),
            "https://cdn.example.com/featured/1-a.jpg"
        );
    }
}
