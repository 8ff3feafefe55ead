#[cfg(feature = "storage-local")]
use crate::LocalAssetStore;
#[cfg(feature = "storage-s3")]
use crate::S3AssetStore;
use crate::{AssetStore, StorageError, StorageResult};
use pressroom_core::config::{StorageBackendKind, StorageConfig};
use std::sync::Arc;

/// Create an asset store backend from configuration
pub async fn create_asset_store(config: &StorageConfig) -> StorageResult<Arc<dyn AssetStore>> {
    match config.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackendKind::S3 => {
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION not configured".to_string())
            })?;
            let store = S3AssetStore::new(
                config.bucket.clone(),
                region,
                config.s3_endpoint.clone(),
                config.s3_public_base_url.clone(),
            )
            .await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackendKind::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackendKind::Local => {
            let store = LocalAssetStore::new(
                config.local_path.clone(),
                config.local_base_url.clone(),
            )
            .await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackendKind::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
