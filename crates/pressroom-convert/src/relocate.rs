//! Asset relocation: embedded image bytes → durable storage → public URL.

use crate::docx::EmbeddedAsset;
use pressroom_storage::{keys, AssetStore};
use std::sync::Arc;

/// Uploads embedded assets and returns their public URLs.
///
/// A failed upload degrades that one asset to an empty URL instead of
/// raising; a single bad image must not abort a whole conversion.
#[derive(Clone)]
pub struct AssetRelocator {
    store: Arc<dyn AssetStore>,
    prefix: String,
}

impl AssetRelocator {
    pub fn new(store: Arc<dyn AssetStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Upload one asset under a fresh collision-resistant key and return
    /// its public URL, or `""` when the upload fails.
    pub async fn relocate(&self, asset: &EmbeddedAsset) -> String {
        let key = keys::relocation_key(&self.prefix, extension_for(&asset.media_type));
        match self
            .store
            .put(&key, asset.bytes.clone(), &asset.media_type)
            .await
        {
            Ok(path) => self.store.public_url(&path),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    source_index = asset.source_index,
                    media_type = %asset.media_type,
                    "Asset relocation failed, reference degrades to empty"
                );
                String::new()
            }
        }
    }
}

fn extension_for(media_type: &str) -> Option<&'static str> {
    match media_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/bmp" => Some("bmp"),
        "image/webp" => Some("webp"),
        "image/tiff" => Some("tif"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_storage::MemoryAssetStore;

    fn asset(index: usize) -> EmbeddedAsset {
        EmbeddedAsset {
            source_index: index,
            media_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn test_relocate_uploads_and_returns_public_url() {
        let store = Arc::new(MemoryAssetStore::new());
        let relocator = AssetRelocator::new(store.clone(), "articles");
        let url = relocator.relocate(&asset(0)).await;
        assert!(url.starts_with("https://assets.example.com/articles/"));
        assert!(url.ends_with(".png"));
        assert_eq!(store.object_count(), 1);
    }

    #[tokio::test]
    async fn test_identical_bytes_never_collide() {
        let store = Arc::new(MemoryAssetStore::new());
        let relocator = AssetRelocator::new(store.clone(), "articles");
        let a = relocator.relocate(&asset(0)).await;
        let b = relocator.relocate(&asset(1)).await;
        assert_ne!(a, b);
        assert_eq!(store.object_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_upload_degrades_to_empty_url() {
        let store = Arc::new(MemoryAssetStore::new());
        store.fail_puts_with_prefix("articles/");
        let relocator = AssetRelocator::new(store.clone(), "articles");
        let url = relocator.relocate(&asset(0)).await;
        assert_eq!(url, "");
        assert_eq!(store.object_count(), 0);
    }
}
