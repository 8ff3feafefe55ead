//! In-memory asset store.
//!
//! Backs unit tests and local experimentation. Supports per-key failure
//! injection so partial-failure paths (one bad asset among many, featured
//! image upload failure) can be exercised deterministically.

use crate::traits::{AssetStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MemoryAssetStore {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_prefixes: Arc<Mutex<HashSet<String>>>,
    base_url: String,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            fail_prefixes: Arc::new(Mutex::new(HashSet::new())),
            base_url: "https://assets.example.com".to_string(),
        }
    }

    /// Make every `put` whose key starts with `prefix` fail.
    pub fn fail_puts_with_prefix(&self, prefix: &str) {
        self.fail_prefixes.lock().unwrap().insert(prefix.to_string());
    }

    pub fn clear_failures(&self) {
        self.fail_prefixes.lock().unwrap().clear();
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

impl Default for MemoryAssetStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        let failing = self
            .fail_prefixes
            .lock()
            .unwrap()
            .iter()
            .any(|p| key.starts_with(p.as_str()));
        if failing {
            return Err(StorageError::UploadFailed(format!(
                "injected failure for {}",
                key
            )));
        }
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(key.to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    async fn delete(&self, keys: &[String]) -> StorageResult<()> {
        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.remove(key);
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryAssetStore::new();
        store.put("a/b.png", vec![1], "image/png").await.unwrap();
        assert!(store.exists("a/b.png").await.unwrap());
        store.delete(&["a/b.png".to_string()]).await.unwrap();
        assert!(!store.exists("a/b.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_failure_injection_scopes_by_prefix() {
        let store = MemoryAssetStore::new();
        store.fail_puts_with_prefix("articles/");
        assert!(store
            .put("articles/x.png", vec![0], "image/png")
            .await
            .is_err());
        assert!(store
            .put("featured/x.png", vec![0], "image/png")
            .await
            .is_ok());
    }
}
