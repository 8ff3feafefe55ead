//! Asset store abstraction trait
//!
//! Defines the `AssetStore` trait that all storage backends implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Asset store abstraction
///
/// Backends (S3-compatible, local filesystem, in-memory) store opaque
/// binary objects under caller-generated keys and serve them at stable
/// public URLs. Collision avoidance is the caller's responsibility via the
/// `keys` module; `put` to an existing key overwrites.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store an object under `path` and return the stored path.
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String>;

    /// Public URL at which the object under `path` is served.
    ///
    /// Pure key-to-URL mapping; does not check that the object exists.
    fn public_url(&self, path: &str) -> String;

    /// Delete the given objects. Missing objects are not an error.
    async fn delete(&self, paths: &[String]) -> StorageResult<()>;

    /// Check whether an object exists under `path`.
    async fn exists(&self, path: &str) -> StorageResult<bool>;
}
