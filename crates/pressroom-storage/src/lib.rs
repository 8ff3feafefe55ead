//! Pressroom Storage Library
//!
//! Asset store abstraction and backends for article imagery.
//!
//! # Key format
//!
//! Keys are prefix-scoped: `articles/{stamp}`, `featured/{stamp}-{name}`,
//! `verify/{user}/{label}-{stamp}.png`. Keys derive from a millisecond
//! timestamp plus a random suffix, never from content, so uploading the
//! same bytes twice yields two distinct objects. Keys must not contain
//! `..` or a leading `/`. Key generation is centralized in the `keys`
//! module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_asset_store;
#[cfg(feature = "storage-local")]
pub use local::LocalAssetStore;
pub use memory::MemoryAssetStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3AssetStore;
pub use traits::{AssetStore, StorageError, StorageResult};
