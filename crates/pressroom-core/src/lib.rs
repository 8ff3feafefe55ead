//! Pressroom Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! constants shared across all Pressroom components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{AuthConfig, DatabaseConfig, PressroomConfig, StorageBackendKind, StorageConfig};
pub use error::AppError;
pub use models::{
    ArticleDraft, ArticleRecord, AuditEvent, AuditEventType, Category, Credentials, FeaturedImage,
    Principal, Role, Session, UserIdentity,
};
