//! Pressroom Database Layer
//!
//! Postgres repositories for articles, authorization profiles, and the
//! audit log, plus the store traits the pipeline and verification harness
//! consume. The traits exist so callers can run against in-memory fakes in
//! tests; the repositories are the production implementations.

pub mod db;
pub mod test_helpers;
pub mod traits;

// Re-exports: repositories
pub use db::{ArticleRepository, AuditLogRepository, ProfileRepository};

// Re-exports: store traits
pub use traits::{ArticleStore, AuditStore, ProfileStore};
