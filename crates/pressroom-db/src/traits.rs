//! Store trait abstractions
//!
//! Minimal interfaces the publish pipeline and verification harness need
//! from the relational store, allowing in-memory fakes in tests without a
//! database.

use async_trait::async_trait;
use pressroom_core::models::{ArticleRecord, AuditEvent, Role};
use pressroom_core::AppError;
use uuid::Uuid;

/// Article row operations.
///
/// `upsert` keys on `id`: absent ⇒ insert, present ⇒ update. Concurrent
/// upserts of the same id serialize only at the store; last writer wins by
/// primary key.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn upsert(&self, record: ArticleRecord) -> Result<ArticleRecord, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<ArticleRecord>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

/// Authorization profile lookups and provisioning.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Current role for a user, or `None` when the user has no profile or
    /// an unrecognized role. Looked up per privileged call; never cached.
    async fn role_of(&self, user_id: Uuid) -> Result<Option<Role>, AppError>;

    /// Create a missing profile with a minimal elevated role, or elevate an
    /// existing profile that lacks one. Used by the verification harness so
    /// it can run against freshly provisioned identities.
    async fn ensure_elevated(&self, user_id: Uuid, full_name: Option<&str>)
        -> Result<(), AppError>;
}

/// Append-only audit log. Callers always treat `record` as fire-and-forget
/// with a local warn; a failed audit write never propagates.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn record(&self, event: AuditEvent) -> Result<(), AppError>;
}
