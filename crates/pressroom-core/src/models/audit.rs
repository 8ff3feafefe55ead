use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audit event types for privileged operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// Article insert or update (attempted or committed).
    ArticleUpsert,
    /// Asset upload through the elevated fallback path.
    Upload,
}

impl AuditEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEventType::ArticleUpsert => "article_upsert",
            AuditEventType::Upload => "upload",
        }
    }
}

/// One append-only audit row.
///
/// Audit entries are observability, not a commit record: they are written
/// best-effort and their failure must never fail the operation they
/// document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub user_id: Uuid,
    pub event_type: AuditEventType,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(user_id: Uuid, event_type: AuditEventType, details: serde_json::Value) -> Self {
        Self {
            user_id,
            event_type,
            details,
            created_at: Utc::now(),
        }
    }
}
