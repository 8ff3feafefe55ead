use crate::traits::AuditStore;
use async_trait::async_trait;
use pressroom_core::models::AuditEvent;
use pressroom_core::AppError;
use sqlx::PgPool;

/// Append-only audit log repository over Postgres.
///
/// The table name keeps the original deployment's `admin_fallbacks` so
/// existing dashboards keep working.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn record(&self, event: AuditEvent) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO admin_fallbacks (user_id, event_type, details, created_at) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(event.user_id)
        .bind(event.event_type.as_str())
        .bind(&event.details)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
