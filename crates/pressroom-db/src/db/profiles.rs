use crate::traits::ProfileStore;
use async_trait::async_trait;
use pressroom_core::models::Role;
use pressroom_core::AppError;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Authorization profile repository over Postgres.
///
/// `profiles.role` is free text in the schema; only `admin` and `superuser`
/// grant anything. Unrecognized values read back as no role.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn role_of(&self, user_id: Uuid) -> Result<Option<Role>, AppError> {
        let row = sqlx::query("SELECT role FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let role: Option<String> = row.try_get("role")?;
        Ok(role.and_then(|r| r.parse().ok()))
    }

    async fn ensure_elevated(
        &self,
        user_id: Uuid,
        full_name: Option<&str>,
    ) -> Result<(), AppError> {
        match self.role_of(user_id).await? {
            Some(_) => Ok(()),
            None => {
                // Covers both a missing profile row and a row with an
                // unprivileged role.
                sqlx::query(
                    "INSERT INTO profiles (id, full_name, role) VALUES ($1, $2, 'admin') \
                     ON CONFLICT (id) DO UPDATE SET role = 'admin'",
                )
                .bind(user_id)
                .bind(full_name)
                .execute(&self.pool)
                .await?;
                tracing::info!(user_id = %user_id, "Provisioned admin profile");
                Ok(())
            }
        }
    }
}
