//! Production wiring for the verification harness.

use async_trait::async_trait;
use pressroom_core::config::AuthConfig;
use pressroom_core::models::{Credentials, Session};
use pressroom_db::{
    ArticleRepository, ArticleStore, AuditLogRepository, AuditStore, ProfileRepository,
    ProfileStore,
};
use pressroom_publish::{AuthError, ClientContext, GoTrueResolver, VerifyEnvironment};
use pressroom_storage::AssetStore;
use sqlx::PgPool;
use std::sync::Arc;

/// Harness environment backed by the live auth endpoint, the database
/// pool, and the configured asset store.
///
/// The process connects with its own credentials, so the client and
/// elevated contexts share the same underlying stores here; the
/// distinction carries real weight only against the hosted API, where
/// each context holds its own key. Sign-in still goes through the real
/// endpoint, which is the part the harness exists to check.
pub struct LiveVerifyEnvironment {
    resolver: GoTrueResolver,
    assets: Arc<dyn AssetStore>,
    articles: Arc<dyn ArticleStore>,
    profiles: Arc<dyn ProfileStore>,
    audit: Arc<dyn AuditStore>,
    has_service_role: bool,
}

impl LiveVerifyEnvironment {
    pub fn new(auth: &AuthConfig, pool: PgPool, assets: Arc<dyn AssetStore>) -> Self {
        Self {
            resolver: GoTrueResolver::new(auth),
            assets,
            articles: Arc::new(ArticleRepository::new(pool.clone())),
            profiles: Arc::new(ProfileRepository::new(pool.clone())),
            audit: Arc::new(AuditLogRepository::new(pool)),
            has_service_role: auth.service_role_key.is_some(),
        }
    }
}

#[async_trait]
impl VerifyEnvironment for LiveVerifyEnvironment {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        self.resolver.sign_in(credentials).await
    }

    fn client(&self, _session: &Session) -> ClientContext {
        ClientContext {
            assets: self.assets.clone(),
            articles: self.articles.clone(),
        }
    }

    fn elevated(&self) -> Option<ClientContext> {
        if self.has_service_role {
            Some(ClientContext {
                assets: self.assets.clone(),
                articles: self.articles.clone(),
            })
        } else {
            None
        }
    }

    fn profiles(&self) -> Arc<dyn ProfileStore> {
        self.profiles.clone()
    }

    fn audit(&self) -> Arc<dyn AuditStore> {
        self.audit.clone()
    }
}
