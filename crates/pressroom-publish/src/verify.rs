//! End-to-end verification harness.
//!
//! Drives the same path a real editor session takes: sign in, make sure
//! the profile carries a publish role, upload a probe image, insert a
//! throwaway article pointing at it, then clean both up. The whole
//! sequence runs twice, once against the freshly signed-in client context
//! and once against a context rehydrated from the same session, because
//! authorization bugs tied to client construction only show up on the
//! second pass.

use crate::error::{AuthError, VerifyError, VerifyPhase};
use async_trait::async_trait;
use pressroom_core::constants::{
    VERIFY_ADMIN_ASSET_PREFIX, VERIFY_ASSET_PREFIX, VERIFY_UPLOAD_MAX_ATTEMPTS,
    VERIFY_UPLOAD_RETRY_DELAY_MS,
};
use pressroom_core::models::{
    ArticleRecord, AuditEvent, AuditEventType, Category, Credentials, Session,
};
use pressroom_db::{ArticleStore, AuditStore, ProfileStore};
use pressroom_storage::{keys, AssetStore};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// 1x1 transparent PNG used as the upload probe.
const PROBE_PNG: [u8; 70] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64,
    0x60, 0xf8, 0x5f, 0x0f, 0x00, 0x02, 0x87, 0x01, 0x80, 0xeb, 0x47, 0xba, 0x92, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Stores bound to one authorization context.
#[derive(Clone)]
pub struct ClientContext {
    pub assets: Arc<dyn AssetStore>,
    pub articles: Arc<dyn ArticleStore>,
}

/// The world the harness runs against. Production wires this to the live
/// auth endpoint and stores; tests substitute fakes.
#[async_trait]
pub trait VerifyEnvironment: Send + Sync {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Build stores scoped to the session's own authorization. Calling
    /// this a second time for the same session is session rehydration: a
    /// fresh client context, same tokens.
    fn client(&self, session: &Session) -> ClientContext;

    /// Elevated stores for the fallback path, when configured.
    fn elevated(&self) -> Option<ClientContext>;

    fn profiles(&self) -> Arc<dyn ProfileStore>;

    fn audit(&self) -> Arc<dyn AuditStore>;
}

/// Outcome of one attempt, for the report.
#[derive(Debug, Clone)]
pub struct AttemptReport {
    pub label: String,
    pub upload_attempts: u32,
    pub used_fallback_upload: bool,
    pub used_fallback_insert: bool,
    pub asset_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub attempts: Vec<AttemptReport>,
}

pub struct VerificationHarness<E> {
    env: E,
}

impl<E: VerifyEnvironment> VerificationHarness<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    /// Run the full verification sequence for the given credentials.
    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn verify(&self, credentials: &Credentials) -> Result<VerifyReport, VerifyError> {
        let session = self
            .env
            .sign_in(credentials)
            .await
            .map_err(|e| VerifyError::new(VerifyPhase::SignIn, "", anyhow::Error::new(e)))?;
        let user_id = session.user.id;
        tracing::info!(%user_id, "Signed in");

        self.env
            .profiles()
            .ensure_elevated(user_id, session.user.full_name.as_deref())
            .await
            .map_err(|e| {
                VerifyError::new(VerifyPhase::EnsureProfile, "", anyhow::Error::new(e))
            })?;

        let mut report = VerifyReport::default();

        let client = self.env.client(&session);
        report
            .attempts
            .push(self.run_attempt("initial", &client, user_id).await?);

        // Rehydrate: new client context from the same session.
        let client = self.env.client(&session);
        report
            .attempts
            .push(self.run_attempt("after-refresh", &client, user_id).await?);

        tracing::info!(attempts = report.attempts.len(), "Verification passed");
        Ok(report)
    }

    async fn run_attempt(
        &self,
        label: &str,
        client: &ClientContext,
        user_id: Uuid,
    ) -> Result<AttemptReport, VerifyError> {
        let upload = self.upload_probe(label, client, user_id).await?;

        let insert = self
            .insert_probe_article(label, client, user_id, &upload.url)
            .await;

        // Cleanup always runs for whatever the attempt produced, errors
        // swallowed: leftover probes must not poison the next run.
        let (article, used_fallback_insert) = match insert {
            Ok(pair) => pair,
            Err(e) => {
                self.cleanup(None, Some(&upload)).await;
                return Err(e);
            }
        };
        self.cleanup(Some(&article), Some(&upload)).await;

        Ok(AttemptReport {
            label: label.to_string(),
            upload_attempts: upload.attempts,
            used_fallback_upload: upload.used_fallback,
            used_fallback_insert,
            asset_url: upload.url,
        })
    }

    async fn upload_probe(
        &self,
        label: &str,
        client: &ClientContext,
        user_id: Uuid,
    ) -> Result<ProbeUpload, VerifyError> {
        let user = user_id.to_string();
        let mut last_err: Option<anyhow::Error> = None;

        for attempt in 1..=VERIFY_UPLOAD_MAX_ATTEMPTS {
            let key = keys::verify_key(VERIFY_ASSET_PREFIX, &user, label);
            match client.assets.put(&key, PROBE_PNG.to_vec(), "image/png").await {
                Ok(stored_key) => {
                    return Ok(ProbeUpload {
                        key: stored_key.clone(),
                        url: client.assets.public_url(&stored_key),
                        store: client.assets.clone(),
                        attempts: attempt,
                        used_fallback: false,
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, attempt, label, "Probe upload attempt failed");
                    last_err = Some(anyhow::Error::new(e));
                    if attempt < VERIFY_UPLOAD_MAX_ATTEMPTS {
                        tokio::time::sleep(Duration::from_millis(VERIFY_UPLOAD_RETRY_DELAY_MS))
                            .await;
                    }
                }
            }
        }

        let client_err =
            last_err.unwrap_or_else(|| anyhow::anyhow!("upload never attempted"));

        let Some(elevated) = self.env.elevated() else {
            return Err(VerifyError::new(VerifyPhase::Upload, label, client_err));
        };

        tracing::warn!(label, "Client uploads exhausted, trying elevated path");
        let key = keys::verify_key(VERIFY_ADMIN_ASSET_PREFIX, &user, label);
        match elevated.assets.put(&key, PROBE_PNG.to_vec(), "image/png").await {
            Ok(stored_key) => {
                self.audit_best_effort(AuditEvent::new(
                    user_id,
                    AuditEventType::Upload,
                    serde_json::json!({
                        "key": stored_key,
                        "label": label,
                        "client_error": client_err.to_string(),
                    }),
                ))
                .await;
                Ok(ProbeUpload {
                    key: stored_key.clone(),
                    url: elevated.assets.public_url(&stored_key),
                    store: elevated.assets.clone(),
                    attempts: VERIFY_UPLOAD_MAX_ATTEMPTS,
                    used_fallback: true,
                })
            }
            Err(e) => Err(VerifyError::new(
                VerifyPhase::Upload,
                label,
                anyhow::Error::new(e).context(format!("client path: {}", client_err)),
            )),
        }
    }

    async fn insert_probe_article(
        &self,
        label: &str,
        client: &ClientContext,
        user_id: Uuid,
        asset_url: &str,
    ) -> Result<(ProbeArticle, bool), VerifyError> {
        let record = probe_record(label, asset_url);

        let client_err = match client.articles.upsert(record.clone()).await {
            Ok(stored) => {
                return Ok((
                    ProbeArticle {
                        id: stored.id.unwrap_or_default(),
                        store: client.articles.clone(),
                    },
                    false,
                ))
            }
            Err(e) => e,
        };

        let Some(elevated) = self.env.elevated() else {
            return Err(VerifyError::new(
                VerifyPhase::ArticleInsert,
                label,
                anyhow::Error::new(client_err),
            ));
        };

        tracing::warn!(error = %client_err, label, "Client article insert failed, trying elevated path");
        match elevated.articles.upsert(record).await {
            Ok(stored) => {
                self.audit_best_effort(AuditEvent::new(
                    user_id,
                    AuditEventType::ArticleUpsert,
                    serde_json::json!({
                        "article_id": stored.id,
                        "label": label,
                        "client_error": client_err.to_string(),
                        "probe": true,
                    }),
                ))
                .await;
                Ok((
                    ProbeArticle {
                        id: stored.id.unwrap_or_default(),
                        store: elevated.articles.clone(),
                    },
                    true,
                ))
            }
            Err(e) => Err(VerifyError::new(
                VerifyPhase::ArticleInsert,
                label,
                anyhow::Error::new(e).context(format!("client path: {}", client_err)),
            )),
        }
    }

    /// Delete the article row first, then the asset. Each deletion goes
    /// through the store that created the resource.
    async fn cleanup(&self, article: Option<&ProbeArticle>, upload: Option<&ProbeUpload>) {
        if let Some(article) = article {
            if let Err(e) = article.store.delete(article.id).await {
                tracing::warn!(error = %e, article_id = %article.id, "Probe article cleanup failed");
            }
        }
        if let Some(upload) = upload {
            if let Err(e) = upload.store.delete(&[upload.key.clone()]).await {
                tracing::warn!(error = %e, key = %upload.key, "Probe asset cleanup failed");
            }
        }
    }

    async fn audit_best_effort(&self, event: AuditEvent) {
        if let Err(e) = self.env.audit().record(event).await {
            tracing::warn!(error = %e, "Audit write failed, continuing");
        }
    }
}

struct ProbeUpload {
    key: String,
    url: String,
    store: Arc<dyn AssetStore>,
    attempts: u32,
    used_fallback: bool,
}

struct ProbeArticle {
    id: Uuid,
    store: Arc<dyn ArticleStore>,
}

fn probe_record(label: &str, asset_url: &str) -> ArticleRecord {
    let title = format!("Verification probe ({})", label);
    let content = format!("<p>Automated verification probe.</p><img src=\"{}\" />", asset_url);
    ArticleRecord {
        id: None,
        title_hi: title.clone(),
        title_en: title,
        excerpt_hi: None,
        content_hi: content.clone(),
        content_en: content,
        category: Category::National,
        author: Some("verification".to_string()),
        location: None,
        is_breaking: false,
        image_url: Some(asset_url.to_string()),
        image_alt_text_hi: None,
        seo_title_hi: None,
        seo_keywords_hi: None,
        video_url: None,
        published_at: Some(chrono::Utc::now()),
        updated_at: Some(chrono::Utc::now()),
    }
}
