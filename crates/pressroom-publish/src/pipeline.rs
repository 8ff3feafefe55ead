//! The article publish pipeline.

use crate::error::PublishError;
use chrono::Utc;
use pressroom_core::constants::FEATURED_IMAGE_PREFIX;
use pressroom_core::models::{
    ArticleDraft, ArticleRecord, AuditEvent, AuditEventType, FeaturedImage, Principal,
};
use pressroom_db::{ArticleStore, AuditStore};
use pressroom_storage::{keys, AssetStore};
use std::sync::Arc;
use uuid::Uuid;

/// Single write path for articles.
///
/// Failure ordering is strict: the role gate rejects before any write, a
/// featured image failure aborts before any article write, and the article
/// write itself goes through the primary store first with an optional
/// elevated fallback. Audit entries document privileged writes best-effort;
/// a failed audit write never changes the outcome.
pub struct PublishPipeline {
    articles: Arc<dyn ArticleStore>,
    elevated_articles: Option<Arc<dyn ArticleStore>>,
    audit: Arc<dyn AuditStore>,
    assets: Arc<dyn AssetStore>,
}

impl PublishPipeline {
    pub fn new(
        articles: Arc<dyn ArticleStore>,
        audit: Arc<dyn AuditStore>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        Self {
            articles,
            elevated_articles: None,
            audit,
            assets,
        }
    }

    /// Configure a second-tier store used when the primary write fails.
    /// Without it the pipeline is single-tier.
    pub fn with_elevated_fallback(mut self, store: Arc<dyn ArticleStore>) -> Self {
        self.elevated_articles = Some(store);
        self
    }

    /// Publish a draft as the given principal.
    ///
    /// The principal carries a publish-capable role by construction; the
    /// role gate itself lives in `resolve_principal`, which runs against
    /// live profile state on every call.
    #[tracing::instrument(skip(self, draft), fields(user_id = %principal.user_id, article_id = ?draft.id))]
    pub async fn publish(
        &self,
        draft: ArticleDraft,
        principal: &Principal,
    ) -> Result<ArticleRecord, PublishError> {
        if draft.title_hi.trim().is_empty() {
            return Err(PublishError::InvalidDraft(
                "title_hi must not be empty".to_string(),
            ));
        }
        if draft.content.trim().is_empty() {
            return Err(PublishError::InvalidDraft(
                "content must not be empty".to_string(),
            ));
        }

        // Existing row, on edit. Fetched before any write so image and
        // published_at fallbacks see consistent state.
        let existing = match draft.id {
            Some(id) => self
                .articles
                .get(id)
                .await
                .map_err(PublishError::StoreWriteFailed)?,
            None => None,
        };

        let uploaded_url = match &draft.featured_image {
            Some(image) => Some(self.upload_featured(image).await?),
            None => None,
        };

        let final_image_url = uploaded_url
            .or_else(|| draft.image_url.clone())
            .or_else(|| existing.as_ref().and_then(|r| r.image_url.clone()));

        let record = build_record(draft, existing.as_ref(), final_image_url);

        let (stored, method) = self.upsert_with_fallback(record, principal).await?;

        self.audit_best_effort(AuditEvent::new(
            principal.user_id,
            AuditEventType::ArticleUpsert,
            serde_json::json!({
                "article_id": stored.id,
                "title_hi": stored.title_hi,
                "method": method,
                "outcome": "committed",
            }),
        ))
        .await;

        tracing::info!(article_id = ?stored.id, method, "Article published");
        Ok(stored)
    }

    async fn upload_featured(&self, image: &FeaturedImage) -> Result<String, PublishError> {
        let key = keys::featured_key(FEATURED_IMAGE_PREFIX, &image.filename);
        match self
            .assets
            .put(&key, image.bytes.clone(), &image.content_type)
            .await
        {
            Ok(stored_key) => Ok(self.assets.public_url(&stored_key)),
            Err(e) => {
                tracing::error!(error = %e, filename = %image.filename, "Featured image upload failed");
                Err(PublishError::ImageUploadFailed(e))
            }
        }
    }

    async fn upsert_with_fallback(
        &self,
        record: ArticleRecord,
        principal: &Principal,
    ) -> Result<(ArticleRecord, &'static str), PublishError> {
        let primary_err = match self.articles.upsert(record.clone()).await {
            Ok(stored) => return Ok((stored, "primary")),
            Err(e) => e,
        };

        if let Some(elevated) = &self.elevated_articles {
            tracing::warn!(
                error = %primary_err,
                "Primary article write failed, retrying through elevated store"
            );
            match elevated.upsert(record.clone()).await {
                Ok(stored) => return Ok((stored, "service_role")),
                Err(elevated_err) => {
                    self.audit_upsert_failure(&record, principal, &elevated_err)
                        .await;
                    return Err(PublishError::StoreWriteFailed(elevated_err));
                }
            }
        }

        self.audit_upsert_failure(&record, principal, &primary_err)
            .await;
        Err(PublishError::StoreWriteFailed(primary_err))
    }

    async fn audit_upsert_failure(
        &self,
        record: &ArticleRecord,
        principal: &Principal,
        error: &pressroom_core::AppError,
    ) {
        self.audit_best_effort(AuditEvent::new(
            principal.user_id,
            AuditEventType::ArticleUpsert,
            serde_json::json!({
                "article_id": record.id,
                "title_hi": record.title_hi,
                "outcome": "failed",
                "error": error.to_string(),
                "payload": record,
            }),
        ))
        .await;
    }

    async fn audit_best_effort(&self, event: AuditEvent) {
        if let Err(e) = self.audit.record(event).await {
            tracing::warn!(error = %e, "Audit write failed, continuing");
        }
    }
}

/// Assemble the row to store. `updated_at` is always server-assigned;
/// `published_at` is assigned on first create and preserved on edit. The
/// English fields mirror the Hindi ones, the site renders one body for
/// both locales.
fn build_record(
    draft: ArticleDraft,
    existing: Option<&ArticleRecord>,
    final_image_url: Option<String>,
) -> ArticleRecord {
    let now = Utc::now();
    let published_at = match existing {
        Some(record) => record.published_at,
        None => Some(draft.published_at.unwrap_or(now)),
    };

    ArticleRecord {
        id: draft.id,
        title_en: draft.title_hi.clone(),
        title_hi: draft.title_hi,
        excerpt_hi: draft.excerpt_hi,
        content_en: draft.content.clone(),
        content_hi: draft.content,
        category: draft.category,
        author: draft.author,
        location: draft.location,
        is_breaking: draft.is_breaking,
        image_url: final_image_url,
        image_alt_text_hi: draft.image_alt_text_hi,
        seo_title_hi: draft.seo_title_hi,
        seo_keywords_hi: draft.seo_keywords_hi,
        video_url: draft.video_url,
        published_at,
        updated_at: Some(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pressroom_core::models::Role;
    use pressroom_db::test_helpers::{MockArticleStore, MockAuditStore};
    use pressroom_storage::MemoryAssetStore;

    fn principal() -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    fn draft(title: &str, content: &str) -> ArticleDraft {
        ArticleDraft {
            title_hi: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    struct Fixture {
        articles: MockArticleStore,
        audit: MockAuditStore,
        assets: Arc<MemoryAssetStore>,
        pipeline: PublishPipeline,
    }

    fn fixture() -> Fixture {
        let articles = MockArticleStore::new();
        let audit = MockAuditStore::new();
        let assets = Arc::new(MemoryAssetStore::new());
        let pipeline = PublishPipeline::new(
            Arc::new(articles.clone()),
            Arc::new(audit.clone()),
            assets.clone(),
        );
        Fixture {
            articles,
            audit,
            assets,
            pipeline,
        }
    }

    #[tokio::test]
    async fn test_publish_creates_record_with_mirrored_fields() {
        let f = fixture();
        let stored = f
            .pipeline
            .publish(draft("शीर्षक", "<p>body</p>"), &principal())
            .await
            .unwrap();

        assert!(stored.id.is_some());
        assert_eq!(stored.title_en, stored.title_hi);
        assert_eq!(stored.content_en, stored.content_hi);
        assert!(stored.published_at.is_some());
        assert!(stored.updated_at.is_some());
        assert_eq!(f.articles.row_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_title_rejected_without_writes() {
        let f = fixture();
        let err = f
            .pipeline
            .publish(draft("  ", "<p>body</p>"), &principal())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::InvalidDraft(_)));
        assert_eq!(f.articles.row_count(), 0);
        assert_eq!(f.assets.object_count(), 0);
    }

    #[tokio::test]
    async fn test_featured_upload_failure_aborts_before_article_write() {
        let f = fixture();
        f.assets.fail_puts_with_prefix("featured/");

        let mut d = draft("शीर्षक", "<p>body</p>");
        d.featured_image = Some(FeaturedImage {
            filename: "cover.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50],
        });

        let err = f.pipeline.publish(d, &principal()).await.unwrap_err();
        assert!(matches!(err, PublishError::ImageUploadFailed(_)));
        assert_eq!(f.articles.row_count(), 0);
    }

    #[tokio::test]
    async fn test_featured_upload_sets_image_url() {
        let f = fixture();
        let mut d = draft("शीर्षक", "<p>body</p>");
        d.featured_image = Some(FeaturedImage {
            filename: "cover.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, 0x50],
        });

        let stored = f.pipeline.publish(d, &principal()).await.unwrap();
        let url = stored.image_url.unwrap();
        assert!(url.contains("featured/"));
        assert!(url.contains("cover.png"));
        assert_eq!(f.assets.object_count(), 1);
    }

    #[tokio::test]
    async fn test_edit_preserves_existing_image_and_published_at() {
        let f = fixture();
        let created = f
            .pipeline
            .publish(
                ArticleDraft {
                    image_url: Some("https://assets.example.com/featured/old.png".to_string()),
                    ..draft("शीर्षक", "<p>v1</p>")
                },
                &principal(),
            )
            .await
            .unwrap();
        let first_published = created.published_at;

        let updated = f
            .pipeline
            .publish(
                ArticleDraft {
                    id: created.id,
                    ..draft("शीर्षक", "<p>v2</p>")
                },
                &principal(),
            )
            .await
            .unwrap();

        assert_eq!(updated.published_at, first_published);
        assert_eq!(
            updated.image_url.as_deref(),
            Some("https://assets.example.com/featured/old.png")
        );
        assert_eq!(updated.content_hi, "<p>v2</p>");
        assert_eq!(f.articles.row_count(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_audited_and_reported() {
        let f = fixture();
        f.articles.fail_writes(true);

        let err = f
            .pipeline
            .publish(draft("शीर्षक", "<p>body</p>"), &principal())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::StoreWriteFailed(_)));
        let events = f.audit.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, AuditEventType::ArticleUpsert);
        assert_eq!(events[0].details["outcome"], "failed");
    }

    #[tokio::test]
    async fn test_audit_failure_never_masks_outcome() {
        let f = fixture();
        f.audit.fail_writes(true);

        // Audit down, store up: publish still succeeds.
        let stored = f
            .pipeline
            .publish(draft("शीर्षक", "<p>body</p>"), &principal())
            .await
            .unwrap();
        assert!(stored.id.is_some());

        // Audit down, store down: the store error still comes through.
        f.articles.fail_writes(true);
        let err = f
            .pipeline
            .publish(draft("शीर्षक", "<p>body</p>"), &principal())
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::StoreWriteFailed(_)));
    }

    #[tokio::test]
    async fn test_elevated_fallback_commits_and_audits_method() {
        let primary = MockArticleStore::new();
        let elevated = MockArticleStore::new();
        let audit = MockAuditStore::new();
        primary.fail_writes(true);

        let pipeline = PublishPipeline::new(
            Arc::new(primary.clone()),
            Arc::new(audit.clone()),
            Arc::new(MemoryAssetStore::new()),
        )
        .with_elevated_fallback(Arc::new(elevated.clone()));

        let stored = pipeline
            .publish(draft("शीर्षक", "<p>body</p>"), &principal())
            .await
            .unwrap();

        assert_eq!(primary.row_count(), 0);
        assert_eq!(elevated.row_count(), 1);
        assert!(stored.id.is_some());
        let events = audit.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].details["method"], "service_role");
    }
}
