use crate::traits::ArticleStore;
use async_trait::async_trait;
use pressroom_core::models::{ArticleRecord, Category};
use pressroom_core::AppError;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const ARTICLE_COLUMNS: &str = "id, title_hi, title_en, excerpt_hi, content_hi, content_en, \
     category, author, location, is_breaking, image_url, image_alt_text_hi, \
     seo_title_hi, seo_keywords_hi, video_url, published_at, updated_at";

fn row_to_record(row: &PgRow) -> Result<ArticleRecord, AppError> {
    let category: String = row.try_get("category")?;
    let category: Category = category
        .parse()
        .map_err(|e: String| AppError::Internal(format!("Corrupt category column: {}", e)))?;

    Ok(ArticleRecord {
        id: row.try_get("id")?,
        title_hi: row.try_get("title_hi")?,
        title_en: row.try_get("title_en")?,
        excerpt_hi: row.try_get("excerpt_hi")?,
        content_hi: row.try_get("content_hi")?,
        content_en: row.try_get("content_en")?,
        category,
        author: row.try_get("author")?,
        location: row.try_get("location")?,
        is_breaking: row.try_get("is_breaking")?,
        image_url: row.try_get("image_url")?,
        image_alt_text_hi: row.try_get("image_alt_text_hi")?,
        seo_title_hi: row.try_get("seo_title_hi")?,
        seo_keywords_hi: row.try_get("seo_keywords_hi")?,
        video_url: row.try_get("video_url")?,
        published_at: row.try_get("published_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Article repository over Postgres.
#[derive(Clone)]
pub struct ArticleRepository {
    pool: PgPool,
}

impl ArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, record: &ArticleRecord) -> Result<ArticleRecord, AppError> {
        let query = format!(
            "INSERT INTO articles \
             (title_hi, title_en, excerpt_hi, content_hi, content_en, category, author, \
              location, is_breaking, image_url, image_alt_text_hi, seo_title_hi, \
              seo_keywords_hi, video_url, published_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(&record.title_hi)
            .bind(&record.title_en)
            .bind(&record.excerpt_hi)
            .bind(&record.content_hi)
            .bind(&record.content_en)
            .bind(record.category.as_str())
            .bind(&record.author)
            .bind(&record.location)
            .bind(record.is_breaking)
            .bind(&record.image_url)
            .bind(&record.image_alt_text_hi)
            .bind(&record.seo_title_hi)
            .bind(&record.seo_keywords_hi)
            .bind(&record.video_url)
            .bind(record.published_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await?;
        row_to_record(&row)
    }

    async fn upsert_by_id(&self, id: Uuid, record: &ArticleRecord) -> Result<ArticleRecord, AppError> {
        let query = format!(
            "INSERT INTO articles \
             (id, title_hi, title_en, excerpt_hi, content_hi, content_en, category, author, \
              location, is_breaking, image_url, image_alt_text_hi, seo_title_hi, \
              seo_keywords_hi, video_url, published_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             ON CONFLICT (id) DO UPDATE SET \
               title_hi = EXCLUDED.title_hi, \
               title_en = EXCLUDED.title_en, \
               excerpt_hi = EXCLUDED.excerpt_hi, \
               content_hi = EXCLUDED.content_hi, \
               content_en = EXCLUDED.content_en, \
               category = EXCLUDED.category, \
               author = EXCLUDED.author, \
               location = EXCLUDED.location, \
               is_breaking = EXCLUDED.is_breaking, \
               image_url = EXCLUDED.image_url, \
               image_alt_text_hi = EXCLUDED.image_alt_text_hi, \
               seo_title_hi = EXCLUDED.seo_title_hi, \
               seo_keywords_hi = EXCLUDED.seo_keywords_hi, \
               video_url = EXCLUDED.video_url, \
               published_at = EXCLUDED.published_at, \
               updated_at = EXCLUDED.updated_at \
             RETURNING {ARTICLE_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(&record.title_hi)
            .bind(&record.title_en)
            .bind(&record.excerpt_hi)
            .bind(&record.content_hi)
            .bind(&record.content_en)
            .bind(record.category.as_str())
            .bind(&record.author)
            .bind(&record.location)
            .bind(record.is_breaking)
            .bind(&record.image_url)
            .bind(&record.image_alt_text_hi)
            .bind(&record.seo_title_hi)
            .bind(&record.seo_keywords_hi)
            .bind(&record.video_url)
            .bind(record.published_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await?;
        row_to_record(&row)
    }
}

#[async_trait]
impl ArticleStore for ArticleRepository {
    async fn upsert(&self, record: ArticleRecord) -> Result<ArticleRecord, AppError> {
        match record.id {
            Some(id) => self.upsert_by_id(id, &record).await,
            None => self.insert(&record).await,
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<ArticleRecord>, AppError> {
        let query = format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_record).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
