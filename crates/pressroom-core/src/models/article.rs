use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed set of article categories. Stored as snake_case text; unknown keys
/// are rejected at the input boundary rather than carried as free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Indian,
    International,
    National,
    State,
    Politics,
    Sports,
    Cricket,
    Business,
    Economy,
    Technology,
    Science,
    Health,
    Education,
    Entertainment,
    Bollywood,
    Lifestyle,
    Crime,
    Weather,
    Agriculture,
    Religion,
    Opinion,
    Jobs,
    Automobile,
    Travel,
}

impl Category {
    pub const ALL: [Category; 24] = [
        Category::Indian,
        Category::International,
        Category::National,
        Category::State,
        Category::Politics,
        Category::Sports,
        Category::Cricket,
        Category::Business,
        Category::Economy,
        Category::Technology,
        Category::Science,
        Category::Health,
        Category::Education,
        Category::Entertainment,
        Category::Bollywood,
        Category::Lifestyle,
        Category::Crime,
        Category::Weather,
        Category::Agriculture,
        Category::Religion,
        Category::Opinion,
        Category::Jobs,
        Category::Automobile,
        Category::Travel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Indian => "indian",
            Category::International => "international",
            Category::National => "national",
            Category::State => "state",
            Category::Politics => "politics",
            Category::Sports => "sports",
            Category::Cricket => "cricket",
            Category::Business => "business",
            Category::Economy => "economy",
            Category::Technology => "technology",
            Category::Science => "science",
            Category::Health => "health",
            Category::Education => "education",
            Category::Entertainment => "entertainment",
            Category::Bollywood => "bollywood",
            Category::Lifestyle => "lifestyle",
            Category::Crime => "crime",
            Category::Weather => "weather",
            Category::Agriculture => "agriculture",
            Category::Religion => "religion",
            Category::Opinion => "opinion",
            Category::Jobs => "jobs",
            Category::Automobile => "automobile",
            Category::Travel => "travel",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Indian
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// The publishable unit: one article row.
///
/// `id` is absent on create and assigned by the store. `content_en` mirrors
/// `content_hi` (the site renders one converted body for both locales).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: Option<Uuid>,
    pub title_hi: String,
    pub title_en: String,
    pub excerpt_hi: Option<String>,
    pub content_hi: String,
    pub content_en: String,
    pub category: Category,
    pub author: Option<String>,
    pub location: Option<String>,
    pub is_breaking: bool,
    pub image_url: Option<String>,
    pub image_alt_text_hi: Option<String>,
    pub seo_title_hi: Option<String>,
    pub seo_keywords_hi: Option<String>,
    pub video_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A new featured image file supplied alongside a draft.
#[derive(Debug, Clone)]
pub struct FeaturedImage {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Editor input to the publish pipeline.
///
/// Optional fields default as follows: `image_url` falls back to the newly
/// uploaded featured image, then to the existing record's image on edit;
/// `published_at` is server-assigned on first create and preserved on edit;
/// `updated_at` is always server-assigned.
#[derive(Debug, Clone, Default)]
pub struct ArticleDraft {
    pub id: Option<Uuid>,
    pub title_hi: String,
    pub content: String,
    pub excerpt_hi: Option<String>,
    pub category: Category,
    pub author: Option<String>,
    pub location: Option<String>,
    pub is_breaking: bool,
    pub image_url: Option<String>,
    pub image_alt_text_hi: Option<String>,
    pub seo_title_hi: Option<String>,
    pub seo_keywords_hi: Option<String>,
    pub video_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub featured_image: Option<FeaturedImage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_category_rejects_unknown_key() {
        assert!("breaking-news".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_snake_case() {
        let json = serde_json::to_string(&Category::Bollywood).unwrap();
        assert_eq!(json, "\"bollywood\"");
    }
}
