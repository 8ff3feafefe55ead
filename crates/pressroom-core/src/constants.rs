//! Application-wide constants.

/// Object storage bucket holding all article imagery.
pub const ARTICLE_IMAGES_BUCKET: &str = "article-images";

/// Key prefix for images extracted from a source document during conversion.
pub const ARTICLE_ASSET_PREFIX: &str = "articles";

/// Key prefix for editor-chosen featured images.
pub const FEATURED_IMAGE_PREFIX: &str = "featured";

/// Key prefix for verification probe uploads made under the caller's own
/// authorization context.
pub const VERIFY_ASSET_PREFIX: &str = "verify";

/// Key prefix for verification probe uploads made through the elevated
/// fallback path.
pub const VERIFY_ADMIN_ASSET_PREFIX: &str = "verify-admin";

/// Maximum attempts for a single probe upload in the verification harness.
pub const VERIFY_UPLOAD_MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between probe upload attempts, in milliseconds. Bounded retry
/// with a short fixed delay; the operation either works or fails
/// deterministically, so backoff buys nothing here.
pub const VERIFY_UPLOAD_RETRY_DELAY_MS: u64 = 500;
