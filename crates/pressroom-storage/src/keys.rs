//! Shared key generation for storage backends.
//!
//! Relocation keys are `{prefix}/{millis}-{rand7}[.ext]`: a millisecond
//! timestamp plus a 7-character random suffix. Keys are deliberately not
//! content-addressed — re-uploading identical bytes must produce a new
//! object, never overwrite a prior one.

use rand::distr::Alphanumeric;
use rand::Rng;

const RANDOM_SUFFIX_LEN: usize = 7;
const MAX_FILENAME_LEN: usize = 255;

fn random_suffix() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}

/// Key for an asset relocated out of a source document.
///
/// `extension` is appended when present so serving infrastructure can infer
/// a content type from the key.
pub fn relocation_key(prefix: &str, extension: Option<&str>) -> String {
    let stamp = chrono::Utc::now().timestamp_millis();
    match extension {
        Some(ext) => format!("{}/{}-{}.{}", prefix, stamp, random_suffix(), ext),
        None => format!("{}/{}-{}", prefix, stamp, random_suffix()),
    }
}

/// Key for an editor-chosen featured image, namespaced by upload time and
/// the original filename.
pub fn featured_key(prefix: &str, filename: &str) -> String {
    format!(
        "{}/{}-{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        sanitize_filename(filename)
    )
}

/// Key for a verification probe upload, namespaced by user and attempt
/// label.
pub fn verify_key(prefix: &str, user_id: &str, label: &str) -> String {
    format!(
        "{}/{}/{}-{}.png",
        prefix,
        user_id,
        label,
        chrono::Utc::now().timestamp_millis()
    )
}

/// Strip path components and replace characters unsafe in storage keys.
pub fn sanitize_filename(filename: &str) -> String {
    let base = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "file".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX_FILENAME_LEN)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim_matches('_').is_empty() {
        "file".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocation_key_format() {
        let key = relocation_key("articles", Some("png"));
        assert!(key.starts_with("articles/"));
        assert!(key.ends_with(".png"));
        let stem = key
            .strip_prefix("articles/")
            .unwrap()
            .strip_suffix(".png")
            .unwrap();
        let (stamp, suffix) = stem.split_once('-').unwrap();
        assert!(stamp.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), 7);
    }

    #[test]
    fn test_relocation_keys_are_unique_for_identical_input() {
        let a = relocation_key("articles", None);
        let b = relocation_key("articles", None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_featured_key_carries_filename() {
        let key = featured_key("featured", "hero image.jpg");
        assert!(key.starts_with("featured/"));
        assert!(key.ends_with("hero_image.jpg"));
    }

    #[test]
    fn test_sanitize_filename_strips_path_components() {
        assert_eq!(sanitize_filename("/etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("../../x.png"), "x.png");
        assert_eq!(sanitize_filename("???"), "file");
    }
}
