//! Hyperlink → video embed rewriting.
//!
//! Recognizes two host families: YouTube (watch and youtu.be short form,
//! 11-character video id) and Vimeo (numeric id). Anything else is left to
//! render as a plain anchor.

use regex::Regex;

const YOUTUBE_PATTERN: &str =
    r"(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]{11})";
const VIMEO_PATTERN: &str = r"(?:https?://)?(?:www\.)?vimeo\.com/(\d+)";

/// Rewrites recognized video hyperlinks into iframe embed fragments.
pub struct LinkEmbedRewriter {
    youtube: Regex,
    vimeo: Regex,
}

impl LinkEmbedRewriter {
    pub fn new() -> Self {
        // Patterns are static; compilation cannot fail.
        Self {
            youtube: Regex::new(YOUTUBE_PATTERN).unwrap(),
            vimeo: Regex::new(VIMEO_PATTERN).unwrap(),
        }
    }

    /// Embed markup for a recognized video href, or `None` to keep the
    /// hyperlink verbatim.
    ///
    /// Invariant: YouTube is checked first and wins if a href were ever to
    /// match both patterns. The host substrings are disjoint, so that
    /// branch is unreachable in practice, but the precedence is fixed
    /// rather than incidental.
    pub fn rewrite(&self, href: &str) -> Option<String> {
        if let Some(captures) = self.youtube.captures(href) {
            let id = &captures[1];
            return Some(format!(
                "<div><iframe src=\"https://www.youtube.com/embed/{id}\" frameborder=\"0\" \
                 allow=\"accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; \
                 picture-in-picture\" allowfullscreen></iframe></div>"
            ));
        }
        if let Some(captures) = self.vimeo.captures(href) {
            let id = &captures[1];
            return Some(format!(
                "<div><iframe src=\"https://player.vimeo.com/video/{id}\" frameborder=\"0\" \
                 allow=\"autoplay; fullscreen; picture-in-picture\" allowfullscreen></iframe></div>"
            ));
        }
        None
    }
}

impl Default for LinkEmbedRewriter {
    fn default() -> Self {
        Self::new()
    }
}
