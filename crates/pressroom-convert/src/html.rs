//! HTML rendering of the parsed tree.
//!
//! Images render as placeholder tokens first; once relocation resolves the
//! public URLs, a single substitution pass swaps each token for its URL.
//! Tokens are delimited by U+FFFC (the object replacement character),
//! which is stripped from document text during escaping, so a token can
//! never collide with document content.

use crate::docx::{Block, Inline};
use crate::embed::LinkEmbedRewriter;
use regex::Regex;

const TOKEN_DELIM: char = '\u{FFFC}';

/// HTML with unresolved image placeholders, one per embedded asset.
pub struct Rendered {
    pub html: String,
    pub placeholders: Vec<Placeholder>,
}

/// Identity of one substitution site. `asset_index` is the source position
/// of the corresponding embedded asset.
pub struct Placeholder {
    pub token: String,
    pub asset_index: usize,
}

/// Escape text for HTML body and attribute positions, and strip the
/// placeholder delimiter.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            TOKEN_DELIM => {}
            _ => out.push(c),
        }
    }
    out
}

fn token_for(asset_index: usize) -> String {
    format!("{TOKEN_DELIM}asset:{asset_index}{TOKEN_DELIM}")
}

/// Render blocks to HTML, leaving a placeholder token at every image
/// position and rewriting recognized video hyperlinks into embeds.
pub fn render_blocks(blocks: &[Block], rewriter: &LinkEmbedRewriter) -> Rendered {
    let mut html = String::new();
    let mut placeholders = Vec::new();

    for block in blocks {
        let tag = match block.heading {
            Some(level) => format!("h{level}"),
            None => "p".to_string(),
        };
        html.push_str(&format!("<{tag}>"));
        for inline in &block.inlines {
            match inline {
                Inline::Text(text) => html.push_str(&escape_html(text)),
                Inline::Hyperlink { href, text } => match rewriter.rewrite(href) {
                    Some(embed) => html.push_str(&embed),
                    None => {
                        html.push_str(&format!(
                            "<a href=\"{}\">{}</a>",
                            escape_html(href),
                            escape_html(text)
                        ));
                    }
                },
                Inline::Image { asset_index } => {
                    let token = token_for(*asset_index);
                    html.push_str(&format!("<img src=\"{token}\" />"));
                    placeholders.push(Placeholder {
                        token,
                        asset_index: *asset_index,
                    });
                }
            }
        }
        html.push_str(&format!("</{tag}>"));
    }

    Rendered { html, placeholders }
}

/// Swap every placeholder for its relocated URL. `urls` is indexed by
/// asset source position; a failed relocation arrives as `""` and renders
/// as an empty src.
pub fn substitute(rendered: Rendered, urls: &[String]) -> String {
    let mut html = rendered.html;
    for placeholder in &rendered.placeholders {
        let url = urls
            .get(placeholder.asset_index)
            .map(String::as_str)
            .unwrap_or("");
        html = html.replace(&placeholder.token, &escape_html(url));
    }
    html
}

/// First image reference in the produced HTML, used as the default
/// featured image. An empty src (failed relocation) does not count.
pub fn first_image_url(html: &str) -> Option<String> {
    let pattern = Regex::new(r#"<img src="(.*?)""#).unwrap();
    pattern
        .captures(html)
        .map(|c| c[1].to_string())
        .filter(|url| !url.is_empty())
}
