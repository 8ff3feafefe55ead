//! The document-to-HTML conversion engine.

use crate::docx::{parse_document, DocxPackage};
use crate::embed::LinkEmbedRewriter;
use crate::error::ConversionError;
use crate::html;
use crate::relocate::AssetRelocator;
use bytes::Bytes;
use futures::future::join_all;
use std::sync::Arc;

/// An editor-supplied source document: opaque bytes plus the declared
/// media type.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub bytes: Bytes,
    pub content_type: String,
}

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Result of one conversion. `first_image_url` is the first image
/// reference in the produced HTML, used as the default featured image when
/// the editor has not chosen one.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub html: String,
    pub first_image_url: Option<String>,
}

/// Pluggable HTML sanitization hook. The policy itself is an external
/// collaborator; the default is identity.
pub type Sanitizer = Arc<dyn Fn(String) -> String + Send + Sync>;

/// DOCX → HTML converter.
///
/// Conversion has exactly one side effect: the asset uploads delegated to
/// the relocator. Given the same document bytes and the same relocator
/// behavior the output is deterministic.
pub struct DocxConverter {
    relocator: AssetRelocator,
    rewriter: LinkEmbedRewriter,
    sanitizer: Option<Sanitizer>,
}

impl DocxConverter {
    pub fn new(relocator: AssetRelocator) -> Self {
        Self {
            relocator,
            rewriter: LinkEmbedRewriter::new(),
            sanitizer: None,
        }
    }

    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = Some(sanitizer);
        self
    }

    /// Convert a source document to embeddable HTML.
    ///
    /// Embedded assets are relocated concurrently; each resolved URL is
    /// substituted at the structural position where the image occurred,
    /// regardless of upload completion order. A single failed upload
    /// degrades that image to an empty reference and is not a conversion
    /// error.
    pub async fn convert(&self, doc: &SourceDocument) -> Result<Conversion, ConversionError> {
        if doc.content_type != DOCX_CONTENT_TYPE {
            tracing::warn!(
                content_type = %doc.content_type,
                "Unexpected content type, attempting DOCX parse anyway"
            );
        }

        let package = DocxPackage::open(&doc.bytes)?;
        let parsed = parse_document(&package)?;

        tracing::debug!(
            blocks = parsed.blocks.len(),
            assets = parsed.assets.len(),
            "Parsed source document"
        );

        let rendered = html::render_blocks(&parsed.blocks, &self.rewriter);
        let urls = join_all(
            parsed
                .assets
                .iter()
                .map(|asset| self.relocator.relocate(asset)),
        )
        .await;

        let mut output = html::substitute(rendered, &urls);
        if let Some(sanitizer) = &self.sanitizer {
            output = sanitizer(output);
        }
        let first_image_url = html::first_image_url(&output);

        Ok(Conversion {
            html: output,
            first_image_url,
        })
    }
}
