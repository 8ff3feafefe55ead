//! Pressroom Conversion Library
//!
//! Turns an editor-supplied DOCX document into embeddable HTML. Embedded
//! images are relocated to the configured asset store and referenced by
//! public URL; hyperlinks to recognized video hosts become inline iframe
//! embeds; everything else renders as plain paragraphs, headings and
//! anchors.
//!
//! The converter parses the document to an intermediate tree first,
//! collects every embedded asset, relocates them (concurrently), and then
//! substitutes the resulting URLs in a single pass keyed by placeholder
//! token. The substitution site is therefore fixed by the image's source
//! position, never by upload completion order.

pub mod converter;
pub mod docx;
pub mod embed;
pub mod error;
pub mod html;
pub mod relocate;

pub use converter::{Conversion, DocxConverter, Sanitizer, SourceDocument, DOCX_CONTENT_TYPE};
pub use docx::{Block, EmbeddedAsset, Inline, ParsedDocument};
pub use embed::LinkEmbedRewriter;
pub use error::ConversionError;
pub use relocate::AssetRelocator;
