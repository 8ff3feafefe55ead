//! DOCX container access and the parsed intermediate tree.
//!
//! A DOCX file is a ZIP package: the body lives at `word/document.xml`,
//! hyperlink and image targets are indirected through
//! `word/_rels/document.xml.rels`, and image bytes sit under `word/media/`.
//! This module opens the package and parses the body into a flat tree of
//! paragraphs; full format fidelity (tables, footnotes, run styling) is out
//! of scope.

pub mod document;

pub use document::parse_document;

use crate::error::ConversionError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// One binary resource discovered during parsing. Consumed exactly once by
/// the relocator; the resulting public URL is substituted at the position
/// recorded by `source_index`.
#[derive(Debug, Clone)]
pub struct EmbeddedAsset {
    pub source_index: usize,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Inline content within a paragraph, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Hyperlink { href: String, text: String },
    Image { asset_index: usize },
}

/// A paragraph-level block. `heading` is the 1-6 level from the paragraph
/// style, when the style is one of the built-in Heading styles.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub heading: Option<u8>,
    pub inlines: Vec<Inline>,
}

/// The structural tree plus every embedded asset, in source order.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub blocks: Vec<Block>,
    pub assets: Vec<EmbeddedAsset>,
}

/// The unpacked parts of one DOCX package.
#[derive(Debug)]
pub struct DocxPackage {
    pub document_xml: String,
    pub relationships: HashMap<String, String>,
    pub media: HashMap<String, Vec<u8>>,
}

impl DocxPackage {
    /// Open a DOCX byte buffer and extract the parts the parser needs.
    pub fn open(bytes: &[u8]) -> Result<Self, ConversionError> {
        // ZIP magic check up front gives a clearer error than the zip crate's.
        if bytes.len() < 4 || &bytes[0..2] != b"PK" {
            return Err(ConversionError::NotDocx(
                "missing ZIP signature".to_string(),
            ));
        }

        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| ConversionError::NotDocx(e.to_string()))?;

        let document_xml = read_part(&mut archive, "word/document.xml")?
            .ok_or_else(|| ConversionError::MissingPart("word/document.xml".to_string()))?;

        let relationships = match read_part(&mut archive, "word/_rels/document.xml.rels")? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let mut media = HashMap::new();
        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| ConversionError::NotDocx(e.to_string()))?;
            let name = file.name().to_string();
            if name.starts_with("word/media/") {
                let mut data = Vec::with_capacity(file.size() as usize);
                file.read_to_end(&mut data)?;
                media.insert(name, data);
            }
        }

        Ok(DocxPackage {
            document_xml,
            relationships,
            media,
        })
    }

    /// Resolve a relationship target (e.g. `media/image1.png`) to the media
    /// part name used in this package's `media` map.
    pub fn media_part_name(target: &str) -> String {
        let target = target.trim_start_matches('/');
        if target.starts_with("word/") {
            target.to_string()
        } else {
            format!("word/{}", target)
        }
    }
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Option<String>, ConversionError> {
    match archive.by_name(name) {
        Ok(mut file) => {
            let mut content = String::new();
            file.read_to_string(&mut content)?;
            Ok(Some(content))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(ConversionError::NotDocx(e.to_string())),
    }
}

/// Read an attribute value off an element by qualified name.
pub(crate) fn attr_value(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Parse `word/_rels/document.xml.rels` into an Id → Target map.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, ConversionError> {
    let mut reader = Reader::from_str(xml);
    let mut map = HashMap::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let id = attr_value(&e, b"Id");
                    let target = attr_value(&e, b"Target");
                    if let (Some(id), Some(target)) = (id, target) {
                        map.insert(id, target);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(map)
}

/// Media type inferred from a media part's file extension. The package's
/// own content-type catalog is keyed by extension anyway.
pub fn media_type_for(part_name: &str) -> String {
    let ext = part_name
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    let media_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    };
    media_type.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_non_zip() {
        let err = DocxPackage::open(b"%PDF-1.4").unwrap_err();
        assert!(matches!(err, ConversionError::NotDocx(_)));
    }

    #[test]
    fn test_open_rejects_zip_without_document() {
        let bytes = super::document::test_docs::zip_with(&[("other.txt", b"x".to_vec())]);
        let err = DocxPackage::open(&bytes).unwrap_err();
        assert!(matches!(err, ConversionError::MissingPart(_)));
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<?xml version="1.0"?>
            <Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
              <Relationship Id="rId1" Type="t" Target="media/image1.png"/>
              <Relationship Id="rId2" Type="t" Target="https://example.com" TargetMode="External"/>
            </Relationships>"#;
        let map = parse_relationships(xml).unwrap();
        assert_eq!(map.get("rId1").unwrap(), "media/image1.png");
        assert_eq!(map.get("rId2").unwrap(), "https://example.com");
    }

    #[test]
    fn test_media_type_for_extensions() {
        assert_eq!(media_type_for("word/media/image1.png"), "image/png");
        assert_eq!(media_type_for("word/media/photo.JPG"), "image/jpeg");
        assert_eq!(media_type_for("word/media/blob"), "application/octet-stream");
    }

    #[test]
    fn test_media_part_name_normalization() {
        assert_eq!(
            DocxPackage::media_part_name("media/image1.png"),
            "word/media/image1.png"
        );
        assert_eq!(
            DocxPackage::media_part_name("/word/media/image1.png"),
            "word/media/image1.png"
        );
    }
}
