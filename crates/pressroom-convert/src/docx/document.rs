//! Body parser: `word/document.xml` → [`ParsedDocument`].
//!
//! Pull-parses the WordprocessingML body and flattens it to paragraphs of
//! text, hyperlinks and image references. Image bytes are pulled out of the
//! package's media map as they are encountered, so the asset list comes
//! back in source order and `source_index` doubles as the substitution
//! token identity.

use super::{attr_value, media_type_for, Block, DocxPackage, EmbeddedAsset, Inline, ParsedDocument};
use crate::error::ConversionError;
use quick_xml::events::Event;
use quick_xml::Reader;

struct LinkContext {
    href: Option<String>,
    text: String,
}

/// Parse the package's body into the intermediate tree.
pub fn parse_document(package: &DocxPackage) -> Result<ParsedDocument, ConversionError> {
    let mut reader = Reader::from_str(&package.document_xml);

    let mut blocks: Vec<Block> = Vec::new();
    let mut assets: Vec<EmbeddedAsset> = Vec::new();
    let mut current: Option<Block> = None;
    let mut link: Option<LinkContext> = None;
    let mut in_text = false;

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"p" if !is_empty => {
                        current = Some(Block {
                            heading: None,
                            inlines: Vec::new(),
                        });
                    }
                    b"pStyle" => {
                        if let (Some(block), Some(style)) = (current.as_mut(), attr_value(e, b"w:val"))
                        {
                            block.heading = heading_level(&style);
                        }
                    }
                    b"hyperlink" if !is_empty => {
                        let href = attr_value(e, b"r:id")
                            .and_then(|id| package.relationships.get(&id).cloned());
                        link = Some(LinkContext {
                            href,
                            text: String::new(),
                        });
                    }
                    b"t" if !is_empty => {
                        in_text = true;
                    }
                    b"blip" => {
                        let part = attr_value(e, b"r:embed")
                            .and_then(|id| package.relationships.get(&id).cloned())
                            .map(|target| DocxPackage::media_part_name(&target));
                        let Some(part) = part else { continue };
                        let Some(bytes) = package.media.get(&part) else {
                            tracing::warn!(part = %part, "Image relationship points outside the package, skipping");
                            continue;
                        };
                        if let Some(block) = current.as_mut() {
                            let asset_index = assets.len();
                            assets.push(EmbeddedAsset {
                                source_index: asset_index,
                                media_type: media_type_for(&part),
                                bytes: bytes.clone(),
                            });
                            block.inlines.push(Inline::Image { asset_index });
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(block) = current.take() {
                        if !block.inlines.is_empty() {
                            blocks.push(block);
                        }
                    }
                }
                b"hyperlink" => {
                    if let (Some(block), Some(ctx)) = (current.as_mut(), link.take()) {
                        match ctx.href {
                            Some(href) => block.inlines.push(Inline::Hyperlink {
                                href,
                                text: ctx.text,
                            }),
                            // Unresolvable relationship: keep the text.
                            None if !ctx.text.is_empty() => {
                                block.inlines.push(Inline::Text(ctx.text))
                            }
                            None => {}
                        }
                    }
                }
                b"t" => {
                    in_text = false;
                }
                _ => {}
            },
            Event::Text(t) => {
                if in_text {
                    let text = t
                        .unescape()
                        .map_err(|e| ConversionError::MalformedXml(e.to_string()))?;
                    if let Some(ctx) = link.as_mut() {
                        ctx.text.push_str(&text);
                    } else if let Some(block) = current.as_mut() {
                        // Coalesce adjacent runs into one Text inline.
                        if let Some(Inline::Text(existing)) = block.inlines.last_mut() {
                            existing.push_str(&text);
                        } else {
                            block.inlines.push(Inline::Text(text.into_owned()));
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ParsedDocument { blocks, assets })
}

fn heading_level(style: &str) -> Option<u8> {
    style
        .strip_prefix("Heading")
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=6).contains(n))
}

#[cfg(test)]
pub(crate) mod test_docs {
    //! In-memory DOCX fixtures shared by the conversion tests.

    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    pub(crate) fn zip_with(parts: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in parts {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    const RELS_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#;

    /// Build a DOCX with the given body XML, relationships, and media parts.
    pub(crate) fn docx(body: &str, rels: &[(&str, &str)], media: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"
            xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
  <w:body>{body}</w:body>
</w:document>"#
        );
        let mut rels_xml = String::from(RELS_HEADER);
        for (id, target) in rels {
            let mode = if target.starts_with("http") {
                r#" TargetMode="External""#
            } else {
                ""
            };
            rels_xml.push_str(&format!(
                r#"<Relationship Id="{id}" Type="t" Target="{target}"{mode}/>"#
            ));
        }
        rels_xml.push_str("</Relationships>");

        let mut parts: Vec<(&str, Vec<u8>)> = vec![
            ("word/document.xml", document.into_bytes()),
            ("word/_rels/document.xml.rels", rels_xml.into_bytes()),
        ];
        let media_parts: Vec<(String, Vec<u8>)> = media
            .iter()
            .map(|(name, data)| (format!("word/media/{name}"), data.clone()))
            .collect();
        for (name, data) in &media_parts {
            parts.push((name.as_str(), data.clone()));
        }
        zip_with(&parts)
    }

    pub(crate) fn paragraph(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    pub(crate) fn heading(level: u8, text: &str) -> String {
        format!(
            "<w:p><w:pPr><w:pStyle w:val=\"Heading{level}\"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"
        )
    }

    pub(crate) fn hyperlink_paragraph(rel_id: &str, text: &str) -> String {
        format!(
            "<w:p><w:hyperlink r:id=\"{rel_id}\"><w:r><w:t>{text}</w:t></w:r></w:hyperlink></w:p>"
        )
    }

    pub(crate) fn image_paragraph(rel_id: &str) -> String {
        format!("<w:p><w:r><w:drawing><a:blip r:embed=\"{rel_id}\"/></w:drawing></w:r></w:p>")
    }

    /// 1x1 transparent PNG.
    pub(crate) fn tiny_png() -> Vec<u8> {
        use base64::{engine::general_purpose::STANDARD, Engine};
        const BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR4nGMAAQAABQABDQottAAAAABJRU5ErkJggg==";
        STANDARD.decode(BASE64).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_docs::*;
    use super::*;

    fn parse(bytes: &[u8]) -> ParsedDocument {
        let package = DocxPackage::open(bytes).unwrap();
        parse_document(&package).unwrap()
    }

    #[test]
    fn test_paragraphs_and_headings() {
        let body = format!("{}{}", heading(2, "Title"), paragraph("Body text"));
        let doc = parse(&docx(&body, &[], &[]));
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0].heading, Some(2));
        assert_eq!(doc.blocks[0].inlines, vec![Inline::Text("Title".into())]);
        assert_eq!(doc.blocks[1].heading, None);
        assert_eq!(doc.blocks[1].inlines, vec![Inline::Text("Body text".into())]);
    }

    #[test]
    fn test_adjacent_runs_coalesce() {
        let body = "<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t>world</w:t></w:r></w:p>";
        let doc = parse(&docx(body, &[], &[]));
        assert_eq!(
            doc.blocks[0].inlines,
            vec![Inline::Text("Hello world".into())]
        );
    }

    #[test]
    fn test_hyperlink_resolves_relationship() {
        let body = hyperlink_paragraph("rId1", "watch this");
        let doc = parse(&docx(&body, &[("rId1", "https://example.com/v")], &[]));
        assert_eq!(
            doc.blocks[0].inlines,
            vec![Inline::Hyperlink {
                href: "https://example.com/v".into(),
                text: "watch this".into(),
            }]
        );
    }

    #[test]
    fn test_hyperlink_with_unknown_relationship_degrades_to_text() {
        let body = hyperlink_paragraph("rId9", "orphan link");
        let doc = parse(&docx(&body, &[], &[]));
        assert_eq!(doc.blocks[0].inlines, vec![Inline::Text("orphan link".into())]);
    }

    #[test]
    fn test_images_collected_in_source_order() {
        let body = format!(
            "{}{}{}",
            image_paragraph("rId1"),
            paragraph("between"),
            image_paragraph("rId2"),
        );
        let doc = parse(&docx(
            &body,
            &[("rId1", "media/a.png"), ("rId2", "media/b.jpg")],
            &[("a.png", vec![1, 2]), ("b.jpg", vec![3, 4])],
        ));
        assert_eq!(doc.assets.len(), 2);
        assert_eq!(doc.assets[0].source_index, 0);
        assert_eq!(doc.assets[0].media_type, "image/png");
        assert_eq!(doc.assets[0].bytes, vec![1, 2]);
        assert_eq!(doc.assets[1].media_type, "image/jpeg");
        assert_eq!(doc.blocks[0].inlines, vec![Inline::Image { asset_index: 0 }]);
        assert_eq!(doc.blocks[2].inlines, vec![Inline::Image { asset_index: 1 }]);
    }

    #[test]
    fn test_empty_paragraphs_are_dropped() {
        let body = format!("<w:p/><w:p></w:p>{}", paragraph("kept"));
        let doc = parse(&docx(&body, &[], &[]));
        assert_eq!(doc.blocks.len(), 1);
    }

    #[test]
    fn test_escaped_text_is_unescaped() {
        let body = paragraph("a &amp; b &lt;c&gt;");
        let doc = parse(&docx(&body, &[], &[]));
        assert_eq!(doc.blocks[0].inlines, vec![Inline::Text("a & b <c>".into())]);
    }
}
