//! Relationships (.rels) parsing and generation
//!
//! Relationships connect the parts of a package: the root `.rels` points at
//! the main document and core properties, the document's own `.rels` points
//! at styles.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::XmlParser;
use crate::docx::{escape_xml_attr, namespaces};
use quick_xml::events::Event;

/// A single relationship in a .rels file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Unique ID within the rels file (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part's directory
    pub target: String,
}

/// Relationships from one .rels file, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    relationships: Vec<Relationship>,
    next_id: u32,
}

impl Relationships {
    pub fn new() -> Self {
        Self {
            relationships: Vec::new(),
            next_id: 1,
        }
    }

    /// Parse a .rels file
    pub fn parse(content: &str) -> DocxResult<Self> {
        let mut result = Self::new();
        let mut reader = XmlParser::from_string(content);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if XmlParser::matches_element(e.name().as_ref(), "Relationship") {
                        let attr = |key: &[u8], what: &str| {
                            XmlParser::get_attribute(e, key).ok_or_else(|| {
                                DocxError::InvalidStructure(format!("Relationship missing {}", what))
                            })
                        };
                        let id = attr(b"Id", "Id")?;
                        let rel_type = attr(b"Type", "Type")?;
                        let target = attr(b"Target", "Target")?;

                        if let Some(num) = id.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok()) {
                            result.next_id = result.next_id.max(num + 1);
                        }
                        result.relationships.push(Relationship { id, rel_type, target });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocxError::from(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(result)
    }

    /// Add a relationship and return its generated ID
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = format!("rId{}", self.next_id);
        self.next_id += 1;
        self.relationships.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    /// First relationship of the given type
    pub fn get_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.rel_type == rel_type)
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// Generate the .rels XML
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Relationships xmlns="{}">"#, namespaces::PKG_REL));
        for rel in &self.relationships {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                escape_xml_attr(&rel.id),
                escape_xml_attr(&rel.rel_type),
                escape_xml_attr(&rel.target)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Resolve a relationship target against the directory of its source part
///
/// `resolve_target("word", "styles.xml")` is `word/styles.xml`; absolute
/// targets (leading `/`) are package-rooted.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::relationship_types;

    #[test]
    fn test_parse_tracks_next_id() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
    <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
</Relationships>"#;

        let mut rels = Relationships::parse(xml).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(
            rels.get_by_type(relationship_types::DOCUMENT).map(|r| r.target.as_str()),
            Some("word/document.xml")
        );
        assert_eq!(rels.add(relationship_types::STYLES, "styles.xml"), "rId8");
    }

    #[test]
    fn test_missing_attribute_is_an_error() {
        let xml = r#"<Relationships><Relationship Id="rId1" Target="x.xml"/></Relationships>"#;
        assert!(matches!(
            Relationships::parse(xml),
            Err(DocxError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_generated_xml_parses_back() {
        let mut rels = Relationships::new();
        rels.add(relationship_types::DOCUMENT, "word/document.xml");
        rels.add(relationship_types::CORE_PROPERTIES, "docProps/core.xml");
        let parsed = Relationships::parse(&rels.to_xml()).unwrap();
        assert_eq!(parsed, rels);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("word", "styles.xml"), "word/styles.xml");
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("word", "../docProps/core.xml"), "docProps/core.xml");
        assert_eq!(resolve_target("word", "/word/styles.xml"), "word/styles.xml");
    }
}
