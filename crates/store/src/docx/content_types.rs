//! [Content_Types].xml parsing and generation

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::XmlParser;
use crate::docx::{content_type_values, escape_xml_attr, namespaces, part_names};
use quick_xml::events::Event;
use std::collections::BTreeMap;

/// Content types of the parts in a DOCX package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    /// Default content types by extension (e.g., "xml" -> "application/xml")
    pub defaults: BTreeMap<String, String>,
    /// Override content types by part name (e.g., "/word/document.xml" -> "...")
    pub overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    /// Content types for the parts this crate writes
    pub fn for_package() -> Self {
        let mut ct = Self::default();
        ct.defaults.insert("rels".into(), content_type_values::RELATIONSHIPS.into());
        ct.defaults.insert("xml".into(), content_type_values::XML.into());
        ct.add_override(part_names::DOCUMENT, content_type_values::DOCUMENT);
        ct.add_override(part_names::STYLES, content_type_values::STYLES);
        ct.add_override(part_names::CORE_PROPERTIES, content_type_values::CORE_PROPERTIES);
        ct
    }

    /// Parse [Content_Types].xml
    pub fn parse(content: &str) -> DocxResult<Self> {
        let mut result = Self::default();
        let mut reader = XmlParser::from_string(content);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let name = e.name();
                    if XmlParser::matches_element(name.as_ref(), "Default") {
                        if let (Some(ext), Some(ct)) = (
                            XmlParser::get_attribute(e, b"Extension"),
                            XmlParser::get_attribute(e, b"ContentType"),
                        ) {
                            result.defaults.insert(ext.to_lowercase(), ct);
                        }
                    } else if XmlParser::matches_element(name.as_ref(), "Override") {
                        if let (Some(part), Some(ct)) = (
                            XmlParser::get_attribute(e, b"PartName"),
                            XmlParser::get_attribute(e, b"ContentType"),
                        ) {
                            result.add_override(&part, &ct);
                        }
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

    /// Content type of a part, checking overrides before extension defaults
    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        if let Some(ct) = self.overrides.get(&normalize_part_name(path)) {
            return Some(ct);
        }
        let ext = path.rsplit_once('.')?.1.to_lowercase();
        self.defaults.get(&ext).map(String::as_str)
    }

    pub fn add_override(&mut self, part_name: &str, content_type: &str) {
        self.overrides
            .insert(normalize_part_name(part_name), content_type.to_string());
    }

    /// The package must declare its main document part as such
    pub fn declares_main_document(&self) -> bool {
        self.get_content_type(part_names::DOCUMENT) == Some(content_type_values::DOCUMENT)
    }

    /// Generate [Content_Types].xml
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, namespaces::CT));

        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml_attr(ext),
                escape_xml_attr(ct)
            ));
        }
        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml_attr(part),
                escape_xml_attr(ct)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}

fn normalize_part_name(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
