//! docProps/core.xml parsing and generation

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::XmlParser;
use crate::docx::{escape_xml, namespaces};
use chrono::{DateTime, SecondsFormat, Utc};
use doc_model::CoreProperties;
use quick_xml::events::Event;

#[derive(Clone, Copy)]
enum Field {
    Title,
    Creator,
    Created,
    Modified,
}

impl Field {
    fn from_element(name: &[u8]) -> Option<Self> {
        [
            ("title", Field::Title),
            ("creator", Field::Creator),
            ("created", Field::Created),
            ("modified", Field::Modified),
        ]
        .into_iter()
        .find(|(local, _)| XmlParser::matches_element(name, local))
        .map(|(_, field)| field)
    }
}

/// Parse core.xml. Unparseable timestamps are dropped rather than failing
/// the whole package.
pub fn parse_core_properties(content: &str) -> DocxResult<CoreProperties> {
    let mut props = CoreProperties::default();
    let mut reader = XmlParser::from_string(content);
    let mut buf = Vec::new();
    let mut current: Option<Field> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => current = Field::from_element(e.name().as_ref()),
            Ok(Event::End(_)) => current = None,
            Ok(Event::Text(ref e)) => {
                if let Some(field) = current {
                    let text = e.unescape().map_err(|e| DocxError::XmlParse(e.to_string()))?;
                    let text = text.trim().to_string();
                    match field {
                        Field::Title => props.title = Some(text),
                        Field::Creator => props.creator = Some(text),
                        Field::Created => props.created = parse_timestamp(&text),
                        Field::Modified => props.modified = parse_timestamp(&text),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocxError::from(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(props)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!("Ignoring core property timestamp {:?}: {}", value, e);
            None
        }
    }
}

/// Generate core.xml
pub fn write_core_properties(props: &CoreProperties) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<cp:coreProperties xmlns:cp="{}" xmlns:dc="{}" xmlns:dcterms="{}" xmlns:xsi="{}">"#,
        namespaces::CP,
        namespaces::DC,
        namespaces::DCTERMS,
        namespaces::XSI,
    ));

    if let Some(ref title) = props.title {
        xml.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
    }
    if let Some(ref creator) = props.creator {
        xml.push_str(&format!("<dc:creator>{}</dc:creator>", escape_xml(creator)));
    }
    for (element, value) in [("created", props.created), ("modified", props.modified)] {
        if let Some(dt) = value {
            xml.push_str(&format!(
                r#"<dcterms:{0} xsi:type="dcterms:W3CDTF">{1}</dcterms:{0}>"#,
                element,
                dt.to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
        }
    }

    xml.push_str("</cp:coreProperties>");
    xml
}
