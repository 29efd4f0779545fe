//! Styles.xml writer
//!
//! Emits document defaults, the Normal paragraph style, and a paragraph
//! style based on Normal for every other style the body references, so
//! the package never points at an undefined style.

use crate::docx::{escape_xml_attr, namespaces};
use doc_model::{Block, Body, StyleId, DEFAULT_PARAGRAPH_STYLE};
use std::collections::BTreeSet;

pub struct StylesWriter;

impl StylesWriter {
    /// Generate styles.xml content
    pub fn write(body: &Body) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<w:styles xmlns:w="{}">"#, namespaces::W));

        xml.push_str("<w:docDefaults><w:rPrDefault><w:rPr>");
        xml.push_str(r#"<w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:cs="Calibri"/>"#);
        xml.push_str(r#"<w:sz w:val="22"/><w:szCs w:val="22"/>"#);
        xml.push_str("</w:rPr></w:rPrDefault>");
        xml.push_str(r#"<w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault>"#);
        xml.push_str("</w:docDefaults>");

        xml.push_str(&format!(
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="{0}"><w:name w:val="{0}"/><w:qFormat/></w:style>"#,
            DEFAULT_PARAGRAPH_STYLE
        ));

        for style in referenced_styles(body) {
            let id = escape_xml_attr(style.as_str());
            xml.push_str(&format!(
                r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="{0}"><w:name w:val="{0}"/><w:basedOn w:val="{1}"/><w:qFormat/></w:style>"#,
                id, DEFAULT_PARAGRAPH_STYLE
            ));
        }

        xml.push_str("</w:styles>");
        xml
    }
}

/// Non-default paragraph styles used anywhere in the body, sorted
fn referenced_styles(body: &Body) -> BTreeSet<&StyleId> {
    let mut styles = BTreeSet::new();
    for block in body.blocks() {
        match block {
            Block::Paragraph(p) => styles.extend(p.style_id()),
            Block::Table(t) => {
                for cell in t.rows.iter().flat_map(|r| &r.cells) {
                    styles.extend(cell.paragraphs.iter().filter_map(|p| p.style_id()));
                }
            }
        }
    }
    styles.retain(|s| !s.is_default());
    styles
}
