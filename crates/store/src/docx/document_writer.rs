//! Document.xml writer
//!
//! Converts a body to DOCX document.xml format.

use crate::docx::{escape_xml, escape_xml_attr, namespaces};
use doc_model::{Block, Body, Paragraph, Run, Table};

/// Writer for document.xml
#[derive(Default)]
pub struct DocumentWriter {
    xml: String,
}

impl DocumentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate document.xml content
    pub fn write(mut self, body: &Body) -> String {
        self.xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        self.xml.push('\n');
        self.xml.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}">"#,
            namespaces::W,
            namespaces::R,
        ));
        self.xml.push_str("<w:body>");

        for block in body.blocks() {
            match block {
                Block::Paragraph(para) => self.write_paragraph(para),
                Block::Table(table) => self.write_table(table),
            }
        }

        // Word requires a paragraph after a trailing table and always emits sectPr
        if matches!(body.blocks().last(), Some(Block::Table(_))) {
            self.xml.push_str("<w:p/>");
        }
        self.xml.push_str(
            r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
        );

        self.xml.push_str("</w:body>");
        self.xml.push_str("</w:document>");
        self.xml
    }

    fn write_paragraph(&mut self, para: &Paragraph) {
        self.xml.push_str("<w:p>");

        if let Some(style) = para.style_id() {
            self.xml.push_str(&format!(
                r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#,
                escape_xml_attr(style.as_str())
            ));
        }

        for run in &para.runs {
            self.write_run(run);
        }

        self.xml.push_str("</w:p>");
    }

    /// Write a run, turning inline tabs and newlines back into w:tab / w:br
    fn write_run(&mut self, run: &Run) {
        self.xml.push_str("<w:r>");

        for (line_no, line) in run.text.split('\n').enumerate() {
            if line_no > 0 {
                self.xml.push_str("<w:br/>");
            }
            for (seg_no, segment) in line.split('\t').enumerate() {
                if seg_no > 0 {
                    self.xml.push_str("<w:tab/>");
                }
                if segment.is_empty() {
                    continue;
                }
                if segment.starts_with(' ') || segment.ends_with(' ') {
                    self.xml.push_str(r#"<w:t xml:space="preserve">"#);
                } else {
                    self.xml.push_str("<w:t>");
                }
                self.xml.push_str(&escape_xml(segment));
                self.xml.push_str("</w:t>");
            }
        }

        self.xml.push_str("</w:r>");
    }

    fn write_table(&mut self, table: &Table) {
        let columns = table.column_count().max(1);

        self.xml.push_str("<w:tbl>");
        self.xml.push_str(r#"<w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/></w:tblPr>"#);
        self.xml.push_str("<w:tblGrid>");
        for _ in 0..columns {
            self.xml.push_str("<w:gridCol/>");
        }
        self.xml.push_str("</w:tblGrid>");

        for row in &table.rows {
            self.xml.push_str("<w:tr>");
            for cell in &row.cells {
                self.xml.push_str("<w:tc>");
                // A cell must contain at least one paragraph
                if cell.paragraphs.is_empty() {
                    self.xml.push_str("<w:p/>");
                }
                for para in &cell.paragraphs {
                    self.write_paragraph(para);
                }
                self.xml.push_str("</w:tc>");
            }
            self.xml.push_str("</w:tr>");
        }

        self.xml.push_str("</w:tbl>");
    }
}
