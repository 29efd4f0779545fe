//! Document.xml parser
//!
//! Parses the main document body into paragraphs, runs and tables.
//! Drawing and text-box content is skipped.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::XmlParser;
use doc_model::{Body, Paragraph, Run, StyleId, Table, TableCell, TableRow};
use quick_xml::events::{BytesStart, Event};

/// Elements whose whole subtree is not part of the body text flow
const SKIPPED_ELEMENTS: &[&str] = &["drawing", "pict", "txbxContent", "object", "delText"];

/// Table being assembled while its rows are parsed
#[derive(Default)]
struct TableBuilder {
    rows: Vec<TableRow>,
    current_row: Option<TableRow>,
    current_cell: Option<TableCell>,
}

/// Parser for document.xml
#[derive(Default)]
pub struct DocumentParser {
    body: Body,
    tables: Vec<TableBuilder>,
    current_para: Option<Paragraph>,
    current_run: Option<Run>,
    in_body: bool,
    in_text: bool,
    in_para_props: bool,
    skip_depth: usize,
}

impl DocumentParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse document.xml into a body
    pub fn parse(mut self, content: &str) -> DocxResult<Body> {
        let mut reader = XmlParser::preserving(content);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => self.start(e),
                Ok(Event::Empty(ref e)) => self.empty(e),
                Ok(Event::End(ref e)) => self.end(e.name().as_ref()),
                Ok(Event::Text(ref e)) => {
                    if self.in_text && self.skip_depth == 0 {
                        if let Some(ref mut run) = self.current_run {
                            let text = e.unescape().map_err(|e| DocxError::XmlParse(e.to_string()))?;
                            run.text.push_str(&text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocxError::from(e)),
                _ => {}
            }
            buf.clear();
        }

        if !self.tables.is_empty() || self.current_para.is_some() {
            return Err(DocxError::InvalidStructure(
                "document.xml ended inside an open paragraph or table".to_string(),
            ));
        }

        Ok(self.body)
    }

    fn start(&mut self, e: &BytesStart) {
        let name = e.name();
        let name = name.as_ref();

        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return;
        }
        if SKIPPED_ELEMENTS.iter().any(|s| XmlParser::matches_element(name, s)) {
            self.skip_depth = 1;
            return;
        }

        if XmlParser::matches_element(name, "body") {
            self.in_body = true;
        } else if !self.in_body {
            // Nothing outside w:body is modelled
        } else if XmlParser::matches_element(name, "tbl") {
            self.tables.push(TableBuilder::default());
        } else if XmlParser::matches_element(name, "tr") {
            if let Some(table) = self.tables.last_mut() {
                table.current_row = Some(TableRow::default());
            }
        } else if XmlParser::matches_element(name, "tc") {
            if let Some(table) = self.tables.last_mut() {
                table.current_cell = Some(TableCell::default());
            }
        } else if XmlParser::matches_element(name, "p") {
            self.current_para = Some(Paragraph::new());
        } else if self.current_para.is_some() && XmlParser::matches_element(name, "pPr") {
            self.in_para_props = true;
        } else if self.in_para_props {
            self.para_property(e);
        } else if self.current_para.is_some() && XmlParser::matches_element(name, "r") {
            self.current_run = Some(Run::default());
        } else if self.current_run.is_some() && XmlParser::matches_element(name, "t") {
            self.in_text = true;
        }
    }

    fn empty(&mut self, e: &BytesStart) {
        if self.skip_depth > 0 || !self.in_body {
            return;
        }
        let name = e.name();
        let name = name.as_ref();

        if XmlParser::matches_element(name, "p") {
            self.current_para = Some(Paragraph::new());
            self.commit_paragraph();
        } else if self.in_para_props {
            self.para_property(e);
        } else if let Some(ref mut run) = self.current_run {
            if XmlParser::matches_element(name, "tab") {
                run.text.push('\t');
            } else if XmlParser::matches_element(name, "br") || XmlParser::matches_element(name, "cr") {
                run.text.push('\n');
            }
        }
    }

    fn end(&mut self, name: &[u8]) {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return;
        }

        if XmlParser::matches_element(name, "body") {
            self.in_body = false;
        } else if XmlParser::matches_element(name, "t") {
            self.in_text = false;
        } else if XmlParser::matches_element(name, "pPr") {
            self.in_para_props = false;
        } else if XmlParser::matches_element(name, "r") {
            if let (Some(run), Some(para)) = (self.current_run.take(), self.current_para.as_mut()) {
                para.push_run(run);
            }
        } else if XmlParser::matches_element(name, "p") {
            self.commit_paragraph();
        } else if XmlParser::matches_element(name, "tc") {
            if let Some(table) = self.tables.last_mut() {
                if let (Some(cell), Some(row)) = (table.current_cell.take(), table.current_row.as_mut()) {
                    row.cells.push(cell);
                }
            }
        } else if XmlParser::matches_element(name, "tr") {
            if let Some(table) = self.tables.last_mut() {
                if let Some(row) = table.current_row.take() {
                    table.rows.push(row);
                }
            }
        } else if XmlParser::matches_element(name, "tbl") {
            self.commit_table();
        }
    }

    fn para_property(&mut self, e: &BytesStart) {
        if XmlParser::matches_element(e.name().as_ref(), "pStyle") {
            if let (Some(val), Some(para)) = (XmlParser::get_w_attribute(e, "val"), self.current_para.as_mut()) {
                para.style_id = Some(StyleId::new(val));
            }
        }
    }

    /// Place a finished paragraph in the innermost open cell, or the body
    fn commit_paragraph(&mut self) {
        let Some(para) = self.current_para.take() else {
            return;
        };
        let top_level = self.tables.is_empty();
        match self.tables.last_mut().and_then(|t| t.current_cell.as_mut()) {
            Some(cell) => cell.paragraphs.push(para),
            None if top_level => self.body.push_paragraph(para),
            None => {}
        }
    }

    /// Nested tables are flattened into their parent cell, one paragraph per row
    fn commit_table(&mut self) {
        let Some(builder) = self.tables.pop() else {
            return;
        };
        let table = Table::new(builder.rows);

        let top_level = self.tables.is_empty();
        match self.tables.last_mut().and_then(|t| t.current_cell.as_mut()) {
            Some(cell) => {
                for line in table.text().lines() {
                    cell.paragraphs.push(Paragraph::with_text(line));
                }
            }
            None if top_level => self.body.push_table(table),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Body {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        );
        DocumentParser::new().parse(&xml).unwrap()
    }

    #[test]
    fn test_paragraphs_and_runs() {
        let body = parse(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world</w:t></w:r></w:p>
               <w:p><w:r><w:t>Second</w:t></w:r></w:p>"#,
        );

        assert_eq!(body.paragraph_count(), 2);
        let first = body.paragraph(0).unwrap();
        assert_eq!(first.text(), "Hello world");
        assert_eq!(first.style_id().map(StyleId::as_str), Some("Heading1"));
        assert_eq!(body.paragraph(1).unwrap().text(), "Second");
    }

    #[test]
    fn test_entities_tabs_and_breaks() {
        let body = parse(r#"<w:p><w:r><w:t>a &amp; b</w:t><w:tab/><w:t>c</w:t><w:br/><w:t>d</w:t></w:r></w:p>"#);
        assert_eq!(body.paragraph(0).unwrap().text(), "a & b\tc\nd");
    }

    #[test]
    fn test_empty_paragraph_element() {
        let body = parse(r#"<w:p/><w:p><w:r><w:t>x</w:t></w:r></w:p>"#);
        assert_eq!(body.paragraph_count(), 2);
        assert!(body.paragraph(0).unwrap().is_empty());
    }

    #[test]
    fn test_table() {
        let body = parse(
            r#"<w:p><w:r><w:t>before</w:t></w:r></w:p>
               <w:tbl><w:tblPr/>
                 <w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc></w:tr>
                 <w:tr><w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc><w:tc><w:p/></w:tc></w:tr>
               </w:tbl>
               <w:p><w:r><w:t>after</w:t></w:r></w:p>"#,
        );

        // Cell paragraphs are not top-level paragraphs
        assert_eq!(body.paragraph_count(), 2);
        assert_eq!(body.table_count(), 1);
        let table = body.table(0).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(body.text(), "before\na\tb\nc\t\nafter");
    }

    #[test]
    fn test_nested_table_is_flattened() {
        let body = parse(
            r#"<w:tbl><w:tr><w:tc>
                 <w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
                 <w:p/>
               </w:tc></w:tr></w:tbl>"#,
        );
        assert_eq!(body.table_count(), 1);
        let cell = &body.table(0).unwrap().rows[0].cells[0];
        assert_eq!(cell.paragraphs[0].text(), "inner");
    }

    #[test]
    fn test_content_outside_cells_is_dropped() {
        let body = parse(
            r#"<w:tbl><w:tr>
                 <w:p><w:r><w:t>stray</w:t></w:r></w:p>
                 <w:tbl><w:tr><w:tc><w:p><w:r><w:t>orphan</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
                 <w:tc><w:p><w:r><w:t>kept</w:t></w:r></w:p></w:tc>
               </w:tr></w:tbl>
               <w:p><w:r><w:t>after</w:t></w:r></w:p>"#,
        );
        assert_eq!(body.table_count(), 1);
        assert_eq!(body.paragraph_count(), 1);
        assert_eq!(body.text(), "kept\nafter");
    }

    #[test]
    fn test_drawing_text_is_skipped() {
        let body = parse(
            r#"<w:p><w:r><w:t>visible</w:t></w:r><w:r><w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>hidden</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing></w:r></w:p>"#,
        );
        assert_eq!(body.paragraph_count(), 1);
        assert_eq!(body.paragraph(0).unwrap().text(), "visible");
    }

    #[test]
    fn test_unterminated_body_is_an_error() {
        let xml = r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>x</w:t></w:r>"#;
        assert!(DocumentParser::new().parse(xml).is_err());
    }
}
