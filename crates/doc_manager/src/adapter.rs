//! Best-effort projection of a document for presentation
//!
//! Nothing here returns an error. Counts degrade to zero, text degrades to
//! an empty string, and failures from the underlying document become a
//! diagnostic line the view can show in place of the content.

use crate::document::Document;
use doc_model::Body;
use std::fmt::Display;
use tracing::debug;

/// Title shown when a document has neither a title nor a display name
pub const UNKNOWN_DOCUMENT: &str = "Unknown Document";

/// Text shown for a paragraph with no runs
pub const EMPTY_PARAGRAPH: &str = "Empty paragraph";

/// Placeholder value for metadata that cannot be extracted
pub const UNKNOWN_VALUE: &str = "Unknown";

/// Read-only queries the navigation tree and content views are built from
///
/// Indices are 0-based. Implementations never fail and never panic on an
/// out-of-range index.
pub trait Projection {
    fn has_document(&self) -> bool;

    fn title(&self) -> String;

    /// Full text of the document
    fn text(&self) -> String;

    fn paragraph_count(&self) -> usize;
    fn paragraph_text(&self, index: usize) -> String;

    fn table_count(&self) -> usize;
    fn table_info(&self, index: usize) -> String;

    fn image_count(&self) -> usize;
    fn image_info(&self, index: usize) -> String;

    fn style_count(&self) -> usize;
    fn style_info(&self, index: usize) -> String;

    /// Label and value pairs, in display order
    fn metadata(&self) -> Vec<(String, String)>;
}

/// Where a query gets its data from
enum Source<'a> {
    /// The write handle's live content
    Live(&'a Body),
    /// The document's read queries
    Parsed(&'a Document),
    Empty,
}

/// [`Projection`] over an optional document
#[derive(Debug, Clone, Copy)]
pub struct DocumentAdapter<'a> {
    document: Option<&'a Document>,
}

impl<'a> DocumentAdapter<'a> {
    pub fn new(document: Option<&'a Document>) -> Self {
        Self { document }
    }

    pub fn document(&self) -> Option<&'a Document> {
        self.document
    }

    fn source(&self) -> Source<'a> {
        match self.document {
            Some(doc) => match doc.write_view() {
                Some(body) => Source::Live(body),
                None if doc.can_read() => Source::Parsed(doc),
                None => Source::Empty,
            },
            None => Source::Empty,
        }
    }
}

impl<'a> From<&'a Document> for DocumentAdapter<'a> {
    fn from(document: &'a Document) -> Self {
        Self::new(Some(document))
    }
}

impl Projection for DocumentAdapter<'_> {
    fn has_document(&self) -> bool {
        self.document.is_some()
    }

    fn title(&self) -> String {
        let Some(doc) = self.document else {
            return UNKNOWN_DOCUMENT.to_string();
        };
        [doc.title(), doc.display_name()]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .unwrap_or(UNKNOWN_DOCUMENT)
            .to_string()
    }

    fn text(&self) -> String {
        match self.source() {
            Source::Live(body) => body.text(),
            Source::Parsed(doc) => doc
                .text()
                .unwrap_or_else(|e| format!("Error reading text: {e}")),
            Source::Empty => String::new(),
        }
    }

    fn paragraph_count(&self) -> usize {
        match self.source() {
            Source::Live(body) => body.paragraph_count(),
            Source::Parsed(doc) => count_or_zero("paragraphs", doc.paragraphs().map(|p| p.len())),
            Source::Empty => 0,
        }
    }

    fn paragraph_text(&self, index: usize) -> String {
        let text = match self.source() {
            Source::Live(body) => body.paragraph(index).map(|p| p.text()),
            Source::Parsed(doc) => match doc.paragraphs() {
                Ok(paragraphs) => paragraphs.get(index).map(|p| p.text()),
                Err(e) => return read_error("paragraph", index, e),
            },
            Source::Empty => return String::new(),
        };
        match text {
            Some(text) if text.is_empty() => EMPTY_PARAGRAPH.to_string(),
            Some(text) => text,
            None => unavailable("Paragraph", index),
        }
    }

    fn table_count(&self) -> usize {
        match self.source() {
            Source::Live(body) => body.table_count(),
            Source::Parsed(doc) => count_or_zero("tables", doc.tables().map(|t| t.len())),
            Source::Empty => 0,
        }
    }

    fn table_info(&self, index: usize) -> String {
        let table = match self.source() {
            Source::Live(body) => body.table(index).map(|t| (t.row_count(), t.column_count())),
            Source::Parsed(doc) => match doc.tables() {
                Ok(tables) => tables.get(index).map(|t| (t.row_count(), t.column_count())),
                Err(e) => return read_error("table", index, e),
            },
            Source::Empty => return String::new(),
        };
        match table {
            Some((rows, columns)) => format!("{rows} rows x {columns} columns"),
            None => unavailable("Table", index),
        }
    }

    fn image_count(&self) -> usize {
        match self.document {
            Some(doc) if doc.can_read() => count_or_zero("images", doc.images().map(|i| i.len())),
            _ => 0,
        }
    }

    fn image_info(&self, index: usize) -> String {
        let Some(doc) = self.document.filter(|d| d.can_read() || d.can_write()) else {
            return String::new();
        };
        match doc.images() {
            Ok(images) => images
                .get(index)
                .map(|image| format!("{} ({})", image.name, image.content_type))
                .unwrap_or_else(|| unavailable("Image", index)),
            Err(e) => read_error("image", index, e),
        }
    }

    fn style_count(&self) -> usize {
        match self.document {
            Some(doc) if doc.can_read() => count_or_zero("styles", doc.styles().map(|s| s.len())),
            _ => 0,
        }
    }

    fn style_info(&self, index: usize) -> String {
        let Some(doc) = self.document.filter(|d| d.can_read() || d.can_write()) else {
            return String::new();
        };
        match doc.styles() {
            Ok(styles) => styles
                .get(index)
                .map(|style| format!("{} ({})", style.name, style.id))
                .unwrap_or_else(|| unavailable("Style", index)),
            Err(e) => read_error("style", index, e),
        }
    }

    fn metadata(&self) -> Vec<(String, String)> {
        let Some(doc) = self.document.filter(|d| d.can_read()) else {
            return Vec::new();
        };
        if let Err(e) = doc.metadata() {
            return vec![("Error".to_string(), format!("Error reading metadata: {e}"))];
        }

        let mut entries = vec![("Title".to_string(), self.title())];
        entries.extend(
            ["Author", "Pages", "Words", "Characters", "Created", "Modified"]
                .into_iter()
                .map(|label| (label.to_string(), UNKNOWN_VALUE.to_string())),
        );
        entries
    }
}

fn count_or_zero<E: Display>(what: &str, count: Result<usize, E>) -> usize {
    count.unwrap_or_else(|e| {
        debug!(error = %e, "Cannot count {what}, showing none");
        0
    })
}

fn unavailable(kind: &str, index: usize) -> String {
    format!("{kind} {} unavailable", index.saturating_add(1))
}

fn read_error(kind: &str, index: usize, error: impl Display) -> String {
    format!("Error reading {kind} {}: {error}", index.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKey;
    use crate::handle::Handles;
    use doc_model::{CoreProperties, Paragraph, StyleId, Table, TableCell, TableRow};
    use std::path::Path;
    use store::{DocxBuilder, DocxPackage};

    fn parsed(body: Body) -> Document {
        let handles = Handles {
            reader: Some(Box::new(DocxPackage::from_parts(body, CoreProperties::default()))),
            writer: None,
        };
        Document::opened(Path::new("/docs/parsed.docx"), handles, StyleId::default())
    }

    fn untitled() -> Document {
        Document::untitled(
            DocumentKey::Temporary(1),
            Box::new(DocxBuilder::new()),
            "Untitled Document.docx",
            StyleId::default(),
        )
    }

    fn no_handles() -> Document {
        Document::opened(Path::new("/docs/empty.docx"), Handles::default(), StyleId::default())
    }

    fn sample_body() -> Body {
        let mut body = Body::new();
        body.push_paragraph(Paragraph::with_text("Introduction"));
        body.push_paragraph(Paragraph::new());
        body.push_table(Table::new(vec![
            TableRow::new(vec![TableCell::with_text("a"), TableCell::with_text("b")]),
            TableRow::new(vec![TableCell::with_text("c"), TableCell::with_text("d")]),
            TableRow::new(vec![TableCell::with_text("e"), TableCell::with_text("f")]),
        ]));
        body
    }

    #[test]
    fn test_no_document() {
        let adapter = DocumentAdapter::new(None);
        assert!(!adapter.has_document());
        assert_eq!(adapter.title(), UNKNOWN_DOCUMENT);
        assert_eq!(adapter.paragraph_count(), 0);
        assert_eq!(adapter.paragraph_text(0), "");
        assert!(adapter.metadata().is_empty());
    }

    #[test]
    fn test_document_without_handles_degrades() {
        let doc = no_handles();
        let adapter = DocumentAdapter::from(&doc);

        assert_eq!(adapter.paragraph_count(), 0);
        assert_eq!(adapter.table_count(), 0);
        assert_eq!(adapter.image_count(), 0);
        assert_eq!(adapter.style_count(), 0);
        assert_eq!(adapter.paragraph_text(0), "");
        assert_eq!(adapter.table_info(0), "");
        assert_eq!(adapter.image_info(0), "");
        assert_eq!(adapter.title(), "empty.docx");
    }

    #[test]
    fn test_parsed_document() {
        let doc = parsed(sample_body());
        let adapter = DocumentAdapter::from(&doc);

        assert_eq!(adapter.paragraph_count(), 2);
        assert_eq!(adapter.paragraph_text(0), "Introduction");
        assert_eq!(adapter.paragraph_text(1), EMPTY_PARAGRAPH);
        assert_eq!(adapter.paragraph_text(7), "Paragraph 8 unavailable");

        assert_eq!(adapter.table_count(), 1);
        assert_eq!(adapter.table_info(0), "3 rows x 2 columns");
        assert_eq!(adapter.table_info(1), "Table 2 unavailable");

        assert_eq!(adapter.image_count(), 0);
        assert_eq!(adapter.image_info(0), "Image 1 unavailable");
        assert_eq!(adapter.style_count(), 0);
        assert_eq!(adapter.style_info(2), "Style 3 unavailable");
    }

    #[test]
    fn test_live_view_preferred() {
        let mut doc = untitled();
        doc.add_paragraph("First").unwrap();
        doc.add_paragraph("Second").unwrap();
        let adapter = DocumentAdapter::from(&doc);

        assert_eq!(adapter.paragraph_count(), 2);
        assert_eq!(adapter.paragraph_text(1), "Second");
        assert_eq!(adapter.table_count(), 0);
    }

    #[test]
    fn test_write_only_reports_read_errors() {
        let doc = untitled();
        let adapter = DocumentAdapter::from(&doc);

        assert_eq!(adapter.image_count(), 0);
        assert!(adapter.image_info(0).starts_with("Error reading image 1:"));
        assert!(adapter.style_info(0).starts_with("Error reading style 1:"));
        assert!(adapter.metadata().is_empty());
    }

    #[test]
    fn test_title_fallbacks() {
        let mut doc = parsed(Body::new());
        assert_eq!(DocumentAdapter::from(&doc).title(), "parsed.docx");

        doc.set_title("Annual Report");
        assert_eq!(DocumentAdapter::from(&doc).title(), "Annual Report");

        doc.set_title("   ");
        assert_eq!(DocumentAdapter::from(&doc).title(), "parsed.docx");
    }

    #[test]
    fn test_metadata_placeholders() {
        let mut doc = parsed(Body::new());
        doc.set_title("Plan");
        let metadata = DocumentAdapter::from(&doc).metadata();

        assert_eq!(metadata[0], ("Title".to_string(), "Plan".to_string()));
        assert_eq!(metadata.len(), 7);
        assert!(metadata[1..].iter().all(|(_, value)| value == UNKNOWN_VALUE));
    }

    #[test]
    fn test_text_sources() {
        assert_eq!(DocumentAdapter::new(None).text(), "");
        assert_eq!(DocumentAdapter::from(&no_handles()).text(), "");

        let doc = parsed(sample_body());
        assert_eq!(DocumentAdapter::from(&doc).text(), "Introduction\n\na\tb\nc\td\ne\tf");

        let mut doc = untitled();
        doc.add_paragraph("Live").unwrap();
        doc.add_paragraph("text").unwrap();
        assert_eq!(DocumentAdapter::from(&doc).text(), "Live\ntext");
    }

    #[test]
    fn test_released_document_has_no_text() {
        let mut doc = parsed(sample_body());
        doc.release();
        assert_eq!(DocumentAdapter::from(&doc).text(), "");
    }

    #[test]
    fn test_last_index_does_not_overflow() {
        let doc = parsed(sample_body());
        let adapter = DocumentAdapter::from(&doc);
        let last = usize::MAX.to_string();

        assert_eq!(adapter.paragraph_text(usize::MAX), format!("Paragraph {last} unavailable"));
        assert_eq!(adapter.table_info(usize::MAX), format!("Table {last} unavailable"));
        assert_eq!(unavailable("Style", usize::MAX), format!("Style {last} unavailable"));
        assert!(read_error("image", usize::MAX, "boom").starts_with(&format!("Error reading image {last}:")));
    }

    #[test]
    fn test_adapter_does_not_mutate() {
        let mut doc = untitled();
        doc.add_paragraph("x").unwrap();
        let before = doc.is_modified();
        let adapter = DocumentAdapter::from(&doc);
        let _ = (adapter.paragraph_count(), adapter.paragraph_text(0), adapter.metadata());
        assert_eq!(doc.is_modified(), before);
    }
}
