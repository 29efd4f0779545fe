//! Capability handles into the document library
//!
//! A document is backed by up to two handles: a read handle over parsed
//! content and a write handle over live, persistable content. They are trait
//! objects so the manager never depends on which library produced them.

use doc_model::{Body, CoreProperties, Paragraph};
use std::fmt;
use std::path::Path;
use store::{DocxBuilder, DocxError, DocxPackage};

/// Read-oriented view of a document's content
pub trait ReadHandle: fmt::Debug {
    /// Parsed body
    fn body(&self) -> &Body;

    fn properties(&self) -> &CoreProperties;

    /// Flattened plain text
    fn text(&self) -> String {
        self.body().text()
    }

    /// Release whatever the handle holds. Called once, by close.
    fn release(&mut self) -> Result<(), DocxError>;
}

/// Mutable builder that can persist a document
pub trait WriteHandle: fmt::Debug {
    /// Live content, including unsaved changes
    fn body(&self) -> &Body;

    fn append_paragraph(&mut self, paragraph: Paragraph);

    fn set_title(&mut self, title: &str);

    /// Write the complete document to `path`
    fn persist(&mut self, path: &Path) -> Result<(), DocxError>;

    /// Read view of the content as it is now
    fn snapshot(&self) -> Box<dyn ReadHandle>;
}

impl ReadHandle for DocxPackage {
    fn body(&self) -> &Body {
        DocxPackage::body(self)
    }

    fn properties(&self) -> &CoreProperties {
        DocxPackage::properties(self)
    }

    fn release(&mut self) -> Result<(), DocxError> {
        self.close()
    }
}

impl WriteHandle for DocxBuilder {
    fn body(&self) -> &Body {
        DocxBuilder::body(self)
    }

    fn append_paragraph(&mut self, paragraph: Paragraph) {
        self.add_paragraph(paragraph);
    }

    fn set_title(&mut self, title: &str) {
        DocxBuilder::set_title(self, title);
    }

    fn persist(&mut self, path: &Path) -> Result<(), DocxError> {
        self.save(path)
    }

    fn snapshot(&self) -> Box<dyn ReadHandle> {
        Box::new(DocxBuilder::snapshot(self))
    }
}

/// The handles a library hands back for one document
#[derive(Debug, Default)]
pub struct Handles {
    pub reader: Option<Box<dyn ReadHandle>>,
    pub writer: Option<Box<dyn WriteHandle>>,
}
