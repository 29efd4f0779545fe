//! Read and write sides of a DOCX document
//!
//! [`DocxPackage`] is the parsed, read-oriented view of a package on disk.
//! [`DocxBuilder`] holds live, mutable content and persists it as a
//! complete package.

use crate::docx::api::export_docx;
use crate::docx::content_types::ContentTypes;
use crate::docx::core_props::parse_core_properties;
use crate::docx::document::DocumentParser;
use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::DocxReader;
use crate::docx::relationships::{resolve_target, Relationships};
use crate::docx::writer::DocxWriter;
use crate::docx::{part_names, relationship_types};
use chrono::Utc;
use doc_model::{Body, CoreProperties, Paragraph, Table};
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

/// Parsed view of a DOCX package
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    source: Option<PathBuf>,
    body: Body,
    properties: CoreProperties,
    closed: bool,
}

impl DocxPackage {
    /// Parse a package from any seekable source
    pub fn parse<R: Read + Seek>(reader: R) -> DocxResult<Self> {
        let mut docx = DocxReader::new(reader)?;

        if !docx.is_valid_docx() {
            return Err(DocxError::InvalidStructure(
                "Missing required DOCX files".to_string(),
            ));
        }

        let content_types = ContentTypes::parse(&docx.read_file_as_string(part_names::CONTENT_TYPES)?)?;
        if !content_types.declares_main_document() {
            tracing::warn!("Package does not declare a main document content type");
        }

        let root_rels = match docx.read_optional(part_names::ROOT_RELS)? {
            Some(xml) => Relationships::parse(&xml)?,
            None => Relationships::new(),
        };

        let document_part = root_rels
            .get_by_type(relationship_types::DOCUMENT)
            .map(|rel| resolve_target("", &rel.target))
            .unwrap_or_else(|| part_names::DOCUMENT.to_string());
        let body = DocumentParser::new().parse(&docx.read_file_as_string(&document_part)?)?;

        let core_part = root_rels
            .get_by_type(relationship_types::CORE_PROPERTIES)
            .map(|rel| resolve_target("", &rel.target))
            .unwrap_or_else(|| part_names::CORE_PROPERTIES.to_string());
        let properties = match docx.read_optional(&core_part)? {
            Some(xml) => parse_core_properties(&xml)?,
            None => CoreProperties::default(),
        };

        Ok(Self {
            source: None,
            body,
            properties,
            closed: false,
        })
    }

    /// Package view over content that is already in memory
    pub fn from_parts(body: Body, properties: CoreProperties) -> Self {
        Self {
            source: None,
            body,
            properties,
            closed: false,
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// File the package was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn properties(&self) -> &CoreProperties {
        &self.properties
    }

    /// Flattened document text
    pub fn text(&self) -> String {
        self.body.text()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.paragraphs()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.tables()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Release the parsed content. Closing twice is an error.
    pub fn close(&mut self) -> DocxResult<()> {
        if self.closed {
            return Err(DocxError::InvalidStructure(format!(
                "package {} is already closed",
                self.source
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<memory>".to_string())
            )));
        }
        self.body = Body::new();
        self.closed = true;
        Ok(())
    }
}

/// Mutable document content that can be persisted as a package
#[derive(Debug, Clone, Default)]
pub struct DocxBuilder {
    body: Body,
    properties: CoreProperties,
}

impl DocxBuilder {
    /// An empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the content of a parsed package
    pub fn from_package(package: &DocxPackage) -> Self {
        Self {
            body: package.body().clone(),
            properties: package.properties().clone(),
        }
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn properties(&self) -> &CoreProperties {
        &self.properties
    }

    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.body.push_paragraph(paragraph);
    }

    pub fn add_table(&mut self, table: Table) {
        self.body.push_table(table);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.properties.title = Some(title.into());
    }

    /// Stamp timestamps and write the package to `path`
    pub fn save(&mut self, path: &Path) -> DocxResult<()> {
        self.properties.touch(Utc::now());
        export_docx(&self.body, &self.properties, path)
    }

    /// Serialize the package to bytes without touching timestamps
    pub fn to_bytes(&self) -> DocxResult<Vec<u8>> {
        let cursor = DocxWriter::new(Cursor::new(Vec::new())).write(&self.body, &self.properties)?;
        Ok(cursor.into_inner())
    }

    /// Read view of the current content
    pub fn snapshot(&self) -> DocxPackage {
        DocxPackage::from_parts(self.body.clone(), self.properties.clone())
    }
}
