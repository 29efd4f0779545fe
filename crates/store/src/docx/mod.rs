//! DOCX Import/Export Module
//!
//! Reads and writes Microsoft Word DOCX packages (Office Open XML,
//! ECMA-376). A DOCX file is a ZIP archive of XML parts:
//! - `[Content_Types].xml` - Content type definitions
//! - `_rels/.rels` - Root relationships
//! - `word/document.xml` - Main document content
//! - `word/styles.xml` - Style definitions
//! - `word/_rels/document.xml.rels` - Document relationships
//! - `docProps/core.xml` - Core properties (title, author, timestamps)
//!
//! Only the body structure (paragraphs, runs, tables) and the core
//! properties are modelled; other parts are not read.

mod error;
mod reader;
mod content_types;
mod relationships;
mod document;
mod core_props;
mod document_writer;
mod styles_writer;
mod writer;
mod package;
mod api;

pub use error::{DocxError, DocxResult};
pub use api::{export_docx, export_docx_bytes, import_docx, import_docx_bytes, FileFormat};
pub use package::{DocxBuilder, DocxPackage};

/// XML namespaces used in DOCX files
pub mod namespaces {
    /// Main WordprocessingML namespace
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Relationships namespace
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    /// Package relationships namespace
    pub const PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    /// Content types namespace
    pub const CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
    /// Core properties namespace
    pub const CP: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
    /// Dublin Core elements
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    /// Dublin Core terms
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    /// XML Schema instance
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
}

/// Relationship types used in DOCX
pub mod relationship_types {
    pub const DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const CORE_PROPERTIES: &str = "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
}

/// Content types for DOCX parts
pub mod content_type_values {
    pub const DOCUMENT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const XML: &str = "application/xml";
}

/// Well-known part names inside the package
pub mod part_names {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const ROOT_RELS: &str = "_rels/.rels";
    pub const DOCUMENT: &str = "word/document.xml";
    pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
    pub const STYLES: &str = "word/styles.xml";
    pub const CORE_PROPERTIES: &str = "docProps/core.xml";
}

/// Escape text content for inclusion in XML
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an XML attribute value
pub(crate) fn escape_xml_attr(s: &str) -> String {
    escape_xml(s).replace('"', "&quot;")
}
