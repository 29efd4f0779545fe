//! DOCX Writer Infrastructure
//!
//! Creates ZIP archives with correct DOCX structure.

use crate::docx::content_types::ContentTypes;
use crate::docx::core_props::write_core_properties;
use crate::docx::document_writer::DocumentWriter;
use crate::docx::error::DocxResult;
use crate::docx::relationships::Relationships;
use crate::docx::styles_writer::StylesWriter;
use crate::docx::{part_names, relationship_types};
use doc_model::{Body, CoreProperties};
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Main DOCX writer
pub struct DocxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    content_types: ContentTypes,
    root_rels: Relationships,
    doc_rels: Relationships,
}

impl<W: Write + Seek> DocxWriter<W> {
    pub fn new(writer: W) -> Self {
        let mut root_rels = Relationships::new();
        root_rels.add(relationship_types::DOCUMENT, part_names::DOCUMENT);
        root_rels.add(relationship_types::CORE_PROPERTIES, part_names::CORE_PROPERTIES);

        let mut doc_rels = Relationships::new();
        doc_rels.add(relationship_types::STYLES, "styles.xml");

        Self {
            zip: ZipWriter::new(writer),
            content_types: ContentTypes::for_package(),
            root_rels,
            doc_rels,
        }
    }

    /// Write a complete package and hand back the underlying writer
    pub fn write(mut self, body: &Body, properties: &CoreProperties) -> DocxResult<W> {
        let content_types_xml = self.content_types.to_xml();
        self.write_file(part_names::CONTENT_TYPES, &content_types_xml)?;

        let root_rels_xml = self.root_rels.to_xml();
        self.write_file(part_names::ROOT_RELS, &root_rels_xml)?;

        let doc_rels_xml = self.doc_rels.to_xml();
        self.write_file(part_names::DOCUMENT_RELS, &doc_rels_xml)?;

        self.write_file(part_names::DOCUMENT, &DocumentWriter::new().write(body))?;
        self.write_file(part_names::STYLES, &StylesWriter::write(body))?;
        self.write_file(part_names::CORE_PROPERTIES, &write_core_properties(properties))?;

        Ok(self.zip.finish()?)
    }

    fn write_file(&mut self, path: &str, content: &str) -> DocxResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        self.zip.start_file(path, options)?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }
}
