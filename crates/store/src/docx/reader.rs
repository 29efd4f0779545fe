//! ZIP archive reading and XML parsing utilities

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::part_names;
use quick_xml::events::BytesStart;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A wrapper around a ZIP archive for reading DOCX files
pub struct DocxReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> DocxReader<R> {
    /// Create a new DOCX reader from a source that implements Read + Seek
    pub fn new(reader: R) -> DocxResult<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read a part from the archive as a string
    pub fn read_file_as_string(&mut self, path: &str) -> DocxResult<String> {
        let mut file = self.archive.by_name(path).map_err(|e| match e {
            zip::result::ZipError::FileNotFound => DocxError::MissingPart(path.to_string()),
            other => DocxError::from(other),
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(String::from_utf8(contents)?)
    }

    /// Read a part only if it exists
    pub fn read_optional(&mut self, path: &str) -> DocxResult<Option<String>> {
        if self.file_exists(path) {
            self.read_file_as_string(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Check if a part exists in the archive
    pub fn file_exists(&self, path: &str) -> bool {
        self.archive.file_names().any(|name| name == path)
    }

    /// A package must at least carry content types and a main document
    pub fn is_valid_docx(&self) -> bool {
        self.file_exists(part_names::CONTENT_TYPES) && self.file_exists(part_names::DOCUMENT)
    }
}

/// XML reader utilities for parsing DOCX XML content
pub struct XmlParser;

impl XmlParser {
    /// XML reader that trims whitespace-only text between elements
    pub fn from_string(content: &str) -> Reader<&[u8]> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);
        reader
    }

    /// XML reader that keeps text exactly as written, for `w:t` content
    pub fn preserving(content: &str) -> Reader<&[u8]> {
        Reader::from_str(content)
    }

    /// Get an attribute value from an element
    pub fn get_attribute(event: &BytesStart, name: &[u8]) -> Option<String> {
        event
            .attributes()
            .filter_map(|a| a.ok())
            .find(|a| a.key.as_ref() == name)
            .map(|a| String::from_utf8_lossy(&a.value).to_string())
    }

    /// Get a `w:` attribute, accepting the unprefixed form too
    pub fn get_w_attribute(event: &BytesStart, name: &str) -> Option<String> {
        let prefixed = format!("w:{}", name);
        Self::get_attribute(event, prefixed.as_bytes())
            .or_else(|| Self::get_attribute(event, name.as_bytes()))
    }

    /// Check if an element name matches with optional namespace prefix
    pub fn matches_element(name: &[u8], expected: &str) -> bool {
        let local = match name.iter().rposition(|&b| b == b':') {
            Some(pos) => &name[pos + 1..],
            None => name,
        };
        local == expected.as_bytes()
    }
}
