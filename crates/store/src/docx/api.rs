//! Public API for DOCX import/export
//!
//! This module provides the main entry points for working with DOCX files.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::package::DocxPackage;
use crate::docx::writer::DocxWriter;
use doc_model::{Body, CoreProperties};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Import a DOCX file from disk
///
/// # Example
///
/// ```ignore
/// use store::docx::import_docx;
/// use std::path::Path;
///
/// let package = import_docx(Path::new("document.docx"))?;
/// println!("{}", package.text());
/// ```
pub fn import_docx(path: &Path) -> DocxResult<DocxPackage> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DocxError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            ))
        } else {
            DocxError::Io(e)
        }
    })?;

    let package = DocxPackage::parse(BufReader::new(file))?;
    Ok(package.with_source(path))
}

/// Import a DOCX from an in-memory byte slice
pub fn import_docx_bytes(bytes: &[u8]) -> DocxResult<DocxPackage> {
    DocxPackage::parse(Cursor::new(bytes))
}

/// Export content to a DOCX file on disk, creating parent directories
pub fn export_docx(body: &Body, properties: &CoreProperties, path: &Path) -> DocxResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = DocxWriter::new(BufWriter::new(file)).write(body, properties)?;
    writer.flush()?;
    Ok(())
}

/// Export content to an in-memory byte vector
pub fn export_docx_bytes(body: &Body, properties: &CoreProperties) -> DocxResult<Vec<u8>> {
    let cursor = DocxWriter::new(Cursor::new(Vec::new())).write(body, properties)?;
    Ok(cursor.into_inner())
}

/// File formats known to the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Microsoft Word DOCX format (Office Open XML)
    Docx,
    /// Legacy Word extension; accepted, but written as Office Open XML
    Doc,
    /// PDF (export target only)
    Pdf,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Docx => "docx",
            FileFormat::Doc => "doc",
            FileFormat::Pdf => "pdf",
        }
    }

    /// Whether documents in this format can be opened and saved
    pub fn is_word_document(&self) -> bool {
        matches!(self, FileFormat::Docx | FileFormat::Doc)
    }

    /// Detect format from a file extension, case-insensitively
    pub fn from_extension(ext: &str) -> Option<FileFormat> {
        match ext.to_lowercase().as_str() {
            "docx" => Some(FileFormat::Docx),
            "doc" => Some(FileFormat::Doc),
            "pdf" => Some(FileFormat::Pdf),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<FileFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(FileFormat::from_extension)
    }
}
