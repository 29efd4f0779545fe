//! The document library the manager opens and creates documents through

use crate::handle::{Handles, WriteHandle};
use std::path::Path;
use store::{DocxBuilder, DocxError, DocxPackage};

/// Whether an opened document also gets a write handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadWrite,
    ReadOnly,
}

/// Source of document handles
pub trait DocumentLibrary {
    /// Parse the file at `path`
    fn open(&self, path: &Path, mode: OpenMode) -> Result<Handles, DocxError>;

    /// An empty, writable document
    fn create(&self) -> Box<dyn WriteHandle>;
}

/// DOCX library backed by `store::docx`
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxLibrary;

impl DocumentLibrary for DocxLibrary {
    fn open(&self, path: &Path, mode: OpenMode) -> Result<Handles, DocxError> {
        let package: DocxPackage = store::import_docx(path)?;
        let writer = match mode {
            OpenMode::ReadWrite => Some(Box::new(DocxBuilder::from_package(&package)) as Box<dyn WriteHandle>),
            OpenMode::ReadOnly => None,
        };
        Ok(Handles {
            reader: Some(Box::new(package)),
            writer,
        })
    }

    fn create(&self) -> Box<dyn WriteHandle> {
        Box::new(DocxBuilder::new())
    }
}
