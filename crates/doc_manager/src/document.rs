//! The Document entity

use crate::error::{DocumentError, DocumentResult};
use crate::handle::{Handles, ReadHandle, WriteHandle};
use doc_model::{Body, Paragraph, StyleId, Table};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Unique identifier for an open document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key a document is registered under in the manager's table
///
/// Temporary keys are a separate variant, so they can never equal a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    Path(PathBuf),
    Temporary(u64),
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKey::Path(path) => write!(f, "{}", path.display()),
            DocumentKey::Temporary(n) => write!(f, "temp_{n}"),
        }
    }
}

/// Metadata label to value
pub type MetadataMap = BTreeMap<String, String>;

/// Image entry reported by a read handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub name: String,
    pub content_type: String,
}

/// Style entry reported by a read handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleInfo {
    pub id: StyleId,
    pub name: String,
}

/// One open document
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    pub(crate) key: DocumentKey,
    path: Option<PathBuf>,
    display_name: String,
    title: String,
    modified: bool,
    open: bool,
    reader: Option<Box<dyn ReadHandle>>,
    writer: Option<Box<dyn WriteHandle>>,
    default_style: StyleId,
}

impl Document {
    /// Document backed by a file on disk
    pub(crate) fn opened(path: &Path, handles: Handles, default_style: StyleId) -> Self {
        let title = handles
            .reader
            .as_ref()
            .and_then(|reader| reader.properties().title().map(str::to_string))
            .unwrap_or_default();
        Self {
            id: DocumentId::new(),
            key: DocumentKey::Path(path.to_path_buf()),
            path: Some(path.to_path_buf()),
            display_name: display_name_of(path),
            title,
            modified: false,
            open: true,
            reader: handles.reader,
            writer: handles.writer,
            default_style,
        }
    }

    /// Empty document that has never been saved
    pub(crate) fn untitled(
        key: DocumentKey,
        writer: Box<dyn WriteHandle>,
        untitled_name: &str,
        default_style: StyleId,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            key,
            path: None,
            display_name: untitled_name.to_string(),
            title: untitled_name.to_string(),
            modified: true,
            open: true,
            reader: None,
            writer: Some(writer),
            default_style,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    /// Path of the most recent open or save, `None` if never persisted
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether read queries are backed by a read handle
    pub fn can_read(&self) -> bool {
        self.reader.is_some()
    }

    /// Whether the document can be mutated and saved
    pub fn can_write(&self) -> bool {
        self.writer.is_some()
    }

    pub fn default_style(&self) -> &StyleId {
        &self.default_style
    }

    /// Append a paragraph in the default style
    pub fn add_paragraph(&mut self, text: &str) -> DocumentResult<()> {
        let writer = self.writer.as_mut().ok_or(DocumentError::WriterNotInitialized)?;
        writer.append_paragraph(Paragraph::styled(self.default_style.clone(), text));
        self.modified = true;
        Ok(())
    }

    /// Append text. There are no inline runs; this adds a paragraph.
    pub fn add_text(&mut self, text: &str) -> DocumentResult<()> {
        self.add_paragraph(text)
    }

    /// Set the user-visible title
    pub fn set_title(&mut self, title: &str) {
        if let Some(writer) = self.writer.as_mut() {
            writer.set_title(title);
        }
        self.title = title.to_string();
        self.modified = true;
    }

    pub fn text(&self) -> DocumentResult<String> {
        Ok(self.reader()?.text())
    }

    pub fn paragraphs(&self) -> DocumentResult<Vec<&Paragraph>> {
        Ok(self.reader()?.body().paragraphs().collect())
    }

    pub fn tables(&self) -> DocumentResult<Vec<&Table>> {
        Ok(self.reader()?.body().tables().collect())
    }

    /// Embedded images. Extraction is not available, so this is empty.
    pub fn images(&self) -> DocumentResult<Vec<ImageInfo>> {
        self.reader()?;
        Ok(Vec::new())
    }

    /// Style definitions. Extraction is not available, so this is empty.
    pub fn styles(&self) -> DocumentResult<Vec<StyleInfo>> {
        self.reader()?;
        Ok(Vec::new())
    }

    /// Extended metadata. Extraction is not available, so this is empty.
    pub fn metadata(&self) -> DocumentResult<MetadataMap> {
        self.reader()?;
        Ok(MetadataMap::new())
    }

    /// Live content from the write handle, including unsaved changes
    pub fn write_view(&self) -> Option<&Body> {
        self.writer.as_deref().map(|writer| writer.body())
    }

    /// Content from the read handle
    pub fn read_view(&self) -> Option<&Body> {
        self.reader.as_deref().map(|reader| reader.body())
    }

    fn reader(&self) -> DocumentResult<&dyn ReadHandle> {
        self.reader.as_deref().ok_or(DocumentError::DocumentNotOpen)
    }

    pub(crate) fn writer_mut(&mut self) -> DocumentResult<&mut Box<dyn WriteHandle>> {
        self.writer.as_mut().ok_or(DocumentError::WriterNotInitialized)
    }

    /// Record a successful save: clear the flag and read back what was written
    pub(crate) fn mark_saved(&mut self) {
        if let Some(snapshot) = self.writer.as_ref().map(|writer| writer.snapshot()) {
            self.release_reader();
            self.reader = Some(snapshot);
        }
        self.modified = false;
    }

    /// Point the document at a new path after Save As
    pub(crate) fn rebind(&mut self, path: &Path) {
        self.key = DocumentKey::Path(path.to_path_buf());
        self.path = Some(path.to_path_buf());
        self.display_name = display_name_of(path);
    }

    /// Release the read handle and mark the document closed. Release
    /// failures are logged, never returned.
    pub(crate) fn release(&mut self) {
        self.release_reader();
        self.open = false;
    }

    fn release_reader(&mut self) {
        if let Some(mut reader) = self.reader.take() {
            if let Err(e) = reader.release() {
                tracing::warn!(document = %self.id, error = %e, "Failed to release read handle");
            }
        }
    }
}

fn display_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
