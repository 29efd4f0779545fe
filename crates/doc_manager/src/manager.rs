//! Document Manager
//!
//! Owns every open document, the table of keys they are registered under
//! and the current-document pointer. Documents are addressed by
//! [`DocumentId`]; keys are what makes a second `open` of the same path
//! resolve to the same document.
//!
//! Invariants:
//! - each document is registered under exactly one key, and each key names
//!   at most one document
//! - `current`, when set, names a document in the table
//! - a document is never modified right after a successful save

use crate::document::{Document, DocumentId, DocumentKey};
use crate::error::{DocumentError, DocumentResult};
use crate::library::{DocumentLibrary, DocxLibrary, OpenMode};
use doc_model::StyleId;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use store::{DocumentSettings, FileFormat, ShellSettings};
use tracing::{debug, info, warn};

/// Orchestrates the lifecycle of open documents
pub struct DocumentManager {
    library: Box<dyn DocumentLibrary>,
    settings: DocumentSettings,
    documents: HashMap<DocumentId, Document>,
    keys: HashMap<DocumentKey, DocumentId>,
    current: Option<DocumentId>,
    next_temporary: u64,
}

impl DocumentManager {
    /// Manager over the DOCX library with default settings
    pub fn new() -> Self {
        Self::with_library(Box::new(DocxLibrary), &ShellSettings::default())
    }

    pub fn with_settings(settings: &ShellSettings) -> Self {
        Self::with_library(Box::new(DocxLibrary), settings)
    }

    pub fn with_library(library: Box<dyn DocumentLibrary>, settings: &ShellSettings) -> Self {
        Self {
            library,
            settings: settings.documents.clone(),
            documents: HashMap::new(),
            keys: HashMap::new(),
            current: None,
            next_temporary: 0,
        }
    }

    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    /// Open the document at `path` for reading and writing
    ///
    /// Opening a path that is already open returns the existing document
    /// without reading the file again.
    pub fn open(&mut self, path: impl AsRef<Path>) -> DocumentResult<&mut Document> {
        self.open_with_mode(path.as_ref(), OpenMode::ReadWrite)
    }

    /// Open the document at `path` without a write handle
    pub fn open_read_only(&mut self, path: impl AsRef<Path>) -> DocumentResult<&mut Document> {
        self.open_with_mode(path.as_ref(), OpenMode::ReadOnly)
    }

    fn open_with_mode(&mut self, path: &Path, mode: OpenMode) -> DocumentResult<&mut Document> {
        ensure_word_document(path)?;

        let key = DocumentKey::Path(path.to_path_buf());
        let existing = self.keys.get(&key).copied();
        let id = match existing {
            Some(id) => {
                debug!(path = %path.display(), document = %id, "Document already open");
                id
            }
            None => {
                let handles = self
                    .library
                    .open(path, mode)
                    .map_err(DocumentError::library("open", path))?;
                let document = Document::opened(path, handles, self.default_style());
                let id = document.id();
                info!(path = %path.display(), document = %id, ?mode, "Opened document");
                self.register(document);
                id
            }
        };

        self.current = Some(id);
        self.get_mut(id)
    }

    /// Create an empty, unsaved document and make it current
    pub fn new_document(&mut self) -> DocumentResult<&mut Document> {
        self.next_temporary += 1;
        let key = DocumentKey::Temporary(self.next_temporary);
        let writer = self.library.create();
        let document = Document::untitled(key, writer, &self.settings.untitled_name, self.default_style());
        let id = document.id();
        info!(document = %id, key = %document.key(), "Created new document");

        self.register(document);
        self.current = Some(id);
        self.get_mut(id)
    }

    /// Persist a document to its current path
    pub fn save(&mut self, id: DocumentId) -> DocumentResult<()> {
        let document = self.get_mut(id)?;
        document.writer_mut()?;
        let path = document
            .path()
            .map(Path::to_path_buf)
            .ok_or(DocumentError::SavePathNotSet)?;

        document
            .writer_mut()?
            .persist(&path)
            .map_err(DocumentError::library("save", &path))?;
        document.mark_saved();

        info!(path = %path.display(), document = %id, "Saved document");
        Ok(())
    }

    /// Persist a document to `new_path` and register it under that path
    pub fn save_as(&mut self, id: DocumentId, new_path: impl AsRef<Path>) -> DocumentResult<()> {
        let new_path = new_path.as_ref();
        ensure_word_document(new_path)?;

        let new_key = DocumentKey::Path(new_path.to_path_buf());
        if let Some(&owner) = self.keys.get(&new_key) {
            if owner != id {
                return Err(DocumentError::PathAlreadyOpen(new_path.to_path_buf()));
            }
        }

        let document = self
            .documents
            .get_mut(&id)
            .ok_or(DocumentError::NoSuchDocument(id))?;
        document
            .writer_mut()?
            .persist(new_path)
            .map_err(DocumentError::library("save", new_path))?;

        let old_key = document.key().clone();
        document.rebind(new_path);
        document.mark_saved();
        self.keys.remove(&old_key);
        self.keys.insert(new_key, id);

        info!(from = %old_key, to = %new_path.display(), document = %id, "Saved document as");
        Ok(())
    }

    /// Export a document as PDF
    ///
    /// PDF rendering is not available. The document is saved as DOCX to
    /// `<output>.docx` and `ExportNotImplemented` is returned with both
    /// paths. The document's path and modified state are unchanged.
    ///
    /// A fallback path that is the key of an open document, this one
    /// included, is refused with `PathAlreadyOpen` before anything is
    /// written.
    pub fn export_to_pdf(&mut self, id: DocumentId, output: impl AsRef<Path>) -> DocumentResult<()> {
        let output = normalize_pdf_path(output.as_ref());
        let fallback = export_fallback_path(&output);

        if self.keys.contains_key(&DocumentKey::Path(fallback.clone())) {
            return Err(DocumentError::PathAlreadyOpen(fallback));
        }

        let document = self.get_mut(id)?;
        document
            .writer_mut()?
            .persist(&fallback)
            .map_err(DocumentError::library("export", &fallback))?;

        warn!(
            output = %output.display(),
            fallback = %fallback.display(),
            document = %id,
            "PDF export unavailable, saved DOCX instead"
        );
        Err(DocumentError::ExportNotImplemented { output, fallback })
    }

    /// Close a document, returning it
    ///
    /// Closing never fails: handle release problems are logged, and an id
    /// that is not open is ignored.
    pub fn close(&mut self, id: DocumentId) -> Option<Document> {
        let mut document = self.documents.remove(&id)?;
        self.keys.remove(document.key());
        if self.current == Some(id) {
            self.current = None;
        }

        if document.is_modified() {
            warn!(document = %id, name = document.display_name(), "Closing document with unsaved changes");
        }
        document.release();

        info!(document = %id, key = %document.key(), "Closed document");
        Some(document)
    }

    pub fn current_document(&self) -> Option<&Document> {
        self.current.and_then(|id| self.documents.get(&id))
    }

    pub fn current_document_mut(&mut self) -> Option<&mut Document> {
        let id = self.current?;
        self.documents.get_mut(&id)
    }

    pub fn current_id(&self) -> Option<DocumentId> {
        self.current
    }

    /// Make an open document current
    pub fn activate(&mut self, id: DocumentId) -> DocumentResult<()> {
        if !self.documents.contains_key(&id) {
            return Err(DocumentError::NoSuchDocument(id));
        }
        self.current = Some(id);
        Ok(())
    }

    /// All open documents, in no particular order
    pub fn open_documents(&self) -> Vec<&Document> {
        self.documents.values().filter(|d| d.is_open()).collect()
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    /// Document registered under `key`
    pub fn find_by_key(&self, key: &DocumentKey) -> Option<DocumentId> {
        self.keys.get(key).copied()
    }

    /// Document registered under a path key
    pub fn find_by_path(&self, path: impl AsRef<Path>) -> Option<DocumentId> {
        self.find_by_key(&DocumentKey::Path(path.as_ref().to_path_buf()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn register(&mut self, document: Document) {
        self.keys.insert(document.key().clone(), document.id());
        self.documents.insert(document.id(), document);
    }

    fn get_mut(&mut self, id: DocumentId) -> DocumentResult<&mut Document> {
        self.documents
            .get_mut(&id)
            .ok_or(DocumentError::NoSuchDocument(id))
    }

    fn default_style(&self) -> StyleId {
        StyleId::new(self.settings.default_paragraph_style.clone())
    }
}

impl Default for DocumentManager {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_word_document(path: &Path) -> DocumentResult<()> {
    match FileFormat::from_path(path) {
        Some(format) if format.is_word_document() => Ok(()),
        _ => Err(DocumentError::unsupported(path)),
    }
}

/// Append `.pdf` unless the path already ends with it (any case)
fn normalize_pdf_path(path: &Path) -> PathBuf {
    if FileFormat::from_path(path) == Some(FileFormat::Pdf) {
        return path.to_path_buf();
    }
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(FileFormat::Pdf.extension());
    PathBuf::from(name)
}

/// `<output>.docx`, kept beside the requested PDF without replacing its name
fn export_fallback_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".");
    name.push(FileFormat::Docx.extension());
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::{Handles, ReadHandle, WriteHandle};
    use doc_model::{Body, CoreProperties, Paragraph};
    use std::cell::Cell;
    use std::rc::Rc;
    use store::{DocxBuilder, DocxError, DocxPackage};

    /// Library that serves in-memory documents, counts parses and never
    /// touches disk
    #[derive(Default)]
    struct MemoryLibrary {
        opens: Rc<Cell<usize>>,
    }

    impl DocumentLibrary for MemoryLibrary {
        fn open(&self, path: &Path, mode: OpenMode) -> Result<Handles, DocxError> {
            self.opens.set(self.opens.get() + 1);
            let mut body = Body::new();
            body.push_paragraph(Paragraph::with_text(path.display().to_string()));
            let package = DocxPackage::from_parts(body, CoreProperties::default());
            let writer = match mode {
                OpenMode::ReadWrite => Some(Box::new(MemoryWriter {
                    builder: DocxBuilder::from_package(&package),
                    ..Default::default()
                }) as Box<dyn WriteHandle>),
                OpenMode::ReadOnly => None,
            };
            Ok(Handles {
                reader: Some(Box::new(package)),
                writer,
            })
        }

        fn create(&self) -> Box<dyn WriteHandle> {
            Box::new(MemoryWriter::default())
        }
    }

    /// Write handle whose persist succeeds (or fails) without touching disk
    #[derive(Debug, Default)]
    struct MemoryWriter {
        builder: DocxBuilder,
        fail: bool,
    }

    impl WriteHandle for MemoryWriter {
        fn body(&self) -> &Body {
            self.builder.body()
        }

        fn append_paragraph(&mut self, paragraph: Paragraph) {
            self.builder.add_paragraph(paragraph);
        }

        fn set_title(&mut self, title: &str) {
            self.builder.set_title(title);
        }

        fn persist(&mut self, path: &Path) -> Result<(), DocxError> {
            if self.fail {
                return Err(DocxError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only filesystem",
                )));
            }
            tracing::debug!(path = %path.display(), "Pretending to persist");
            Ok(())
        }

        fn snapshot(&self) -> Box<dyn ReadHandle> {
            Box::new(self.builder.snapshot())
        }
    }

    /// Library whose files never parse; new documents get in-memory writers
    struct FailingOpenLibrary {
        fail_writes: bool,
    }

    impl DocumentLibrary for FailingOpenLibrary {
        fn open(&self, _path: &Path, _mode: OpenMode) -> Result<Handles, DocxError> {
            Err(DocxError::MissingPart("word/document.xml".to_string()))
        }

        fn create(&self) -> Box<dyn WriteHandle> {
            Box::new(MemoryWriter {
                fail: self.fail_writes,
                ..Default::default()
            })
        }
    }

    fn memory_manager() -> (DocumentManager, Rc<Cell<usize>>) {
        let library = MemoryLibrary::default();
        let opens = library.opens.clone();
        (
            DocumentManager::with_library(Box::new(library), &ShellSettings::default()),
            opens,
        )
    }

    fn write_only_manager(fail_writes: bool) -> DocumentManager {
        DocumentManager::with_library(Box::new(FailingOpenLibrary { fail_writes }), &ShellSettings::default())
    }

    #[test]
    fn test_open_is_idempotent() {
        let (mut manager, opens) = memory_manager();

        let first = manager.open("/docs/a.docx").unwrap().id();
        let second = manager.open("/docs/a.docx").unwrap().id();

        assert_eq!(first, second);
        assert_eq!(opens.get(), 1);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.current_id(), Some(first));
    }

    #[test]
    fn test_reopen_makes_current() {
        let (mut manager, _) = memory_manager();
        let a = manager.open("/docs/a.docx").unwrap().id();
        let b = manager.open("/docs/b.DOC").unwrap().id();
        assert_eq!(manager.current_id(), Some(b));

        manager.open("/docs/a.docx").unwrap();
        assert_eq!(manager.current_id(), Some(a));
    }

    #[test]
    fn test_open_rejects_unknown_extension() {
        let (mut manager, opens) = memory_manager();
        for path in ["/docs/a.txt", "/docs/a.pdf", "/docs/noext"] {
            let result = manager.open(path);
            assert!(matches!(result, Err(DocumentError::UnsupportedFormat { .. })));
        }
        assert_eq!(opens.get(), 0);
        assert!(manager.is_empty());
    }

    #[test]
    fn test_open_failure_is_wrapped() {
        let mut manager = write_only_manager(false);
        let err = manager.open("/docs/broken.docx").unwrap_err();
        match err {
            DocumentError::Library { operation, path, .. } => {
                assert_eq!(operation, "open");
                assert_eq!(path, PathBuf::from("/docs/broken.docx"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(manager.current_document().is_none());
    }

    #[test]
    fn test_new_documents_get_distinct_temporary_keys() {
        let mut manager = write_only_manager(false);
        let a = manager.new_document().unwrap().id();
        let b = manager.new_document().unwrap().id();

        assert_ne!(a, b);
        assert_eq!(manager.document(a).unwrap().key(), &DocumentKey::Temporary(1));
        assert_eq!(manager.document(b).unwrap().key(), &DocumentKey::Temporary(2));

        manager.close(a);
        let c = manager.new_document().unwrap().id();
        assert_eq!(manager.document(c).unwrap().key(), &DocumentKey::Temporary(3));
    }

    #[test]
    fn test_save_new_document_needs_path() {
        let mut manager = write_only_manager(false);
        let id = manager.new_document().unwrap().id();
        assert!(matches!(manager.save(id), Err(DocumentError::SavePathNotSet)));
        assert!(manager.document(id).unwrap().is_modified());
    }

    #[test]
    fn test_save_read_only_document() {
        let (mut manager, _) = memory_manager();
        let id = manager.open_read_only("/docs/a.docx").unwrap().id();
        assert!(matches!(manager.save(id), Err(DocumentError::WriterNotInitialized)));
        assert!(matches!(
            manager.save_as(id, "/docs/b.docx"),
            Err(DocumentError::WriterNotInitialized)
        ));
        assert!(manager.find_by_path("/docs/a.docx").is_some());
    }

    #[test]
    fn test_save_as_rebinds_key() {
        let mut manager = write_only_manager(false);
        let id = manager.new_document().unwrap().id();
        manager.document_mut(id).unwrap().add_paragraph("A").unwrap();

        manager.save_as(id, "/out/report.docx").unwrap();

        let doc = manager.document(id).unwrap();
        assert_eq!(doc.path(), Some(Path::new("/out/report.docx")));
        assert_eq!(doc.display_name(), "report.docx");
        assert!(!doc.is_modified());
        assert!(manager.find_by_key(&DocumentKey::Temporary(1)).is_none());
        assert_eq!(manager.find_by_path("/out/report.docx"), Some(id));
        assert_eq!(manager.len(), 1);

        manager.save(id).unwrap();
    }

    #[test]
    fn test_save_as_same_path_keeps_single_key() {
        let (mut manager, _) = memory_manager();
        let id = manager.open("/docs/a.docx").unwrap().id();
        manager.save_as(id, "/docs/a.docx").unwrap();
        assert_eq!(manager.find_by_path("/docs/a.docx"), Some(id));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_save_as_onto_other_open_document() {
        let (mut manager, _) = memory_manager();
        let a = manager.open("/docs/a.docx").unwrap().id();
        manager.open("/docs/b.docx").unwrap();

        let result = manager.save_as(a, "/docs/b.docx");
        assert!(matches!(result, Err(DocumentError::PathAlreadyOpen(_))));
        assert_eq!(manager.find_by_path("/docs/a.docx"), Some(a));
    }

    #[test]
    fn test_save_as_failure_keeps_binding() {
        let mut manager = write_only_manager(true);
        let id = manager.new_document().unwrap().id();

        let result = manager.save_as(id, "/out/report.docx");
        assert!(matches!(result, Err(DocumentError::Library { operation: "save", .. })));

        let doc = manager.document(id).unwrap();
        assert!(doc.path().is_none());
        assert!(doc.is_modified());
        assert_eq!(manager.find_by_key(&DocumentKey::Temporary(1)), Some(id));
        assert!(manager.find_by_path("/out/report.docx").is_none());
    }

    #[test]
    fn test_save_as_rejects_unknown_extension() {
        let mut manager = write_only_manager(false);
        let id = manager.new_document().unwrap().id();
        let result = manager.save_as(id, "/out/report.odt");
        assert!(matches!(result, Err(DocumentError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_export_reports_not_implemented() {
        let mut manager = write_only_manager(false);
        let id = manager.new_document().unwrap().id();

        match manager.export_to_pdf(id, "/out/report") {
            Err(DocumentError::ExportNotImplemented { output, fallback }) => {
                assert_eq!(output, PathBuf::from("/out/report.pdf"));
                assert_eq!(fallback, PathBuf::from("/out/report.pdf.docx"));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let doc = manager.document(id).unwrap();
        assert!(doc.path().is_none());
        assert!(doc.is_modified());
    }

    #[test]
    fn test_export_fallback_never_names_an_open_document() {
        let (mut manager, _) = memory_manager();
        let report = manager.open("/out/report.docx").unwrap().id();
        let other = manager.open("/out/summary.pdf.docx").unwrap().id();

        // The fallback sits beside the PDF, not on the document's own file
        match manager.export_to_pdf(report, "/out/report.pdf") {
            Err(DocumentError::ExportNotImplemented { fallback, .. }) => {
                assert_eq!(fallback, PathBuf::from("/out/report.pdf.docx"));
            }
            unexpected => panic!("unexpected result: {unexpected:?}"),
        }

        let result = manager.export_to_pdf(report, "/out/summary");
        match result {
            Err(DocumentError::PathAlreadyOpen(path)) => {
                assert_eq!(path, PathBuf::from("/out/summary.pdf.docx"));
            }
            unexpected => panic!("unexpected result: {unexpected:?}"),
        }
        assert_eq!(manager.find_by_path("/out/summary.pdf.docx"), Some(other));

        let result = manager.export_to_pdf(other, "/out/summary.pdf");
        assert!(matches!(result, Err(DocumentError::PathAlreadyOpen(_))));
    }

    #[test]
    fn test_export_fallback_failure_is_io_error() {
        let mut manager = write_only_manager(true);
        let id = manager.new_document().unwrap().id();
        let result = manager.export_to_pdf(id, "/out/report.pdf");
        assert!(matches!(result, Err(DocumentError::Library { operation: "export", .. })));
    }

    #[test]
    fn test_normalize_pdf_path() {
        assert_eq!(normalize_pdf_path(Path::new("a")), PathBuf::from("a.pdf"));
        assert_eq!(normalize_pdf_path(Path::new("a.PDF")), PathBuf::from("a.PDF"));
        assert_eq!(normalize_pdf_path(Path::new("a.docx")), PathBuf::from("a.docx.pdf"));
    }

    #[test]
    fn test_export_fallback_path() {
        assert_eq!(export_fallback_path(Path::new("a.pdf")), PathBuf::from("a.pdf.docx"));
        assert_eq!(export_fallback_path(Path::new("a.docx.pdf")), PathBuf::from("a.docx.pdf.docx"));
    }

    #[test]
    fn test_close_clears_current() {
        let (mut manager, _) = memory_manager();
        let id = manager.open("/docs/a.docx").unwrap().id();

        let closed = manager.close(id).unwrap();
        assert!(!closed.is_open());
        assert!(manager.current_document().is_none());
        assert!(manager.find_by_path("/docs/a.docx").is_none());
        assert!(manager.open_documents().is_empty());

        assert!(manager.close(id).is_none());
    }

    #[test]
    fn test_close_other_keeps_current() {
        let (mut manager, _) = memory_manager();
        let a = manager.open("/docs/a.docx").unwrap().id();
        let b = manager.open("/docs/b.docx").unwrap().id();

        manager.close(a);
        assert_eq!(manager.current_id(), Some(b));
        assert_eq!(manager.open_documents().len(), 1);
    }

    #[test]
    fn test_reopen_after_close_parses_again() {
        let (mut manager, opens) = memory_manager();
        let first = manager.open("/docs/a.docx").unwrap().id();
        manager.close(first);
        let second = manager.open("/docs/a.docx").unwrap().id();

        assert_ne!(first, second);
        assert_eq!(opens.get(), 2);
    }

    #[test]
    fn test_activate_unknown_document() {
        let mut manager = write_only_manager(false);
        let id = DocumentId::new();
        assert!(matches!(manager.activate(id), Err(DocumentError::NoSuchDocument(_))));
        assert!(matches!(manager.save(id), Err(DocumentError::NoSuchDocument(_))));
    }

    #[test]
    fn test_settings_apply_to_new_documents() {
        let mut settings = ShellSettings::default();
        settings.documents.untitled_name = "Draft.docx".to_string();
        settings.documents.default_paragraph_style = "BodyText".to_string();
        let mut manager = DocumentManager::with_library(Box::new(FailingOpenLibrary { fail_writes: false }), &settings);

        let doc = manager.new_document().unwrap();
        assert_eq!(doc.display_name(), "Draft.docx");
        assert_eq!(doc.title(), "Draft.docx");
        doc.add_paragraph("x").unwrap();
        let body = doc.write_view().unwrap();
        assert_eq!(body.paragraph(0).unwrap().style_id().unwrap().as_str(), "BodyText");
    }
}
