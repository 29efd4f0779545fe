//! Error types for document lifecycle operations

use crate::DocumentId;
use std::path::PathBuf;
use store::DocxError;
use thiserror::Error;

/// Errors returned by manager and document operations. All are recoverable
/// at the call site.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Extension is not `.docx` / `.doc`
    #[error("Unsupported file format{}: {}", extension_suffix(.extension), .path.display())]
    UnsupportedFormat {
        path: PathBuf,
        extension: Option<String>,
    },

    /// Read query against a document without a read handle
    #[error("Document is not open for reading")]
    DocumentNotOpen,

    /// Mutation or save against a document without a write handle
    #[error("Document writer is not initialized")]
    WriterNotInitialized,

    /// Save before the document ever had a path
    #[error("Document has never been saved; choose a file name with Save As")]
    SavePathNotSet,

    /// PDF rendering is unavailable; the document was saved next to the
    /// requested output instead
    #[error("PDF export is not implemented (requested {}); document saved to {}", .output.display(), .fallback.display())]
    ExportNotImplemented { output: PathBuf, fallback: PathBuf },

    /// Id does not name a document the manager holds
    #[error("No open document with id {0}")]
    NoSuchDocument(DocumentId),

    /// Save As target or export fallback is the key of another open document
    #[error("Another open document already uses {}", .0.display())]
    PathAlreadyOpen(PathBuf),

    /// Failure inside the document library, with the operation and path
    #[error("Failed to {operation} {}: {source}", .path.display())]
    Library {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: DocxError,
    },
}

impl DocumentError {
    pub(crate) fn unsupported(path: &std::path::Path) -> Self {
        DocumentError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned()),
        }
    }

    pub(crate) fn library(operation: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(DocxError) -> Self {
        let path = path.into();
        move |source| DocumentError::Library {
            operation,
            path,
            source,
        }
    }
}

fn extension_suffix(extension: &Option<String>) -> String {
    extension.as_deref().map(|ext| format!(" .{ext}")).unwrap_or_default()
}

/// Result type for document operations
pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_error_carries_context() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = DocumentError::library("save", "/tmp/a.docx")(DocxError::Io(io));

        let message = err.to_string();
        assert!(message.contains("save"));
        assert!(message.contains("/tmp/a.docx"));
        assert!(message.contains("denied"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unsupported_names_extension() {
        let err = DocumentError::unsupported(std::path::Path::new("notes.TXT"));
        assert_eq!(err.to_string(), "Unsupported file format .TXT: notes.TXT");

        let err = DocumentError::unsupported(std::path::Path::new("README"));
        assert_eq!(err.to_string(), "Unsupported file format: README");
    }

    #[test]
    fn test_export_error_names_both_paths() {
        let err = DocumentError::ExportNotImplemented {
            output: "out.pdf".into(),
            fallback: "out.docx".into(),
        };
        let message = err.to_string();
        assert!(message.contains("out.pdf") && message.contains("out.docx"));
    }
}
