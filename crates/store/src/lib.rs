//! Store - DOCX package I/O and settings persistence
//!
//! This crate is the document library the shell sits on: it parses DOCX
//! packages into a read-oriented [`docx::DocxPackage`], builds and persists
//! packages through [`docx::DocxBuilder`], and loads the shell's JSON
//! settings.

mod error;
mod settings;
pub mod docx;

pub use error::*;
pub use settings::*;

// Re-export DOCX functionality
pub use docx::{
    export_docx, export_docx_bytes, import_docx, import_docx_bytes, DocxBuilder, DocxError,
    DocxPackage, DocxResult, FileFormat,
};
