//! Document Manager - lifecycle, projection and navigation
//!
//! This crate owns the documents a shell has open. It is the layer between
//! the DOCX library in `store` and whatever renders documents to a user:
//!
//! - [`DocumentManager`] opens, creates, saves, exports and closes documents
//!   and tracks which one is current.
//! - [`Document`] is one open document: identity, path, modified state and
//!   the read/write capabilities it was opened with.
//! - [`DocumentAdapter`] is a read-only projection that never fails, for
//!   presentation code that must keep rendering whatever the document state.
//! - [`navigation`] maps a projection onto the flat node-id tree a tree view
//!   and content view consume.
//!
//! Everything here is synchronous and single-threaded.

mod error;
mod handle;
mod library;
mod document;
mod manager;
mod adapter;
pub mod navigation;

pub use error::*;
pub use handle::*;
pub use library::*;
pub use document::*;
pub use manager::*;
pub use adapter::*;
