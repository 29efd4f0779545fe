//! Document Model - Content blocks shared by the DOCX reader and builder
//!
//! This crate holds the plain content structure that both sides of the
//! document library agree on: a body of paragraphs and tables, the runs
//! inside paragraphs, and the package-level core properties.

mod body;
mod paragraph;
mod run;
mod style;
mod table;
mod properties;

pub use body::*;
pub use paragraph::*;
pub use run::*;
pub use style::*;
pub use table::*;
pub use properties::*;
