//! Paragraph - a block of content containing runs

use crate::{Run, StyleId};
use serde::{Deserialize, Serialize};

/// A paragraph: an optional style reference and an ordered list of runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Paragraph style reference (`w:pStyle`)
    pub style_id: Option<StyleId>,
    /// Runs in document order
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// Create an empty, unstyled paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph holding a single run of text
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            style_id: None,
            runs: vec![Run::new(text)],
        }
    }

    /// Create a styled paragraph holding a single run of text
    pub fn styled(style: impl Into<StyleId>, text: impl Into<String>) -> Self {
        Self {
            style_id: Some(style.into()),
            runs: vec![Run::new(text)],
        }
    }

    pub fn push_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// True when no run carries any text
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }

    pub fn style_id(&self) -> Option<&StyleId> {
        self.style_id.as_ref()
    }
}
