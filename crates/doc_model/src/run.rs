//! Text run - a contiguous span of text inside a paragraph

use serde::{Deserialize, Serialize};

/// A text run. Tabs and line breaks are stored inline as `\t` and `\n`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// The text content of this run
    pub text: String,
}

impl Run {
    /// Create a new run with text content
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
