//! Style references

use serde::{Deserialize, Serialize};

/// Style ID used for paragraphs that carry no explicit style
pub const DEFAULT_PARAGRAPH_STYLE: &str = "Normal";

/// Reference to a named style (e.g., "Normal", "Heading1")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StyleId(String);

impl StyleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the document default paragraph style
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_PARAGRAPH_STYLE
    }
}

impl Default for StyleId {
    fn default() -> Self {
        Self::new(DEFAULT_PARAGRAPH_STYLE)
    }
}

impl From<&str> for StyleId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StyleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for StyleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
