//! Navigation tree projection
//!
//! The tree is flat: the root has one child per [`Category`], and the four
//! list categories have one leaf per item. Node ids are strings so a view
//! can store them as-is:
//!
//! | id           | node                          |
//! |--------------|-------------------------------|
//! | `""`         | root                          |
//! | `paragraphs` | category                      |
//! | `p3`         | third paragraph (1-based)     |
//!
//! Leaf ids are the category's first letter followed by a 1-based index, so
//! they stay stable across refreshes as long as the content does.

use crate::adapter::Projection;
use std::fmt;
use std::str::FromStr;
use store::ViewSettings;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Content line shown when no document is current
pub const NO_DOCUMENT: &str = "No document open";

/// Content line shown for ids that do not name a node
pub const INVALID_NODE: &str = "Select a valid node";

/// Top-level groupings under the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Title,
    Paragraphs,
    Tables,
    Images,
    Styles,
    Metadata,
}

impl Category {
    /// Root children, in display order
    pub const ALL: [Category; 6] = [
        Category::Title,
        Category::Paragraphs,
        Category::Tables,
        Category::Images,
        Category::Styles,
        Category::Metadata,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Title => "title",
            Category::Paragraphs => "paragraphs",
            Category::Tables => "tables",
            Category::Images => "images",
            Category::Styles => "styles",
            Category::Metadata => "metadata",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Title => "Title",
            Category::Paragraphs => "Paragraphs",
            Category::Tables => "Tables",
            Category::Images => "Images",
            Category::Styles => "Styles",
            Category::Metadata => "Metadata",
        }
    }

    /// Name of a single item, for list categories
    pub fn item_name(&self) -> Option<&'static str> {
        match self {
            Category::Paragraphs => Some("Paragraph"),
            Category::Tables => Some("Table"),
            Category::Images => Some("Image"),
            Category::Styles => Some("Style"),
            Category::Title | Category::Metadata => None,
        }
    }

    /// Leaf id prefix, for list categories
    pub fn prefix(&self) -> Option<char> {
        self.item_name().and_then(|_| self.id().chars().next())
    }

    fn from_id(id: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }

    fn from_prefix(prefix: char) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.prefix() == Some(prefix))
    }

    fn count(&self, projection: &impl Projection) -> usize {
        match self {
            Category::Paragraphs => projection.paragraph_count(),
            Category::Tables => projection.table_count(),
            Category::Images => projection.image_count(),
            Category::Styles => projection.style_count(),
            Category::Title | Category::Metadata => 0,
        }
    }

    fn info(&self, projection: &impl Projection, index: usize) -> String {
        match self {
            Category::Paragraphs => projection.paragraph_text(index),
            Category::Tables => projection.table_info(index),
            Category::Images => projection.image_info(index),
            Category::Styles => projection.style_info(index),
            Category::Title | Category::Metadata => String::new(),
        }
    }
}

/// Id that does not name a node
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid node id: {0:?}")]
pub struct InvalidNodeId(pub String);

/// Parsed navigation node id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    Root,
    Category(Category),
    /// 0-based index into a list category
    Item { category: Category, index: usize },
}

impl NodeId {
    pub fn item(category: Category, index: usize) -> Option<NodeId> {
        category.prefix().map(|_| NodeId::Item { category, index })
    }
}

impl FromStr for NodeId {
    type Err = InvalidNodeId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(NodeId::Root);
        }
        if let Some(category) = Category::from_id(s) {
            return Ok(NodeId::Category(category));
        }

        let invalid = || InvalidNodeId(s.to_string());
        let mut chars = s.chars();
        let category = chars.next().and_then(Category::from_prefix).ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let ordinal: usize = digits.parse().map_err(|_| invalid())?;
        let index = ordinal.checked_sub(1).ok_or_else(invalid)?;
        Ok(NodeId::Item { category, index })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Root => Ok(()),
            NodeId::Category(category) => f.write_str(category.id()),
            NodeId::Item { category, index } => match category.prefix() {
                Some(prefix) => write!(f, "{prefix}{}", index.saturating_add(1)),
                None => f.write_str(category.id()),
            },
        }
    }
}

/// What the content view shows for a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeContent {
    pub heading: Option<String>,
    pub lines: Vec<String>,
}

impl NodeContent {
    fn message(line: &str) -> Self {
        Self {
            heading: None,
            lines: vec![line.to_string()],
        }
    }

    fn section(heading: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            heading: Some(heading.into()),
            lines,
        }
    }
}

impl fmt::Display for NodeContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(heading) = &self.heading {
            writeln!(f, "{heading}")?;
            writeln!(f, "{}", "-".repeat(heading.graphemes(true).count()))?;
        }
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Builds tree children, labels and content from a [`Projection`]
///
/// Every call re-queries the projection; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct NavigationTree {
    view: ViewSettings,
}

impl NavigationTree {
    pub fn new(view: &ViewSettings) -> Self {
        Self { view: view.clone() }
    }

    /// Children of the root
    pub fn root_children(&self, projection: &impl Projection) -> Vec<String> {
        self.children(projection, "")
    }

    /// Child ids of `id`. Unknown ids and leaves have no children.
    pub fn children(&self, projection: &impl Projection, id: &str) -> Vec<String> {
        if !projection.has_document() {
            return Vec::new();
        }
        match id.parse::<NodeId>() {
            Ok(NodeId::Root) => Category::ALL.iter().map(|c| c.id().to_string()).collect(),
            Ok(NodeId::Category(category)) => (0..category.count(projection))
                .filter_map(|index| NodeId::item(category, index))
                .map(|node| node.to_string())
                .collect(),
            Ok(NodeId::Item { .. }) | Err(_) => Vec::new(),
        }
    }

    pub fn has_children(&self, projection: &impl Projection, id: &str) -> bool {
        !self.children(projection, id).is_empty()
    }

    /// Tree label for `id`
    pub fn label(&self, projection: &impl Projection, id: &str) -> String {
        if !projection.has_document() {
            return "No document".to_string();
        }
        match id.parse::<NodeId>() {
            Ok(NodeId::Root) => projection.title(),
            Ok(NodeId::Category(Category::Title)) => projection.title(),
            Ok(NodeId::Category(Category::Metadata)) => Category::Metadata.name().to_string(),
            Ok(NodeId::Category(category)) => {
                format!("{} ({})", category.name(), category.count(projection))
            }
            Ok(NodeId::Item { category: Category::Paragraphs, index }) => {
                truncate_text(&projection.paragraph_text(index), self.view.label_width)
            }
            Ok(NodeId::Item { category, index }) => {
                format!("{} {}", category.item_name().unwrap_or_default(), index.saturating_add(1))
            }
            Err(_) => id.to_string(),
        }
    }

    /// Content view for `id`
    pub fn content(&self, projection: &impl Projection, id: &str) -> NodeContent {
        if !projection.has_document() {
            return NodeContent::message(NO_DOCUMENT);
        }
        let node = match id.parse::<NodeId>() {
            Ok(NodeId::Root) | Err(_) => return NodeContent::message(INVALID_NODE),
            Ok(node) => node,
        };

        match node {
            NodeId::Category(Category::Title) => {
                NodeContent::section("Document Title", vec![projection.title()])
            }
            NodeId::Category(Category::Metadata) => NodeContent::section(
                "Document Metadata",
                projection
                    .metadata()
                    .into_iter()
                    .map(|(label, value)| format!("{label}: {value}"))
                    .collect(),
            ),
            NodeId::Category(category) => self.list(projection, category),
            NodeId::Item { category, index } => NodeContent::section(
                format!("{} {} Details", category.item_name().unwrap_or_default(), index.saturating_add(1)),
                vec![category.info(projection, index)],
            ),
            NodeId::Root => NodeContent::message(INVALID_NODE),
        }
    }

    fn list(&self, projection: &impl Projection, category: Category) -> NodeContent {
        let item = category.item_name().unwrap_or_default();
        let count = category.count(projection);
        let lines = if count == 0 {
            vec![format!("No {}", category.id())]
        } else {
            (0..count)
                .map(|index| {
                    let info = category.info(projection, index);
                    let info = match category {
                        Category::Paragraphs => truncate_text(&info, self.view.list_width),
                        _ => info,
                    };
                    format!("{item} {}: {info}", index.saturating_add(1))
                })
                .collect()
        };
        NodeContent::section(format!("{} List", item), lines)
    }
}

/// Shorten `text` to at most `max` graphemes, ending in `...` when cut
/// and there is room for it
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.graphemes(true).count() <= max {
        return text.to_string();
    }
    if max < 3 {
        return text.graphemes(true).take(max).collect();
    }
    let mut truncated: String = text.graphemes(true).take(max.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}
