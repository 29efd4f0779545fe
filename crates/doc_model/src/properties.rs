//! Package-level core properties (`docProps/core.xml`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dublin Core properties stored alongside the document body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreProperties {
    /// `dc:title`
    pub title: Option<String>,
    /// `dc:creator`
    pub creator: Option<String>,
    /// `dcterms:created`
    pub created: Option<DateTime<Utc>>,
    /// `dcterms:modified`
    pub modified: Option<DateTime<Utc>>,
}

impl CoreProperties {
    /// Title, ignoring blank values
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Stamp creation (if unset) and modification times
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if self.created.is_none() {
            self.created = Some(now);
        }
        self.modified = Some(now);
    }
}
