//! Shell settings management
//!
//! Settings live in a single `settings.json` under the application's
//! config directory. Missing fields fall back to their defaults so older
//! files keep loading.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the settings file inside the config directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Main settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShellSettings {
    /// Document lifecycle settings
    pub documents: DocumentSettings,
    /// Navigation and content view settings
    pub view: ViewSettings,
}

/// Settings applied when creating and editing documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DocumentSettings {
    /// Display name (and default title) of documents that were never saved
    pub untitled_name: String,
    /// Style applied to paragraphs appended through the shell
    pub default_paragraph_style: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            untitled_name: "Untitled Document.docx".to_string(),
            default_paragraph_style: doc_model::DEFAULT_PARAGRAPH_STYLE.to_string(),
        }
    }
}

/// Settings for the navigation projection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewSettings {
    /// Maximum width of tree node labels, in graphemes
    pub label_width: usize,
    /// Maximum width of entries in category list views, in graphemes
    pub list_width: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            label_width: 30,
            list_width: 50,
        }
    }
}

/// Settings manager for loading and saving shell settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: ShellSettings,
}

impl SettingsManager {
    /// Create a settings manager rooted at the given config directory
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            settings_path: config_dir.as_ref().join(SETTINGS_FILE_NAME),
            current: ShellSettings::default(),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings from disk, or fall back to defaults if the file is
    /// missing or unreadable as JSON
    pub fn load_sync(&mut self) -> Result<&ShellSettings> {
        self.current = if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            match serde_json::from_str::<ShellSettings>(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse settings file {}, using defaults: {}",
                        self.settings_path.display(),
                        e
                    );
                    ShellSettings::default()
                }
            }
        } else {
            ShellSettings::default()
        };
        Ok(&self.current)
    }

    /// Save current settings to disk
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    pub fn get(&self) -> &ShellSettings {
        &self.current
    }

    /// Replace settings and persist them
    pub fn update_sync(&mut self, settings: ShellSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }
}
