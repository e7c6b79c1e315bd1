//! Configuration system for blockquill.
//!
//! This module provides the configuration structure for blockquill with sensible
//! defaults and support for serialization/deserialization via serde. Configuration
//! is loaded from a TOML file.
//!
//! # Example
//!
//! ```
//! use blockquill::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.export_version, "1.2.0");
//! assert_eq!(config.indent_size, 2);
//!
//! // Create custom configuration
//! let custom = Config {
//!     max_inner_blocks: 4,
//!     ..Config::default()
//! };
//! assert_eq!(custom.max_inner_blocks, 4);
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for the blockquill editor.
///
/// # Fields
///
/// * `export_version` - Version tag written into exported documents (default: "1.2.0")
/// * `indent_size` - Spaces per indentation level in exported JSON (default: 2)
/// * `create_backup` - Create .bak files before overwriting (default: false)
/// * `undo_limit` - Maximum number of undo checkpoints to keep (default: 50)
/// * `max_inner_blocks` - Most children a columns block accepts from "add inner" (default: 12)
/// * `default_language` - Language hint for code generation when a block has none (default: "javascript")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Version tag written into exported documents
    #[serde(default = "default_export_version")]
    pub export_version: String,

    /// Spaces per indentation level in exported JSON
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Create .bak files before overwriting
    #[serde(default)]
    pub create_backup: bool,

    /// Maximum number of undo checkpoints to keep
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,

    /// Most children a columns block accepts from "add inner"
    #[serde(default = "default_max_inner_blocks")]
    pub max_inner_blocks: usize,

    /// Language hint for code generation when a block has none
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_export_version() -> String {
    crate::document::tree::DEFAULT_VERSION.to_string()
}

fn default_indent_size() -> usize {
    2
}

fn default_undo_limit() -> usize {
    50
}

fn default_max_inner_blocks() -> usize {
    12
}

fn default_language() -> String {
    "javascript".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_version: default_export_version(),
            indent_size: default_indent_size(),
            create_backup: false,
            undo_limit: default_undo_limit(),
            max_inner_blocks: default_max_inner_blocks(),
            default_language: default_language(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/blockquill/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("blockquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!("ignoring invalid config {}: {}", path.display(), err);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
