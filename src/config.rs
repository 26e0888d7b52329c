//! Configuration for websift.
//!
//! Loaded from `~/.config/websift/config.toml` (or `$XDG_CONFIG_HOME`).
//! Every field has a default, so a partial file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use websift_search::PipelineConfig;

use crate::error::{Result, ToolError};
use crate::tool::DEFAULT_MAX_BYTES;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSiftConfig {
    /// Search pipeline settings.
    pub search: PipelineConfig,
    /// Tool surface settings.
    pub tool: ToolConfig,
}

/// Settings for the host-facing `web_search` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Reports longer than this are truncated at a char boundary.
    pub max_output_bytes: usize,
    /// Skip the interactive approval prompt.
    pub auto_approve: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            max_output_bytes: DEFAULT_MAX_BYTES,
            auto_approve: false,
        }
    }
}

impl WebSiftConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ToolError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ToolError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/websift/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("websift").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("websift")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/websift-config/config.toml")
        }
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        if self.tool.max_output_bytes == 0 {
            return Err(ToolError::Config(
                "max_output_bytes must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
