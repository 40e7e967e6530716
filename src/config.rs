//! Configuration module for Wren

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::length::DEFAULT_MAX_LENGTH;
use crate::models::FooterState;
use crate::paths;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum weighted status length
    #[serde(default = "default_max_status_length")]
    pub max_status_length: usize,

    /// Keep the composer open after a status is sent
    #[serde(default = "default_keep_open")]
    pub keep_open: bool,

    /// Post new statuses as a thread continuing the previous one
    #[serde(default)]
    pub enable_thread: bool,

    /// Pre-fill cleared drafts with the footer
    #[serde(default)]
    pub footer_enabled: bool,

    /// Footer text
    #[serde(default)]
    pub footer_text: String,

    /// Number of previous statuses shown above the editor
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_max_status_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_keep_open() -> bool {
    true
}

fn default_history_limit() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_status_length: default_max_status_length(),
            keep_open: default_keep_open(),
            enable_thread: false,
            footer_enabled: false,
            footer_text: String::new(),
            history_limit: default_history_limit(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Current footer settings
    pub fn footer_state(&self) -> FooterState {
        FooterState::new(self.footer_enabled, self.footer_text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_status_length, 280);
        assert!(config.keep_open);
        assert_eq!(config.history_limit, 1);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "footer_enabled = true\nfooter_text = \"#wren\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.footer_state(), FooterState::new(true, "#wren"));
        assert_eq!(config.max_status_length, 280);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            keep_open: false,
            history_limit: 3,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
