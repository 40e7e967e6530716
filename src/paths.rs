//! Common paths for Wren data storage
//!
//! All Wren data is stored under ~/.config/wren/ on all platforms:
//! - config.toml - User configuration
//! - wren.sqlite - Status history

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the Wren data directory (~/.config/wren/)
pub fn wren_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let wren_dir = home.join(".config").join("wren");
    fs::create_dir_all(&wren_dir).context("Failed to create wren directory")?;
    Ok(wren_dir)
}

/// Get the config file path (~/.config/wren/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(wren_dir()?.join("config.toml"))
}

/// Get the database file path (~/.config/wren/wren.sqlite)
pub fn database_path() -> Result<PathBuf> {
    Ok(wren_dir()?.join("wren.sqlite"))
}
