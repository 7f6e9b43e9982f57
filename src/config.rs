//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{Family, SearchOptions};
use crate::constants::APP_NAME;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "LIBRARIAN_CONFIG_DIR";

/// Default file name of the JSON key-value store.
pub const DEFAULT_STORE_FILE: &str = "repos.json";

/// Per-family search behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SearchConfig {
    /// Component search
    #[serde(default)]
    pub components: SearchOptions,
    /// Block search
    #[serde(default)]
    pub blocks: SearchOptions,
    /// Icon search
    #[serde(default)]
    pub icons: SearchOptions,
}

/// Icon resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IconConfig {
    /// Merge names from the remote manifest into the local list
    #[serde(default)]
    pub remote_enabled: bool,
    /// Local copy of the lucide `icons.json` manifest
    #[serde(default)]
    pub remote_manifest: Option<PathBuf>,
}

/// Where persisted custom sources live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File name inside the config directory
    pub store_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_file: DEFAULT_STORE_FILE.to_string(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/Librarian/config.toml`
/// - macOS: `~/Library/Application Support/Librarian/config.toml`
/// - Windows: `%APPDATA%\Librarian\config.toml`
///
/// `LIBRARIAN_CONFIG_DIR` replaces the directory on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Search options
    #[serde(default)]
    pub search: SearchConfig,
    /// Icon resolution
    #[serde(default)]
    pub icons: IconConfig,
    /// Persistence
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);
        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Path of the key-value store file.
    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(&self.storage.store_file))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_dir()?)
    }

    /// Loads `config.toml` from `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let config_path = dir.join("config.toml");

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_dir()?)
    }

    /// Saves `config.toml` into `dir` (temp file + rename).
    pub fn save_to(&self, dir: &Path) -> Result<()> {
        self.validate()?;

        fs::create_dir_all(dir).context(format!(
            "Failed to create config directory: {}",
            dir.display()
        ))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let config_path = dir.join("config.toml");
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// The store file must be a bare file name and a configured manifest path
    /// must not be empty.
    pub fn validate(&self) -> Result<()> {
        let store_file = self.storage.store_file.trim();
        if store_file.is_empty() {
            anyhow::bail!("storage.store_file must not be empty");
        }
        if store_file.contains(['/', '\\']) || store_file == "." || store_file == ".." {
            anyhow::bail!(
                "storage.store_file must be a file name, not a path: {}",
                self.storage.store_file
            );
        }

        if let Some(manifest) = &self.icons.remote_manifest {
            if manifest.as_os_str().is_empty() {
                anyhow::bail!("icons.remote_manifest must not be empty when set");
            }
        }

        Ok(())
    }

    /// Search options for one family.
    #[must_use]
    pub const fn search_options(&self, family: Family) -> SearchOptions {
        match family {
            Family::Components => self.search.components,
            Family::Blocks => self.search.blocks,
            Family::Icons => self.search.icons,
        }
    }

    /// Keys accepted by [`Config::set`] and [`Config::get`].
    pub const KEYS: [&'static str; 6] = [
        "search.components.match_description",
        "search.blocks.match_description",
        "search.icons.match_description",
        "icons.remote_enabled",
        "icons.remote_manifest",
        "storage.store_file",
    ];

    /// Reads a setting by dotted key.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "search.components.match_description" => {
                self.search.components.match_description.to_string()
            }
            "search.blocks.match_description" => self.search.blocks.match_description.to_string(),
            "search.icons.match_description" => self.search.icons.match_description.to_string(),
            "icons.remote_enabled" => self.icons.remote_enabled.to_string(),
            "icons.remote_manifest" => self
                .icons
                .remote_manifest
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_default(),
            "storage.store_file" => self.storage.store_file.clone(),
            _ => anyhow::bail!("Unknown config key '{key}'"),
        };
        Ok(value)
    }

    /// Updates a setting by dotted key and validates the result.
    ///
    /// An empty value clears `icons.remote_manifest`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parse_bool = |value: &str| -> Result<bool> {
            value
                .trim()
                .parse::<bool>()
                .context(format!("Expected 'true' or 'false' for {key}, got '{value}'"))
        };

        let mut updated = self.clone();
        match key {
            "search.components.match_description" => {
                updated.search.components.match_description = parse_bool(value)?;
            }
            "search.blocks.match_description" => {
                updated.search.blocks.match_description = parse_bool(value)?;
            }
            "search.icons.match_description" => {
                updated.search.icons.match_description = parse_bool(value)?;
            }
            "icons.remote_enabled" => updated.icons.remote_enabled = parse_bool(value)?,
            "icons.remote_manifest" => {
                let value = value.trim();
                updated.icons.remote_manifest = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "storage.store_file" => updated.storage.store_file = value.trim().to_string(),
            _ => anyhow::bail!(
                "Unknown config key '{key}'. Valid keys: {}",
                Self::KEYS.join(", ")
            ),
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
