//! Configuration management for the releveler CLI

use anyhow::{Context, Result};
use releveler::ModKey;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Mods that raise NPC levels on their own; their NPCs are left alone
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mods_to_exclude: Vec<ModKey>,

    /// Extra NPCs to leave alone (editor IDs or form keys), on top of the built-in list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub npcs_to_ignore: Vec<String>,

    /// Default rules file for `patch`
    pub rules_path: Option<PathBuf>,

    /// Default output path for `patch`
    pub output: Option<PathBuf>,
}

impl Config {
    /// Get the path to the default config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("releveler");

        Ok(config_dir.join("config.toml"))
    }

    /// Resolve an explicit config path, falling back to the default location
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_path(),
        }
    }

    /// Load configuration from file, or default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }

    /// Save configuration to file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory at {}", parent.display())
                })?;
            }
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        Ok(())
    }

    /// Add a mod to the exclusion list. Returns false if it was already there.
    pub fn exclude_mod(&mut self, mod_key: ModKey) -> bool {
        if self.mods_to_exclude.contains(&mod_key) {
            return false;
        }
        self.mods_to_exclude.push(mod_key);
        true
    }

    /// Remove a mod from the exclusion list. Returns false if it wasn't there.
    pub fn include_mod(&mut self, mod_key: &ModKey) -> bool {
        let before = self.mods_to_exclude.len();
        self.mods_to_exclude.retain(|m| m != mod_key);
        self.mods_to_exclude.len() != before
    }

    pub fn ignore_npc(&mut self, editor_id: String) -> bool {
        if self
            .npcs_to_ignore
            .iter()
            .any(|id| id.eq_ignore_ascii_case(&editor_id))
        {
            return false;
        }
        self.npcs_to_ignore.push(editor_id);
        true
    }

    pub fn unignore_npc(&mut self, editor_id: &str) -> bool {
        let before = self.npcs_to_ignore.len();
        self.npcs_to_ignore
            .retain(|id| !id.eq_ignore_ascii_case(editor_id));
        self.npcs_to_ignore.len() != before
    }
}
