//! Plugin files and winning-override resolution.
//!
//! A plugin here is a JSON (or YAML) dump of the NPC and faction records one
//! mod contributes. Plugins are layered in load order: when several define a
//! record with the same form key, the last one loaded wins.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::form_key::{FormKey, ModKey};
use crate::records::{FactionRecord, NpcRecord};

#[derive(Error, Debug)]
pub enum LoadOrderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to serialize plugin: {0}")]
    Serialize(String),

    #[error("{0} appears more than once in the load order")]
    DuplicateMod(ModKey),
}

/// On-disk format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginFormat {
    Json,
    Yaml,
}

impl PluginFormat {
    /// `.yaml` / `.yml` are YAML; everything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Records contributed by one mod
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub mod_key: ModKey,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub factions: Vec<FactionRecord>,

    #[serde(default)]
    pub npcs: Vec<NpcRecord>,
}

impl Plugin {
    pub fn new(mod_key: ModKey) -> Self {
        Self {
            mod_key,
            factions: Vec::new(),
            npcs: Vec::new(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, LoadOrderError> {
        let data = fs::read_to_string(path).map_err(|source| LoadOrderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match PluginFormat::from_path(path) {
            PluginFormat::Json => serde_json::from_str(&data).map_err(|e| e.to_string()),
            PluginFormat::Yaml => serde_yaml::from_str(&data).map_err(|e| e.to_string()),
        };

        parsed.map_err(|message| LoadOrderError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn to_bytes(&self, format: PluginFormat) -> Result<Vec<u8>, LoadOrderError> {
        let text = match format {
            PluginFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| LoadOrderError::Serialize(e.to_string()))?,
            PluginFormat::Yaml => {
                serde_yaml::to_string(self).map_err(|e| LoadOrderError::Serialize(e.to_string()))?
            }
        };
        Ok(text.into_bytes())
    }

    pub fn save(&self, path: &Path) -> Result<(), LoadOrderError> {
        let bytes = self.to_bytes(PluginFormat::from_path(path))?;
        fs::write(path, bytes).map_err(|source| LoadOrderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// A winning NPC record and the mod that supplied it
#[derive(Debug, Clone, Copy)]
pub struct WinningOverride<'a> {
    pub record: &'a NpcRecord,
    pub source: &'a ModKey,
}

/// Read side of the data store
pub trait RecordSource {
    /// Winning NPC records, highest-priority mod first
    fn winning_npcs(&self) -> Vec<WinningOverride<'_>>;

    /// Editor ID of the winning version of a faction, if it resolves
    fn faction_editor_id(&self, faction: &FormKey) -> Option<&str>;

    /// Every version of every NPC record, winning or not
    fn npc_versions(&self) -> Vec<&NpcRecord>;
}

/// Write side of the data store
pub trait OverrideSink {
    /// Register a modified record as an override in the output
    fn add_override(&mut self, npc: NpcRecord);
}

/// Plugins layered in load order (first loaded = lowest priority)
#[derive(Debug, Clone, Default)]
pub struct LoadOrder {
    plugins: Vec<Plugin>,
    factions: HashMap<FormKey, Option<String>>,
}

impl LoadOrder {
    pub fn new(plugins: Vec<Plugin>) -> Result<Self, LoadOrderError> {
        let mut seen = HashSet::new();
        let mut factions = HashMap::new();

        for plugin in &plugins {
            if !seen.insert(plugin.mod_key.clone()) {
                return Err(LoadOrderError::DuplicateMod(plugin.mod_key.clone()));
            }
            for faction in &plugin.factions {
                factions.insert(faction.form_key.clone(), faction.editor_id.clone());
            }
        }

        Ok(Self { plugins, factions })
    }

    /// Load plugin files, given lowest priority first
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, LoadOrderError> {
        let plugins = paths
            .iter()
            .map(|p| {
                let plugin = Plugin::load(p.as_ref())?;
                tracing::debug!(
                    mod_key = %plugin.mod_key,
                    npcs = plugin.npcs.len(),
                    factions = plugin.factions.len(),
                    "loaded plugin"
                );
                Ok(plugin)
            })
            .collect::<Result<Vec<_>, LoadOrderError>>()?;

        Self::new(plugins)
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }
}

impl RecordSource for LoadOrder {
    fn winning_npcs(&self) -> Vec<WinningOverride<'_>> {
        let mut seen = HashSet::new();
        let mut winners = Vec::new();

        for plugin in self.plugins.iter().rev() {
            for npc in &plugin.npcs {
                if seen.insert(&npc.form_key) {
                    winners.push(WinningOverride {
                        record: npc,
                        source: &plugin.mod_key,
                    });
                }
            }
        }

        winners
    }

    fn faction_editor_id(&self, faction: &FormKey) -> Option<&str> {
        self.factions.get(faction)?.as_deref()
    }

    fn npc_versions(&self) -> Vec<&NpcRecord> {
        self.plugins.iter().flat_map(|p| &p.npcs).collect()
    }
}

impl OverrideSink for Plugin {
    fn add_override(&mut self, npc: NpcRecord) {
        match self.npcs.iter_mut().find(|n| n.form_key == npc.form_key) {
            Some(existing) => *existing = npc,
            None => self.npcs.push(npc),
        }
    }
}
