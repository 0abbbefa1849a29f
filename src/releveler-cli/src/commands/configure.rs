//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up releveler defaults.

use crate::config::Config;
use anyhow::Result;
use releveler::{ModKey, DEFAULT_IGNORED_NPCS};
use std::path::{Path, PathBuf};

/// Changes requested by `configure`
#[derive(Debug, Default)]
pub struct ConfigChanges {
    pub exclude_mod: Vec<ModKey>,
    pub include_mod: Vec<ModKey>,
    pub ignore_npc: Vec<String>,
    pub unignore_npc: Vec<String>,
    pub rules: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl ConfigChanges {
    fn is_empty(&self) -> bool {
        self.exclude_mod.is_empty()
            && self.include_mod.is_empty()
            && self.ignore_npc.is_empty()
            && self.unignore_npc.is_empty()
            && self.rules.is_none()
            && self.output.is_none()
    }
}

/// Handle the configure command
pub fn handle(config_path: &Path, changes: ConfigChanges, show: bool) -> Result<()> {
    let mut config = Config::load_from(config_path)?;

    if changes.is_empty() {
        if show {
            show_config(&config, config_path);
        } else {
            show_usage();
        }
        return Ok(());
    }

    apply(&mut config, changes);
    config.save_to(config_path)?;
    println!("Config saved to: {}", config_path.display());

    if show {
        show_config(&config, config_path);
    }

    Ok(())
}

/// Apply requested changes, reporting each one
fn apply(config: &mut Config, changes: ConfigChanges) {
    for mod_key in changes.exclude_mod {
        let label = mod_key.to_string();
        if config.exclude_mod(mod_key) {
            println!("Excluding mod: {}", label);
        }
    }
    for mod_key in &changes.include_mod {
        if config.include_mod(mod_key) {
            println!("No longer excluding mod: {}", mod_key);
        }
    }
    for editor_id in changes.ignore_npc {
        let label = editor_id.clone();
        if config.ignore_npc(editor_id) {
            println!("Ignoring NPC: {}", label);
        }
    }
    for editor_id in &changes.unignore_npc {
        if config.unignore_npc(editor_id) {
            println!("No longer ignoring NPC: {}", editor_id);
        }
    }
    if let Some(rules) = changes.rules {
        println!("Default rules file: {}", rules.display());
        config.rules_path = Some(rules);
    }
    if let Some(output) = changes.output {
        println!("Default output: {}", output.display());
        config.output = Some(output);
    }
}

/// Display current configuration
fn show_config(config: &Config, config_path: &Path) {
    match &config.rules_path {
        Some(path) => println!("Rules file: {}", path.display()),
        None => println!("No rules file configured"),
    }
    match &config.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: {} (default)", crate::commands::patch::DEFAULT_OUTPUT),
    }

    if config.mods_to_exclude.is_empty() {
        println!("No excluded mods");
    } else {
        println!("Excluded mods:");
        for mod_key in &config.mods_to_exclude {
            println!("  {}", mod_key);
        }
    }

    println!("Ignored NPCs:");
    for editor_id in DEFAULT_IGNORED_NPCS {
        println!("  {} (built-in)", editor_id);
    }
    for editor_id in &config.npcs_to_ignore {
        println!("  {}", editor_id);
    }

    println!("Config file: {}", config_path.display());
}

const USAGE: &str = "\
Usage: releveler configure --exclude-mod \"Some Mod.esp\"
   or: releveler configure --ignore-npc MQ101Bear
   or: releveler configure --rules enemy_rules.json
   or: releveler configure --show

Excluded mods are for mods that already raise NPC levels on their own.";

/// Show usage help for the configure command
fn show_usage() {
    println!("{}", USAGE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lists_configure_flags() {
        let lines: Vec<_> = USAGE.lines().collect();
        assert!(lines[0].starts_with("Usage: releveler configure "));
        for flag in ["--exclude-mod", "--ignore-npc", "--rules", "--show"] {
            assert!(
                lines.iter().any(|l| l.contains(&format!("releveler configure {}", flag))),
                "usage is missing {}",
                flag
            );
        }
    }

    #[test]
    fn test_handle_saves_changes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let changes = ConfigChanges {
            exclude_mod: vec!["Dragons.esm".parse().unwrap()],
            ignore_npc: vec!["EncBanditBoss".to_string()],
            rules: Some(PathBuf::from("enemy_rules.json")),
            ..Default::default()
        };
        handle(&path, changes, true).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.mods_to_exclude.len(), 1);
        assert_eq!(config.npcs_to_ignore, ["EncBanditBoss"]);
        assert_eq!(config.rules_path, Some(PathBuf::from("enemy_rules.json")));

        let changes = ConfigChanges {
            include_mod: vec!["dragons.esm".parse().unwrap()],
            ..Default::default()
        };
        handle(&path, changes, false).unwrap();
        assert!(Config::load_from(&path).unwrap().mods_to_exclude.is_empty());
    }

    #[test]
    fn test_show_without_changes_does_not_write() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        handle(&path, ConfigChanges::default(), true).unwrap();
        assert!(!path.exists());
    }
}
