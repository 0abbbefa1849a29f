//! Core CLI definitions

use clap::{Parser, Subcommand};
use releveler::ModKey;
use std::path::PathBuf;

use super::patch::PatchArgs;
use super::rules::RulesCommand;

#[derive(Parser)]
#[command(name = "releveler")]
#[command(about = "Rescale NPC levels by faction", long_about = None)]
pub struct Cli {
    /// Settings file (defaults to releveler/config.toml in the user config directory)
    #[arg(long, global = true, env = "RELEVELER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Relevel NPCs across a load order and write the patch
    #[command(visible_alias = "p")]
    Patch(PatchArgs),

    /// Faction rule operations (check, preview)
    #[command(visible_alias = "r")]
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Add a mod to the exclusion list
        #[arg(long, value_name = "MOD")]
        exclude_mod: Vec<ModKey>,

        /// Remove a mod from the exclusion list
        #[arg(long, value_name = "MOD")]
        include_mod: Vec<ModKey>,

        /// Never relevel this NPC (editor ID or form key)
        #[arg(long, value_name = "NPC")]
        ignore_npc: Vec<String>,

        /// Remove an NPC from the ignore list
        #[arg(long, value_name = "NPC")]
        unignore_npc: Vec<String>,

        /// Set default rules file
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Set default output path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_configure() {
        let cli = Cli::try_parse_from([
            "releveler",
            "configure",
            "--exclude-mod",
            "Dragons.esm",
            "--exclude-mod",
            "Tougher Bandits.esp",
            "--show",
        ])
        .unwrap();

        match cli.command {
            Commands::Configure {
                exclude_mod, show, ..
            } => {
                assert_eq!(exclude_mod.len(), 2);
                assert!(show);
            }
            _ => panic!("expected configure"),
        }
    }

    #[test]
    fn test_rejects_bad_mod_key() {
        let result = Cli::try_parse_from(["releveler", "configure", "--exclude-mod", "Dragons"]);
        assert!(result.is_err());
    }
}
