//! Rules command CLI definitions

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum RulesCommand {
    /// Validate a rules file and list its rules
    Check {
        /// Path to rules JSON
        rules: PathBuf,
    },

    /// Show what a faction's rule does to some levels
    Preview {
        /// Path to rules JSON
        rules: PathBuf,

        /// Faction editor ID (e.g. "BanditFaction")
        #[arg(short, long)]
        faction: String,

        /// Levels to rescale
        #[arg(required = true, allow_negative_numbers = true)]
        levels: Vec<i16>,
    },
}
