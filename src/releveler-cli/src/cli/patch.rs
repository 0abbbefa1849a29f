//! Patch command CLI definitions

use clap::Args;
use releveler::ModKey;
use std::path::PathBuf;

#[derive(Args)]
pub struct PatchArgs {
    /// Plugin dumps (JSON or YAML) in load order, lowest priority first
    #[arg(required = true)]
    pub plugins: Vec<PathBuf>,

    /// Faction rules file (uses configured default if not provided)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Output patch path (uses configured default, then enemies_releveled.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Mod key of the generated patch
    #[arg(long, default_value = "enemies_releveled.esp")]
    pub mod_key: ModKey,

    /// Skip NPCs defined or overridden by this mod (adds to configured list)
    #[arg(long, value_name = "MOD")]
    pub exclude_mod: Vec<ModKey>,

    /// Skip this NPC (editor ID or form key, adds to configured list)
    #[arg(long, value_name = "NPC")]
    pub ignore_npc: Vec<String>,

    /// Run the pass and print warnings without writing the patch
    #[arg(long)]
    pub dry_run: bool,
}
