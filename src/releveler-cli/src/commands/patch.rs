//! Patch command handler
//!
//! Loads rules and plugins, runs the releveling pass, prints range warnings
//! and writes the patch.

use anyhow::{Context, Result};
use releveler::{
    ExclusionSet, FactionRuleTable, FormKey, LoadOrder, Plugin, RelevelReport, Releveler,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::cli::PatchArgs;
use crate::config::Config;

/// Output path used when neither the command line nor the config names one
pub const DEFAULT_OUTPUT: &str = "enemies_releveled.json";

/// Build the exclusion set from the built-in list, config, and command line.
///
/// Ignored NPC entries are editor IDs, or form keys when they parse as one.
pub fn exclusions(args: &PatchArgs, config: &Config) -> ExclusionSet {
    let mut set = ExclusionSet::default();
    let ignored: Vec<&String> = config.npcs_to_ignore.iter().chain(&args.ignore_npc).collect();
    set.extend_form_keys(ignored.iter().filter_map(|id| id.parse::<FormKey>().ok()));
    set.extend_npcs(ignored);
    set.extend_mods(
        config
            .mods_to_exclude
            .iter()
            .chain(&args.exclude_mod)
            .cloned(),
    );
    set
}

fn rules_path(args: &PatchArgs, config: &Config) -> Result<PathBuf> {
    args.rules.clone().or_else(|| config.rules_path.clone()).context(
        "No rules file given. Pass --rules or run 'releveler configure --rules enemy_rules.json'.",
    )
}

fn output_path(args: &PatchArgs, config: &Config) -> PathBuf {
    args.output
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

/// Run the pass and return the report and patch without touching the disk
pub fn run_pass(args: &PatchArgs, config: &Config) -> Result<(RelevelReport, Plugin)> {
    let rules_path = rules_path(args, config)?;
    // A missing or broken rules file aborts before any record is read
    let rules = FactionRuleTable::load(&rules_path)
        .with_context(|| format!("Failed to load rules from {}", rules_path.display()))?;
    tracing::info!(rules = rules.len(), path = %rules_path.display(), "loaded rules");

    let load_order = LoadOrder::load(&args.plugins).context("Failed to load plugins")?;
    for (priority, plugin) in load_order.plugins().iter().enumerate() {
        tracing::info!(priority, mod_key = %plugin.mod_key, npcs = plugin.npcs.len(), "plugin");
    }

    let exclusions = exclusions(args, config);
    let mut patch = Plugin::new(args.mod_key.clone());
    let report = Releveler::new(&rules, &exclusions).run(&load_order, &mut patch);

    Ok((report, patch))
}

/// Handle the `patch` command
pub fn handle(args: &PatchArgs, config: &Config) -> Result<()> {
    let (report, patch) = run_pass(args, config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report.render(&mut out).context("Failed to write warnings")?;
    out.flush()?;

    if args.dry_run {
        eprintln!(
            "Dry run: {} of {} NPCs would be patched",
            report.patched, report.examined
        );
        return Ok(());
    }

    let output = output_path(args, config);
    write_patch(&patch, &output)?;
    eprintln!(
        "Patched {} of {} NPCs -> {}",
        report.patched,
        report.examined,
        output.display()
    );

    Ok(())
}

fn write_patch(patch: &Plugin, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    patch
        .save(output)
        .with_context(|| format!("Failed to write patch to {}", output.display()))
}
