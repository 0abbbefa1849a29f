//! # releveler
//!
//! Rescales NPC levels by faction.
//!
//! This library provides functionality to:
//! - Load per-faction rescaling rules from JSON
//! - Layer plugin record dumps in load order and resolve winning overrides
//! - Pick the governing rule for each NPC from its faction memberships
//! - Rescale fixed and player-scaled levels along a superlinear curve
//! - Collect range warnings and emit a patch containing only changed NPCs
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use releveler::{ExclusionSet, FactionRuleTable, LoadOrder, Plugin, Releveler};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rules = FactionRuleTable::load(Path::new("enemy_rules.json"))?;
//! let load_order = LoadOrder::load(&["Skyrim.json", "Dawnguard.json"])?;
//! let exclusions = ExclusionSet::default();
//!
//! let mut patch = Plugin::new("enemies_releveled.esp".parse()?);
//! let report = Releveler::new(&rules, &exclusions).run(&load_order, &mut patch);
//!
//! report.render(&mut std::io::stdout())?;
//! patch.save(Path::new("enemies_releveled.json"))?;
//! # Ok(())
//! # }
//! ```

pub mod exclusions;
pub mod form_key;
pub mod load_order;
pub mod patcher;
pub mod records;
pub mod relevel;
pub mod report;
pub mod rules;

// Re-export commonly used items
#[doc(inline)]
pub use exclusions::{ExclusionSet, DEFAULT_IGNORED_NPCS};
#[doc(inline)]
pub use form_key::{FormKey, FormKeyError, ModKey, ModType};
#[doc(inline)]
pub use load_order::{
    LoadOrder, LoadOrderError, OverrideSink, Plugin, PluginFormat, RecordSource, WinningOverride,
};
#[doc(inline)]
pub use patcher::{select_rule, Releveler};
#[doc(inline)]
pub use records::{
    FactionMembership, FactionRecord, NpcConfiguration, NpcLevel, NpcRecord, TemplateFlags,
};
#[doc(inline)]
pub use relevel::{relevel_npc, rescale_level, HIGH_POWER_LEVEL, MIN_LEVEL};
#[doc(inline)]
pub use report::{RelevelReport, SkipReason, Warning};
#[doc(inline)]
pub use rules::{FactionRuleTable, LevelRange, RescaleRule, RuleError};
