//! CLI argument definitions for releveler
//!
//! This module contains all clap-derived structs and enums for CLI parsing.

mod core;
mod patch;
mod rules;

pub use core::{Cli, Commands};
pub use patch::PatchArgs;
pub use rules::RulesCommand;
