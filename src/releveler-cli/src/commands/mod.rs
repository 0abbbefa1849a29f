//! Command handlers for releveler CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod patch;
pub mod rules;
