//! Diagnostics collected during a releveling pass.

use std::fmt;
use std::io::{self, Write};

/// Non-fatal range warnings, reported after the pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Warning {
    /// Fixed level below the rule's input range
    Underleveled,
    /// Fixed level above the rule's input range
    Overleveled,
    /// Rule produced a fixed level below 1 (clamped to 1)
    LowPowered,
    /// Rule produced a fixed level above 100 (kept)
    HighPowered,
}

impl Warning {
    pub const ALL: [Warning; 4] = [
        Warning::Underleveled,
        Warning::Overleveled,
        Warning::LowPowered,
        Warning::HighPowered,
    ];

    /// Explanation printed above the list of affected NPCs
    pub fn explanation(self) -> &'static str {
        match self {
            Self::Underleveled => {
                "Warning, the following NPCs were at a lower level than the patcher expected \
                 (i.e. below the lower bound of the starting range). It's not a problem, and they \
                 have been patched, chances are another mod has changed their level too. This is \
                 just to let you know."
            }
            Self::Overleveled => {
                "Warning, the following NPCs were at a higher level than the patcher expected \
                 (i.e. above the upper bound of the starting range). It's not a problem, and they \
                 have been patched, chances are another mod has changed their level too. This is \
                 just to let you know."
            }
            Self::LowPowered => {
                "Warning, the faction rule told the patcher to give the following NPCs a level < 1. \
                 This has been ignored and the NPCs level has been set to 1."
            }
            Self::HighPowered => {
                "Warning, the faction rule told the patcher to give the following NPCs a level > 100. \
                 Good luck!"
            }
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underleveled => write!(f, "underleveled"),
            Self::Overleveled => write!(f, "overleveled"),
            Self::LowPowered => write!(f, "low-powered"),
            Self::HighPowered => write!(f, "high-powered"),
        }
    }
}

/// Why a winning NPC record was not releveled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// On the built-in or configured ignore list
    Ignored,
    /// Defined or overridden by an excluded mod
    ExcludedMod,
    /// Stats inherited from a template
    Templated,
    /// No faction membership matched a rule
    NoRule,
    /// Rule applied but no level changed
    Unchanged,
}

/// Outcome of one pass: warnings per category plus counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevelReport {
    underleveled: Vec<String>,
    overleveled: Vec<String>,
    low_powered: Vec<String>,
    high_powered: Vec<String>,

    pub examined: usize,
    pub patched: usize,
    pub ignored: usize,
    pub excluded_mod: usize,
    pub templated: usize,
    pub no_rule: usize,
    pub unchanged: usize,
}

impl RelevelReport {
    pub fn record(&mut self, warning: Warning, npc: &str) {
        self.list_mut(warning).push(npc.to_string());
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Ignored => self.ignored += 1,
            SkipReason::ExcludedMod => self.excluded_mod += 1,
            SkipReason::Templated => self.templated += 1,
            SkipReason::NoRule => self.no_rule += 1,
            SkipReason::Unchanged => self.unchanged += 1,
        }
    }

    /// NPCs recorded under a warning, in the order they were processed
    pub fn warnings(&self, warning: Warning) -> &[String] {
        match warning {
            Warning::Underleveled => &self.underleveled,
            Warning::Overleveled => &self.overleveled,
            Warning::LowPowered => &self.low_powered,
            Warning::HighPowered => &self.high_powered,
        }
    }

    pub fn has_warnings(&self) -> bool {
        Warning::ALL.iter().any(|w| !self.warnings(*w).is_empty())
    }

    /// Write one block per non-empty warning category
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for warning in Warning::ALL {
            let npcs = self.warnings(warning);
            if npcs.is_empty() {
                continue;
            }
            writeln!(out, "{}", warning.explanation())?;
            for npc in npcs {
                writeln!(out, "{}", npc)?;
            }
        }
        Ok(())
    }

    fn list_mut(&mut self, warning: Warning) -> &mut Vec<String> {
        match warning {
            Warning::Underleveled => &mut self.underleveled,
            Warning::Overleveled => &mut self.overleveled,
            Warning::LowPowered => &mut self.low_powered,
            Warning::HighPowered => &mut self.high_powered,
        }
    }
}
