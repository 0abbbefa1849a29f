//! Faction rescaling rules.
//!
//! Rules come from a JSON file mapping faction editor IDs to an input and an
//! output level range:
//!
//! ```json
//! { "BanditFaction": [[1, 30], [1, 50]] }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuleError {
    #[error("Missing required rules file {0}")]
    Missing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed rules: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rule for '{faction}' has an empty input range [{min}, {max}] (max must exceed min)")]
    EmptyInputRange { faction: String, min: i32, max: i32 },
}

/// Inclusive level range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRange {
    pub min: i32,
    pub max: i32,
}

impl LevelRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Width of the range. Computed in f64 so the full i32 range can't overflow.
    pub fn span(&self) -> f64 {
        f64::from(self.max) - f64::from(self.min)
    }
}

impl fmt::Display for LevelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Maps levels from the range a faction is expected to have onto a new range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[[i32; 2]; 2]", into = "[[i32; 2]; 2]")]
pub struct RescaleRule {
    pub input: LevelRange,
    pub output: LevelRange,
}

impl RescaleRule {
    pub fn new(input: LevelRange, output: LevelRange) -> Self {
        Self { input, output }
    }

    fn validate(&self, faction: &str) -> Result<(), RuleError> {
        if self.input.max <= self.input.min {
            return Err(RuleError::EmptyInputRange {
                faction: faction.to_string(),
                min: self.input.min,
                max: self.input.max,
            });
        }
        Ok(())
    }
}

impl From<[[i32; 2]; 2]> for RescaleRule {
    fn from([[min_in, max_in], [min_out, max_out]]: [[i32; 2]; 2]) -> Self {
        Self::new(LevelRange::new(min_in, max_in), LevelRange::new(min_out, max_out))
    }
}

impl From<RescaleRule> for [[i32; 2]; 2] {
    fn from(rule: RescaleRule) -> Self {
        [
            [rule.input.min, rule.input.max],
            [rule.output.min, rule.output.max],
        ]
    }
}

impl fmt::Display for RescaleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input, self.output)
    }
}

/// Rules keyed by faction editor ID. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactionRuleTable {
    rules: BTreeMap<String, RescaleRule>,
}

impl FactionRuleTable {
    /// Load and validate rules from a JSON file
    pub fn load(path: &Path) -> Result<Self, RuleError> {
        if !path.exists() {
            return Err(RuleError::Missing(path.display().to_string()));
        }
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// Parse and validate rules from a JSON string
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let rules: BTreeMap<String, RescaleRule> = serde_json::from_str(json)?;
        for (faction, rule) in &rules {
            rule.validate(faction)?;
        }
        tracing::debug!(count = rules.len(), "loaded faction rules");
        Ok(Self { rules })
    }

    pub fn get(&self, faction: &str) -> Option<&RescaleRule> {
        self.rules.get(faction)
    }

    /// Like [`get`](Self::get), also returning the stored faction name
    pub fn get_key_value(&self, faction: &str) -> Option<(&str, &RescaleRule)> {
        self.rules
            .get_key_value(faction)
            .map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules ordered by faction editor ID
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RescaleRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }
}
