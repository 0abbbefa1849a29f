//! Rules command handlers

use anyhow::{Context, Result};
use releveler::{rescale_level, FactionRuleTable, RescaleRule, HIGH_POWER_LEVEL, MIN_LEVEL};
use std::path::Path;

use crate::cli::RulesCommand;

/// Dispatch rules subcommands
pub fn dispatch(command: RulesCommand) -> Result<()> {
    match command {
        RulesCommand::Check { rules } => check(&rules),
        RulesCommand::Preview {
            rules,
            faction,
            levels,
        } => preview(&rules, &faction, &levels),
    }
}

fn load(path: &Path) -> Result<FactionRuleTable> {
    FactionRuleTable::load(path)
        .with_context(|| format!("Failed to load rules from {}", path.display()))
}

/// Handle `rules check`
pub fn check(path: &Path) -> Result<()> {
    let rules = load(path)?;

    println!("{} rule(s) in {}", rules.len(), path.display());
    for (faction, rule) in rules.iter() {
        println!("  {:<32} {}", faction, rule);
    }

    Ok(())
}

/// One line of `rules preview` output
pub fn preview_line(level: i16, rule: &RescaleRule) -> String {
    let raw = rescale_level(level, rule);
    let stored = raw.max(MIN_LEVEL);

    let mut notes = Vec::new();
    if i32::from(level) < rule.input.min {
        notes.push("below input range".to_string());
    }
    if i32::from(level) > rule.input.max {
        notes.push("above input range".to_string());
    }
    if raw < MIN_LEVEL {
        notes.push(format!("clamped from {}", raw));
    }
    if stored > HIGH_POWER_LEVEL {
        notes.push(format!("above {}", HIGH_POWER_LEVEL));
    }

    if notes.is_empty() {
        format!("{:>5} -> {}", level, stored)
    } else {
        format!("{:>5} -> {} ({})", level, stored, notes.join(", "))
    }
}

/// Handle `rules preview`
pub fn preview(path: &Path, faction: &str, levels: &[i16]) -> Result<()> {
    let rules = load(path)?;
    let rule = rules
        .get(faction)
        .with_context(|| format!("No rule for faction '{}' in {}", faction, path.display()))?;

    println!("{}: {}", faction, rule);
    for level in levels {
        println!("{}", preview_line(*level, rule));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use releveler::LevelRange;
    use std::fs;

    fn bandit() -> RescaleRule {
        RescaleRule::new(LevelRange::new(1, 30), LevelRange::new(1, 50))
    }

    #[test]
    fn test_preview_line_in_range() {
        assert_eq!(preview_line(30, &bandit()), "   30 -> 50");
    }

    #[test]
    fn test_preview_line_notes() {
        assert_eq!(preview_line(0, &bandit()), "    0 -> 1 (below input range)");

        let generic = RescaleRule::new(LevelRange::new(1, 50), LevelRange::new(1, 150));
        assert_eq!(
            preview_line(200, &generic),
            "  200 -> 1220 (above input range, above 100)"
        );

        let harsh = RescaleRule::new(LevelRange::new(1, 30), LevelRange::new(-5, 50));
        assert_eq!(preview_line(1, &harsh), "    1 -> 1 (clamped from -5)");
    }

    #[test]
    fn test_check_and_preview() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("enemy_rules.json");
        fs::write(&path, r#"{ "BanditFaction": [[1, 30], [1, 50]] }"#).unwrap();

        check(&path).unwrap();
        preview(&path, "BanditFaction", &[1, 15, 30]).unwrap();
        assert!(preview(&path, "DraugrFaction", &[1]).is_err());
    }

    #[test]
    fn test_check_invalid_rules() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("enemy_rules.json");
        fs::write(&path, r#"{ "BanditFaction": [[30, 1], [1, 50]] }"#).unwrap();

        assert!(check(&path).is_err());
    }
}
