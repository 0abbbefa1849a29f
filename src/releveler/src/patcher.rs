//! The releveling pass: select a rule for each winning NPC and rescale it.

use crate::exclusions::ExclusionSet;
use crate::load_order::{OverrideSink, RecordSource};
use crate::records::NpcRecord;
use crate::relevel::relevel_npc;
use crate::report::{RelevelReport, SkipReason};
use crate::rules::{FactionRuleTable, RescaleRule};

/// First rule matching one of the NPC's factions, in membership order.
///
/// Factions that don't resolve, or resolve without an editor ID, are skipped.
pub fn select_rule<'r, S: RecordSource + ?Sized>(
    npc: &NpcRecord,
    rules: &'r FactionRuleTable,
    source: &S,
) -> Option<(&'r str, &'r RescaleRule)> {
    npc.factions.iter().find_map(|membership| {
        let editor_id = source.faction_editor_id(&membership.faction)?;
        rules.get_key_value(editor_id)
    })
}

/// Runs one releveling pass over a data store
pub struct Releveler<'a> {
    rules: &'a FactionRuleTable,
    exclusions: &'a ExclusionSet,
}

impl<'a> Releveler<'a> {
    pub fn new(rules: &'a FactionRuleTable, exclusions: &'a ExclusionSet) -> Self {
        Self { rules, exclusions }
    }

    /// Relevel every winning NPC in `source`, sending changed records to `sink`.
    ///
    /// Each record's rule is resolved on its own; a record with no matching
    /// faction is left untouched and never appears in the warnings.
    pub fn run<S, O>(&self, source: &S, sink: &mut O) -> RelevelReport
    where
        S: RecordSource + ?Sized,
        O: OverrideSink + ?Sized,
    {
        let mut report = RelevelReport::default();
        let exclusions = self.exclusions.resolved(source);

        for winner in source.winning_npcs() {
            report.examined += 1;

            if let Some(reason) = exclusions.check(&winner) {
                tracing::debug!(npc = %winner.record.display_name(), ?reason, "skipped");
                report.record_skip(reason);
                continue;
            }

            if winner.record.configuration.template_flags.inherits_stats() {
                report.record_skip(SkipReason::Templated);
                continue;
            }

            let Some((faction, rule)) = select_rule(winner.record, self.rules, source) else {
                report.record_skip(SkipReason::NoRule);
                continue;
            };

            let mut npc = winner.record.clone();
            if relevel_npc(&mut npc, rule, &mut report) {
                tracing::debug!(npc = %npc.display_name(), faction, "patched");
                sink.add_override(npc);
                report.patched += 1;
            } else {
                report.record_skip(SkipReason::Unchanged);
            }
        }

        tracing::info!(
            examined = report.examined,
            patched = report.patched,
            ignored = report.ignored,
            excluded_mod = report.excluded_mod,
            templated = report.templated,
            no_rule = report.no_rule,
            unchanged = report.unchanged,
            "releveling pass complete"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_key::FormKey;
    use crate::load_order::{LoadOrder, Plugin};
    use crate::records::NpcLevel;
    use crate::report::Warning;

    fn rules() -> FactionRuleTable {
        FactionRuleTable::from_json(
            r#"{ "BanditFaction": [[1, 30], [1, 50]], "DraugrFaction": [[1, 50], [1, 150]] }"#,
        )
        .unwrap()
    }

    fn skyrim() -> Plugin {
        serde_json::from_value(serde_json::json!({
            "mod_key": "Skyrim.esm",
            "factions": [
                { "form_key": "01BCC0:Skyrim.esm", "editor_id": "BanditFaction" },
                { "form_key": "0CEA8B:Skyrim.esm", "editor_id": "DraugrFaction" },
                { "form_key": "000D01:Skyrim.esm", "editor_id": "CrimeFactionWhiterun" }
            ],
            "npcs": [
                {
                    "form_key": "000100:Skyrim.esm",
                    "editor_id": "EncBandit",
                    "factions": [{ "faction": "01BCC0:Skyrim.esm" }],
                    "configuration": { "level": { "fixed": 30 } }
                },
                {
                    "form_key": "000101:Skyrim.esm",
                    "editor_id": "WhiterunGuard",
                    "factions": [{ "faction": "000D01:Skyrim.esm" }],
                    "configuration": { "level": { "fixed": 10 } }
                },
                {
                    "form_key": "000102:Skyrim.esm",
                    "editor_id": "EncDraugrBoss",
                    "factions": [
                        { "faction": "000D01:Skyrim.esm" },
                        { "faction": "0CEA8B:Skyrim.esm" },
                        { "faction": "01BCC0:Skyrim.esm" }
                    ],
                    "configuration": { "level": { "fixed": 200 } }
                },
                {
                    "form_key": "000103:Skyrim.esm",
                    "editor_id": "EncBanditTemplate",
                    "factions": [{ "faction": "01BCC0:Skyrim.esm" }],
                    "configuration": { "template_flags": 2, "level": { "fixed": 30 } }
                },
                {
                    "form_key": "000104:Skyrim.esm",
                    "editor_id": "MQ101Bear",
                    "factions": [{ "faction": "01BCC0:Skyrim.esm" }],
                    "configuration": { "level": { "fixed": 30 } }
                },
                {
                    "form_key": "000105:Skyrim.esm",
                    "editor_id": "EncBanditScaled",
                    "factions": [
                        { "faction": "999999:Missing.esp" },
                        { "faction": "01BCC0:Skyrim.esm" }
                    ],
                    "configuration": {
                        "level": { "pc_level_mult": 1.0 },
                        "calc_min_level": 5,
                        "calc_max_level": 0
                    }
                },
                {
                    "form_key": "000106:Skyrim.esm",
                    "editor_id": "EncBanditMin",
                    "factions": [{ "faction": "01BCC0:Skyrim.esm" }],
                    "configuration": { "level": { "fixed": 1 } }
                }
            ]
        }))
        .unwrap()
    }

    fn patch_mod() -> Plugin {
        Plugin::new("enemies_releveled.esp".parse().unwrap())
    }

    fn patched_level(patch: &Plugin, editor_id: &str) -> Option<NpcLevel> {
        patch
            .npcs
            .iter()
            .find(|n| n.editor_id.as_deref() == Some(editor_id))
            .map(|n| n.configuration.level)
    }

    #[test]
    fn test_select_first_matching_faction() {
        let load_order = LoadOrder::new(vec![skyrim()]).unwrap();
        let rules = rules();
        let winners = load_order.winning_npcs();

        let boss = winners
            .iter()
            .find(|w| w.record.editor_id.as_deref() == Some("EncDraugrBoss"))
            .unwrap();
        let (faction, _) = select_rule(boss.record, &rules, &load_order).unwrap();
        assert_eq!(faction, "DraugrFaction");

        let guard = winners
            .iter()
            .find(|w| w.record.editor_id.as_deref() == Some("WhiterunGuard"))
            .unwrap();
        assert!(select_rule(guard.record, &rules, &load_order).is_none());
    }

    #[test]
    fn test_unresolved_faction_is_skipped() {
        let load_order = LoadOrder::new(vec![skyrim()]).unwrap();
        let rules = rules();
        let winners = load_order.winning_npcs();
        let scaled = winners
            .iter()
            .find(|w| w.record.editor_id.as_deref() == Some("EncBanditScaled"))
            .unwrap();

        let (faction, _) = select_rule(scaled.record, &rules, &load_order).unwrap();
        assert_eq!(faction, "BanditFaction");
    }

    #[test]
    fn test_full_pass() {
        let load_order = LoadOrder::new(vec![skyrim()]).unwrap();
        let rules = rules();
        let exclusions = ExclusionSet::default();
        let mut patch = patch_mod();

        let report = Releveler::new(&rules, &exclusions).run(&load_order, &mut patch);

        assert_eq!(report.examined, 7);
        assert_eq!(report.patched, 3);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.templated, 1);
        assert_eq!(report.no_rule, 1);
        assert_eq!(report.unchanged, 1);

        assert_eq!(patched_level(&patch, "EncBandit"), Some(NpcLevel::Fixed(50)));
        assert_eq!(patched_level(&patch, "EncDraugrBoss"), Some(NpcLevel::Fixed(1220)));
        assert_eq!(patched_level(&patch, "WhiterunGuard"), None);
        assert_eq!(patched_level(&patch, "EncBanditTemplate"), None);
        assert_eq!(patched_level(&patch, "MQ101Bear"), None);
        // Level 1 at the bottom of 1..=30 maps to 1 again
        assert_eq!(patched_level(&patch, "EncBanditMin"), None);

        let scaled = patch
            .npcs
            .iter()
            .find(|n| n.editor_id.as_deref() == Some("EncBanditScaled"))
            .unwrap();
        assert_eq!(scaled.configuration.calc_min_level, 4);
        assert_eq!(scaled.configuration.calc_max_level, 0);

        assert_eq!(report.warnings(Warning::Overleveled), ["EncDraugrBoss"]);
        assert_eq!(report.warnings(Warning::HighPowered), ["EncDraugrBoss"]);
        assert!(report.warnings(Warning::Underleveled).is_empty());
        assert!(report.warnings(Warning::LowPowered).is_empty());
    }

    #[test]
    fn test_rule_does_not_leak_to_unmatched_npc() {
        // A matching NPC followed by one with no rule: the second must not be
        // rescaled with the first one's rule
        let plugin: Plugin = serde_json::from_value(serde_json::json!({
            "mod_key": "Skyrim.esm",
            "factions": [{ "form_key": "01BCC0:Skyrim.esm", "editor_id": "BanditFaction" }],
            "npcs": [
                {
                    "form_key": "000001:Skyrim.esm",
                    "editor_id": "Bandit",
                    "factions": [{ "faction": "01BCC0:Skyrim.esm" }],
                    "configuration": { "level": { "fixed": 30 } }
                },
                {
                    "form_key": "000002:Skyrim.esm",
                    "editor_id": "Farmer",
                    "configuration": { "level": { "fixed": 0 } }
                }
            ]
        }))
        .unwrap();
        let load_order = LoadOrder::new(vec![plugin]).unwrap();
        let rules = rules();
        let exclusions = ExclusionSet::default();
        let mut patch = patch_mod();

        let report = Releveler::new(&rules, &exclusions).run(&load_order, &mut patch);

        assert_eq!(patch.npcs.len(), 1);
        assert_eq!(patch.npcs[0].editor_id.as_deref(), Some("Bandit"));
        assert!(!report.has_warnings());
        assert_eq!(report.no_rule, 1);
    }

    #[test]
    fn test_overridden_record_uses_winning_version() {
        let tweaks: Plugin = serde_json::from_value(serde_json::json!({
            "mod_key": "Tweaks.esp",
            "npcs": [{
                "form_key": "000100:Skyrim.esm",
                "editor_id": "EncBandit",
                "factions": [{ "faction": "01BCC0:Skyrim.esm" }],
                "configuration": { "level": { "fixed": 0 } }
            }]
        }))
        .unwrap();
        let load_order = LoadOrder::new(vec![skyrim(), tweaks]).unwrap();
        let rules = rules();
        let exclusions = ExclusionSet::default();
        let mut patch = patch_mod();

        let report = Releveler::new(&rules, &exclusions).run(&load_order, &mut patch);

        assert_eq!(patched_level(&patch, "EncBandit"), Some(NpcLevel::Fixed(1)));
        assert_eq!(report.warnings(Warning::Underleveled), ["EncBandit"]);
    }

    #[test]
    fn test_excluded_mod_skips_its_overrides() {
        let tweaks: Plugin = serde_json::from_value(serde_json::json!({
            "mod_key": "Tweaks.esp",
            "npcs": [{
                "form_key": "000100:Skyrim.esm",
                "editor_id": "EncBandit",
                "factions": [{ "faction": "01BCC0:Skyrim.esm" }],
                "configuration": { "level": { "fixed": 25 } }
            }]
        }))
        .unwrap();
        let load_order = LoadOrder::new(vec![skyrim(), tweaks]).unwrap();
        let rules = rules();
        let mut exclusions = ExclusionSet::default();
        exclusions.extend_mods(["Tweaks.esp".parse().unwrap()]);
        let mut patch = patch_mod();

        let report = Releveler::new(&rules, &exclusions).run(&load_order, &mut patch);

        assert_eq!(report.excluded_mod, 1);
        assert_eq!(patched_level(&patch, "EncBandit"), None);
    }

    #[test]
    fn test_ignored_npc_override_without_editor_id() {
        let tweaks: Plugin = serde_json::from_value(serde_json::json!({
            "mod_key": "Tweaks.esp",
            "npcs": [{
                "form_key": "000104:Skyrim.esm",
                "factions": [{ "faction": "01BCC0:Skyrim.esm" }],
                "configuration": { "level": { "fixed": 20 } }
            }]
        }))
        .unwrap();
        let load_order = LoadOrder::new(vec![skyrim(), tweaks]).unwrap();
        let rules = rules();
        let exclusions = ExclusionSet::default();
        let mut patch = patch_mod();

        let report = Releveler::new(&rules, &exclusions).run(&load_order, &mut patch);

        assert_eq!(report.examined, 7);
        assert_eq!(report.ignored, 1);
        assert_eq!(report.patched, 3);
        let bear: FormKey = "000104:Skyrim.esm".parse().unwrap();
        assert!(patch.npcs.iter().all(|n| n.form_key != bear));
    }

    #[test]
    fn test_empty_rules_patch_nothing() {
        let load_order = LoadOrder::new(vec![skyrim()]).unwrap();
        let rules = FactionRuleTable::default();
        let exclusions = ExclusionSet::empty();
        let mut patch = patch_mod();

        let report = Releveler::new(&rules, &exclusions).run(&load_order, &mut patch);

        assert!(patch.npcs.is_empty());
        assert_eq!(report.no_rule, 6);
        assert_eq!(report.templated, 1);
    }
}
