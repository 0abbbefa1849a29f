//! NPCs and mods the patcher never touches.

use std::collections::HashSet;

use crate::form_key::{FormKey, ModKey};
use crate::load_order::{RecordSource, WinningOverride};
use crate::report::SkipReason;

/// Quest and scripted NPCs whose levels must stay as the game ships them
pub const DEFAULT_IGNORED_NPCS: &[&str] = &[
    "MQ101Bear",
    "WatchesTheRootsCorpse",
    "BreyaCorpse",
    "WatchesTheRoots",
    "Drennen",
    "Breya",
    "dunHunterBear",
    "DLC1HowlSummonWerewolf",
];

/// Ignored NPCs and excluded source mods.
///
/// NPCs are ignored by editor ID (case-insensitive) or by form key. An
/// override may drop or rename the editor ID, so [`ExclusionSet::resolved`]
/// pins every editor-ID match to the record's form key before a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    npcs: HashSet<String>,
    form_keys: HashSet<FormKey>,
    mods: HashSet<ModKey>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        let mut set = Self::empty();
        set.extend_npcs(DEFAULT_IGNORED_NPCS.iter().copied());
        set
    }
}

impl ExclusionSet {
    /// No exclusions at all, not even the built-in list
    pub fn empty() -> Self {
        Self {
            npcs: HashSet::new(),
            form_keys: HashSet::new(),
            mods: HashSet::new(),
        }
    }

    pub fn extend_npcs<I, S>(&mut self, editor_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.npcs
            .extend(editor_ids.into_iter().map(|id| id.as_ref().to_ascii_lowercase()));
    }

    pub fn extend_form_keys<I: IntoIterator<Item = FormKey>>(&mut self, form_keys: I) {
        self.form_keys.extend(form_keys);
    }

    pub fn extend_mods<I: IntoIterator<Item = ModKey>>(&mut self, mods: I) {
        self.mods.extend(mods);
    }

    pub fn is_ignored_npc(&self, editor_id: &str) -> bool {
        self.npcs.contains(&editor_id.to_ascii_lowercase())
    }

    pub fn is_ignored_form_key(&self, form_key: &FormKey) -> bool {
        self.form_keys.contains(form_key)
    }

    pub fn is_excluded_mod(&self, mod_key: &ModKey) -> bool {
        self.mods.contains(mod_key)
    }

    /// Copy of this set that also ignores the form key of every NPC whose
    /// editor ID is ignored in any version of the record in `source`.
    pub fn resolved<S: RecordSource + ?Sized>(&self, source: &S) -> Self {
        let mut set = self.clone();
        for npc in source.npc_versions() {
            let ignored = npc
                .editor_id
                .as_deref()
                .is_some_and(|id| self.is_ignored_npc(id));
            if ignored && set.form_keys.insert(npc.form_key.clone()) {
                tracing::debug!(form_key = %npc.form_key, "pinned ignored NPC by form key");
            }
        }
        set
    }

    /// Reason to skip a winning record, if any.
    ///
    /// A record is skipped when its form key or editor ID is ignored, or when
    /// either the mod that defined it or the mod supplying its winning override
    /// is excluded.
    pub fn check(&self, npc: &WinningOverride<'_>) -> Option<SkipReason> {
        if self.is_ignored_form_key(&npc.record.form_key) {
            return Some(SkipReason::Ignored);
        }

        if let Some(editor_id) = &npc.record.editor_id {
            if self.is_ignored_npc(editor_id) {
                return Some(SkipReason::Ignored);
            }
        }

        if self.is_excluded_mod(npc.source) || self.is_excluded_mod(npc.record.form_key.mod_key())
        {
            return Some(SkipReason::ExcludedMod);
        }

        None
    }
}
