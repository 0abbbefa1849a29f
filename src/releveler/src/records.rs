//! NPC and faction record types.
//!
//! These mirror the subset of the game's NPC_ and FACT records that level
//! rescaling reads or writes. Everything else in a record is out of scope.

use serde::{Deserialize, Serialize};

use crate::form_key::FormKey;

/// Template inheritance flags for NPC records.
///
/// An NPC built from a template can inherit whole blocks of data from it;
/// each bit marks one inherited block. Bit values match the ACBS
/// "use template" flags.
///
/// # Example
/// ```
/// use releveler::TemplateFlags;
///
/// let flags = TemplateFlags::from_raw(TemplateFlags::TRAITS | TemplateFlags::INVENTORY);
/// assert!(!flags.inherits_stats());
/// assert!(TemplateFlags::from_raw(TemplateFlags::STATS).inherits_stats());
/// assert!(!TemplateFlags::empty().inherits_stats());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateFlags(pub u32);

impl TemplateFlags {
    pub const TRAITS: u32 = 0x0001;
    pub const STATS: u32 = 0x0002;
    pub const FACTIONS: u32 = 0x0004;
    pub const SPELL_LIST: u32 = 0x0008;
    pub const AI_DATA: u32 = 0x0010;
    pub const AI_PACKAGES: u32 = 0x0020;
    pub const MODEL_ANIMATION: u32 = 0x0040;
    pub const BASE_DATA: u32 = 0x0080;
    pub const INVENTORY: u32 = 0x0100;
    pub const SCRIPT: u32 = 0x0200;
    pub const DEF_PACK_LIST: u32 = 0x0400;
    pub const ATTACK_DATA: u32 = 0x0800;
    pub const KEYWORDS: u32 = 0x1000;

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn from_raw(bits: u32) -> Self {
        Self(bits)
    }

    pub fn contains(self, bits: u32) -> bool {
        self.0 & bits == bits
    }

    /// Level and other stats come from the template, not this record
    pub fn inherits_stats(self) -> bool {
        self.contains(Self::STATS)
    }
}

/// How an NPC's level is determined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpcLevel {
    /// A fixed level
    Fixed(i16),
    /// Scales with the player's level by this multiplier, bounded by
    /// `calc_min_level` / `calc_max_level`
    PcLevelMult(f32),
}

impl Default for NpcLevel {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

/// Level-related part of an NPC's configuration block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NpcConfiguration {
    #[serde(default)]
    pub template_flags: TemplateFlags,

    #[serde(default)]
    pub level: NpcLevel,

    /// Lower bound for player-scaled levels
    #[serde(default)]
    pub calc_min_level: i16,

    /// Upper bound for player-scaled levels (0 means uncapped)
    #[serde(default)]
    pub calc_max_level: i16,
}

/// Membership of an NPC in a faction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionMembership {
    pub faction: FormKey,

    #[serde(default)]
    pub rank: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcRecord {
    pub form_key: FormKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_id: Option<String>,

    /// Faction memberships in stored order
    #[serde(default)]
    pub factions: Vec<FactionMembership>,

    #[serde(default)]
    pub configuration: NpcConfiguration,
}

impl NpcRecord {
    /// Name used in reports: the editor ID, or the form key when there is none
    pub fn display_name(&self) -> String {
        match &self.editor_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => self.form_key.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionRecord {
    pub form_key: FormKey,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_id: Option<String>,
}
