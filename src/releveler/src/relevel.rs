//! Level rescaling.
//!
//! A level is normalized against the rule's input range, raised to the power
//! 1.5 and mapped onto the output range:
//!
//! ```text
//! normalized = (level - min_in) / (max_in - min_in)
//! new_level  = round(normalized^1.5 * (max_out - min_out) + min_out)
//! ```
//!
//! The curve is superlinear, so NPCs near the top of their input range gain
//! proportionally more than those near the bottom.

use crate::records::{NpcConfiguration, NpcLevel, NpcRecord};
use crate::report::{RelevelReport, Warning};
use crate::rules::RescaleRule;

/// Exponent of the rescaling curve
pub const CURVE_EXPONENT: f64 = 1.5;

/// Lowest level the game accepts; anything below is clamped up
pub const MIN_LEVEL: i16 = 1;

/// Fixed levels above this are reported as high-powered (but kept)
pub const HIGH_POWER_LEVEL: i16 = 100;

/// Rescale a level, returning the unclamped result.
///
/// Levels below the input range would need a fractional power of a negative
/// number; they are treated as sitting at the bottom of the range and map to
/// `min_out`. Levels above the range extrapolate along the curve. Rounding is
/// half-to-even. The result saturates to the 16-bit level field.
///
/// # Example
/// ```
/// use releveler::{rescale_level, LevelRange, RescaleRule};
///
/// let bandit = RescaleRule::new(LevelRange::new(1, 30), LevelRange::new(1, 50));
/// assert_eq!(rescale_level(30, &bandit), 50);
/// assert_eq!(rescale_level(1, &bandit), 1);
/// ```
pub fn rescale_level(level: i16, rule: &RescaleRule) -> i16 {
    let normalized = (f64::from(level) - f64::from(rule.input.min)) / rule.input.span();
    let scaled = normalized.max(0.0).powf(CURVE_EXPONENT);
    let new_level = (scaled * rule.output.span() + f64::from(rule.output.min)).round_ties_even();

    // `as` saturates at the i16 bounds
    new_level as i16
}

/// Apply a rule to one NPC in place.
///
/// Player-scaled NPCs get both level bounds rescaled (a zero upper bound means
/// uncapped and is left alone); fixed-level NPCs get their level rescaled and
/// range warnings recorded in `report`. Returns whether any field changed.
pub fn relevel_npc(npc: &mut NpcRecord, rule: &RescaleRule, report: &mut RelevelReport) -> bool {
    let name = npc.display_name();
    let before = npc.configuration.clone();
    let config = &mut npc.configuration;

    match config.level {
        NpcLevel::PcLevelMult(_) => relevel_bounds(config, rule),
        NpcLevel::Fixed(level) => {
            if i32::from(level) < rule.input.min {
                report.record(Warning::Underleveled, &name);
            }
            if i32::from(level) > rule.input.max {
                report.record(Warning::Overleveled, &name);
            }

            let mut new_level = rescale_level(level, rule);
            if new_level < MIN_LEVEL {
                report.record(Warning::LowPowered, &name);
                new_level = MIN_LEVEL;
            }
            if new_level > HIGH_POWER_LEVEL {
                report.record(Warning::HighPowered, &name);
            }

            config.level = NpcLevel::Fixed(new_level);
        }
    }

    let changed = *config != before;
    tracing::trace!(npc = %name, ?before, after = ?config, changed, "releveled");
    changed
}

fn relevel_bounds(config: &mut NpcConfiguration, rule: &RescaleRule) {
    config.calc_min_level = rescale_level(config.calc_min_level, rule).max(MIN_LEVEL);

    if config.calc_max_level != 0 {
        config.calc_max_level = rescale_level(config.calc_max_level, rule).max(MIN_LEVEL);
    }
}
