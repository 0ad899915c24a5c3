//! Shared balance constants used by the engine, session, and simulator.
//!
//! All tunable combat numbers live here.
//! Change once, test everywhere.

use crate::combat::types::Element;

// =============================================================================
// DAMAGE
// =============================================================================

/// Default crit damage multiplier when a combatant does not supply one.
pub const DEFAULT_CRIT_MULTIPLIER: f64 = 1.5;

/// Fraction of incoming damage removed by an active guard.
pub const GUARD_REDUCTION: f64 = 0.4;

/// Share of the defender's defense subtracted from a normal hit.
pub const DEFENSE_FACTOR: f64 = 0.5;

/// Share of the defender's defense subtracted from an armor-piercing hit.
pub const ARMOR_PIERCE_DEFENSE_FACTOR: f64 = 0.2;

/// Minimum damage before elemental and guard scaling.
pub const MIN_RAW_DAMAGE: f64 = 1.0;

// =============================================================================
// STATUS EFFECTS
// =============================================================================

/// Ice DoT per-tick damage as a share of the player's attack.
pub const ICE_DOT_ATK_RATIO: f64 = 0.15;

/// Number of rounds an ice DoT lasts.
pub const ICE_DOT_TICKS: u32 = 3;

// =============================================================================
// TURN FLOW
// =============================================================================

/// Chance a flee attempt succeeds.
pub const FLEE_BASE_CHANCE: f64 = 0.35;

/// Roll threshold for the equal-speed tie-break (player acts first below it).
pub const SPEED_TIE_THRESHOLD: f64 = 0.5;

/// Seed used when a battle is started without one.
pub const BASE_SEED: u32 = 1337;

/// Delay between emitting an outcome and showing the results screen.
pub const RESULTS_DELAY_MS: u64 = 300;

// =============================================================================
// ENEMY AI
// =============================================================================

/// Defensive demons look for a guard skill below this HP ratio.
pub const DEFENSIVE_GUARD_HP_RATIO: f64 = 0.4;

/// Tricky demons open with debuffs above this HP ratio.
pub const TRICKY_DEBUFF_HP_RATIO: f64 = 0.6;

// =============================================================================
// LEVELING & REWARDS
// =============================================================================

/// Base XP required for leveling.
pub const XP_CURVE_BASE: f64 = 100.0;

/// XP curve exponent (polynomial scaling).
/// XP for level N = XP_CURVE_BASE * N^XP_CURVE_EXPONENT
pub const XP_CURVE_EXPONENT: f64 = 1.5;

/// A victory pays this fraction of the level's XP requirement.
pub const XP_REWARD_DIVISOR: u64 = 4;

/// Flat gold per victory.
pub const GOLD_BASE: u64 = 10;

/// Additional gold per player level.
pub const GOLD_PER_LEVEL: u64 = 5;

/// One shard is awarded per this many player levels.
pub const LEVELS_PER_SHARD: u32 = 5;

/// XP needed to clear the given level.
pub fn xp_for_level(level: u32) -> u64 {
    (XP_CURVE_BASE * (level.max(1) as f64).powf(XP_CURVE_EXPONENT)).floor() as u64
}

// =============================================================================
// ELEMENTS
// =============================================================================

/// Global effectiveness table: (attacker, defender, multiplier).
///
/// Entries are independent; ice vs fire is not derived from fire vs ice.
/// Pairs that are not listed are neutral.
pub const ELEMENT_MATRIX: &[(Element, Element, f64)] = &[
    (Element::Fire, Element::Ice, 1.25),
    (Element::Ice, Element::Fire, 0.9),
    (Element::Ice, Element::Storm, 1.25),
    (Element::Storm, Element::Shadow, 1.15),
    (Element::Storm, Element::Radiant, 1.1),
    (Element::Shadow, Element::Radiant, 1.2),
    (Element::Radiant, Element::Shadow, 1.2),
];

/// Looks up the global matchup, defaulting to neutral.
pub fn matrix_multiplier(attacker: Element, defender: Element) -> f64 {
    ELEMENT_MATRIX
        .iter()
        .find(|(atk, def, _)| *atk == attacker && *def == defender)
        .map(|(_, _, mul)| *mul)
        .unwrap_or(1.0)
}
