//! Shared combat math functions for the engine and simulator.
//!
//! These pure functions calculate combat outcomes without side effects.
//! Randomness is threaded through an explicit seed.

use super::balance::{
    matrix_multiplier, ARMOR_PIERCE_DEFENSE_FACTOR, DEFAULT_CRIT_MULTIPLIER, DEFENSE_FACTOR,
    GUARD_REDUCTION, MIN_RAW_DAMAGE, SPEED_TIE_THRESHOLD,
};
use super::rng::roll;
use crate::combat::types::{Element, Side};
use std::collections::HashMap;

/// Inputs to a single hit.
#[derive(Debug, Clone, Copy)]
pub struct DamageInput {
    pub atk: u32,
    pub def: u32,
    /// Probability in 0..=1.
    pub crit_chance: f64,
    /// `None` falls back to `DEFAULT_CRIT_MULTIPLIER`.
    pub crit_mult: Option<f64>,
    pub element_mul: f64,
    pub seed: u32,
    pub guarded: bool,
    pub armor_pierce: bool,
}

/// Result of a damage calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    /// Final damage after crit and guard.
    pub dmg: u32,
    pub crit: bool,
    pub next_seed: u32,
}

/// Decide which side acts first.
///
/// The faster side always goes first without touching the seed. Equal speeds
/// spend one draw: the player wins the tie on `r < 0.5`.
pub fn turn_order(player_spd: u32, demon_spd: u32, seed: u32) -> (Side, u32) {
    if player_spd > demon_spd {
        return (Side::Player, seed);
    }
    if demon_spd > player_spd {
        return (Side::Demon, seed);
    }
    let (next, r) = roll(seed);
    let first = if r < SPEED_TIE_THRESHOLD {
        Side::Player
    } else {
        Side::Demon
    };
    (first, next)
}

/// Elemental multiplier for an attack.
///
/// The global matrix is scaled by the defender's own affinity for the
/// attacking element when one is given.
pub fn element_multiplier(
    attacker: Element,
    defender: Element,
    affinities: Option<&HashMap<Element, f64>>,
) -> f64 {
    let base = matrix_multiplier(attacker, defender);
    let affinity = affinities
        .and_then(|table| table.get(&attacker))
        .copied()
        .unwrap_or(1.0);
    base * affinity
}

/// Calculate damage for one hit.
///
/// Order matters: defense, the raw-damage floor of 1, element scaling, crit
/// roll, then guard. Both element and guard scaling can take the result below
/// the floor.
pub fn calc_damage(input: DamageInput) -> DamageRoll {
    let defense_factor = if input.armor_pierce {
        ARMOR_PIERCE_DEFENSE_FACTOR
    } else {
        DEFENSE_FACTOR
    };
    let effective_def = input.def as f64 * defense_factor;

    let raw = (input.atk as f64 - effective_def)
        .floor()
        .max(MIN_RAW_DAMAGE);
    let mut dmg = (raw * input.element_mul).floor();

    let (next_seed, r) = roll(input.seed);
    let crit = r < input.crit_chance;
    if crit {
        let mult = input.crit_mult.unwrap_or(DEFAULT_CRIT_MULTIPLIER);
        dmg = (dmg * mult).floor();
    }

    if input.guarded {
        dmg = (dmg * (1.0 - GUARD_REDUCTION)).floor();
    }

    DamageRoll {
        dmg: dmg.max(0.0) as u32,
        crit,
        next_seed,
    }
}

/// Apply damage to HP, returning remaining HP.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}
