//! Engine state transitions.
//!
//! Every function takes the current `EngineState` by value and returns the next
//! one with `seed` advanced past any draws it made. None of them fail: missing
//! skills degrade to plain attacks and an empty demon move pool skips the turn.

use super::ai::{choose_action, AiContext};
use super::types::{
    BattleOutcome, DemonDef, DotEffect, EffectKey, EngineState, PlayerAction, Side, SkillDef,
    Stats,
};
use crate::catalog::SkillRegistry;
use crate::core::balance::{FLEE_BASE_CHANCE, ICE_DOT_ATK_RATIO, ICE_DOT_TICKS};
use crate::core::combat_math::{
    apply_damage, calc_damage, element_multiplier, turn_order, DamageInput,
};
use crate::core::rng::roll;
use std::collections::VecDeque;
use tracing::debug;

/// Create the engine state for a new battle.
///
/// Turn order is settled here; an equal-speed tie consumes one draw.
pub fn init_engine(player: Stats, demon: Stats, seed: u32) -> EngineState {
    let (turn, seed) = turn_order(player.spd, demon.spd, seed);
    let mut state = EngineState {
        seed,
        turn,
        round: 1,
        player,
        demon,
        player_guard: false,
        demon_guard: false,
        dots: Vec::new(),
        log: VecDeque::new(),
        fled: false,
    };
    let opener = match turn {
        Side::Player => "You move first.",
        Side::Demon => "The demon moves first.",
    };
    state.push_log(opener.to_string());
    debug!(?turn, seed, "engine initialised");
    state
}

/// Apply a skill's secondary effect for `actor`.
pub fn resolve_effect(mut state: EngineState, actor: Side, skill: &SkillDef) -> EngineState {
    match skill.effect_key {
        EffectKey::Guard => {
            state.set_guard(actor, true);
        }
        EffectKey::ElementIceDot => {
            // Keyed off the player's attack no matter who casts it.
            let damage = (state.player.atk as f64 * ICE_DOT_ATK_RATIO).floor() as u32;
            let target = actor.opponent();
            state.dots.push(DotEffect {
                target,
                damage,
                remaining_ticks: ICE_DOT_TICKS,
            });
            state.push_log(format!(
                "Frost clings to {} ({} per round).",
                side_label(target),
                damage
            ));
            debug!(?actor, ?target, damage, "ice dot attached");
        }
        EffectKey::ArmorPierce | EffectKey::None | EffectKey::Unknown => {}
    }
    state
}

/// Tick every active DoT once. Call once per full round.
pub fn apply_dot(mut state: EngineState) -> EngineState {
    let dots = std::mem::take(&mut state.dots);
    let mut remaining = Vec::with_capacity(dots.len());

    for mut dot in dots {
        let target = state.stats_mut(dot.target);
        target.hp = apply_damage(target.hp, dot.damage);
        let label = side_label(dot.target);
        state.push_log(format!("Frost deals {} to {label}.", dot.damage));
        dot.remaining_ticks = dot.remaining_ticks.saturating_sub(1);
        if dot.remaining_ticks > 0 {
            remaining.push(dot);
        }
    }

    state.dots = remaining;
    state
}

/// Resolve the player's action against the demon.
pub fn apply_player_action(
    mut state: EngineState,
    action: &PlayerAction,
    skills: &SkillRegistry,
    demon: &DemonDef,
) -> EngineState {
    state.player_guard = false;
    state.fled = false;

    match action {
        PlayerAction::Flee => {
            let (next, r) = roll(state.seed);
            state.seed = next;
            state.fled = r < FLEE_BASE_CHANCE;
            let line = if state.fled {
                "You escaped!"
            } else {
                "You failed to escape."
            };
            state.push_log(line.to_string());
            debug!(roll = r, fled = state.fled, "flee attempt");
            state
        }
        PlayerAction::Guard => guard(state, Side::Player, &SkillDef::guard()),
        PlayerAction::Attack { skill } => {
            let skill = skill.as_deref().and_then(|id| {
                let found = skills.get(id);
                if found.is_none() {
                    debug!(skill = id, "unknown player skill, using plain attack");
                }
                found
            });
            if let Some(skill) = skill.filter(|s| s.effect_key == EffectKey::Guard) {
                return guard(state, Side::Player, skill);
            }
            let element_mul = element_multiplier(
                state.player.element,
                state.demon.element,
                Some(&demon.affinities),
            );
            strike(state, Side::Player, skill, element_mul, &demon.name)
        }
    }
}

/// Resolve the demon's turn. The move comes from `choose_action`.
pub fn apply_demon_action(
    mut state: EngineState,
    skills: &SkillRegistry,
    demon: &DemonDef,
) -> EngineState {
    state.demon_guard = false;

    let ctx = AiContext {
        player_hp_pct: state.player.hp_ratio(),
        demon_hp_pct: state.demon.hp_ratio(),
        turn: state.round,
    };
    let Some(skill) = choose_action(demon, ctx, skills) else {
        state.push_log(format!("{} hesitates.", demon.name));
        debug!(demon = %demon.id, "no usable move");
        return state;
    };

    if skill.effect_key == EffectKey::Guard {
        return guard(state, Side::Demon, skill);
    }

    let element_mul = element_multiplier(state.demon.element, state.player.element, None);
    strike(state, Side::Demon, Some(skill), element_mul, &demon.name)
}

/// Terminal check, in priority order: flee, win, lose.
pub fn check_outcome(state: &EngineState) -> Option<BattleOutcome> {
    if state.fled {
        Some(BattleOutcome::Flee)
    } else if !state.demon.is_alive() {
        Some(BattleOutcome::Win)
    } else if !state.player.is_alive() {
        Some(BattleOutcome::Lose)
    } else {
        None
    }
}

fn guard(state: EngineState, actor: Side, skill: &SkillDef) -> EngineState {
    let mut state = resolve_effect(state, actor, skill);
    let line = match actor {
        Side::Player => "You brace yourself.".to_string(),
        Side::Demon => "The demon braces itself.".to_string(),
    };
    state.push_log(line);
    state
}

fn strike(
    mut state: EngineState,
    attacker: Side,
    skill: Option<&SkillDef>,
    element_mul: f64,
    demon_name: &str,
) -> EngineState {
    let defender = attacker.opponent();
    let armor_pierce = skill.is_some_and(|s| s.effect_key == EffectKey::ArmorPierce);
    let atk_stats = state.stats(attacker);
    let hit = calc_damage(DamageInput {
        atk: atk_stats.atk,
        def: state.stats(defender).def,
        crit_chance: atk_stats.crit_chance,
        crit_mult: atk_stats.crit_mult,
        element_mul,
        seed: state.seed,
        guarded: state.guard(defender),
        armor_pierce,
    });
    state.seed = hit.next_seed;
    state.stats_mut(defender).take_damage(hit.dmg);

    let crit = if hit.crit { " CRIT!" } else { "" };
    let line = match (attacker, skill) {
        (Side::Player, Some(s)) => format!(
            "You use {} on {} for {}.{}",
            s.name, demon_name, hit.dmg, crit
        ),
        (Side::Player, None) => format!("You hit {} for {}.{}", demon_name, hit.dmg, crit),
        (Side::Demon, Some(s)) => {
            format!("{} uses {} for {}.{}", demon_name, s.name, hit.dmg, crit)
        }
        (Side::Demon, None) => format!("{} hits you for {}.{}", demon_name, hit.dmg, crit),
    };
    state.push_log(line);
    debug!(
        ?attacker,
        dmg = hit.dmg,
        crit = hit.crit,
        element_mul,
        armor_pierce,
        seed = state.seed,
        "hit resolved"
    );

    match skill {
        Some(skill) => resolve_effect(state, attacker, skill),
        None => state,
    }
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Player => "you",
        Side::Demon => "the demon",
    }
}
