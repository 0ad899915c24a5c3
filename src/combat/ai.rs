//! Demon move selection.

use super::types::{AiProfile, DemonDef, EffectKey, SkillDef, SkillTag};
use crate::catalog::SkillRegistry;
use crate::core::balance::{DEFENSIVE_GUARD_HP_RATIO, TRICKY_DEBUFF_HP_RATIO};

/// Battle snapshot the AI decides on.
#[derive(Debug, Clone, Copy)]
pub struct AiContext {
    pub player_hp_pct: f64,
    pub demon_hp_pct: f64,
    pub turn: u32,
}

/// Pick the demon's next skill.
///
/// The pool is the demon's move-set at its current HP ratio, skipping ids the
/// registry does not know. Returns `None` when nothing resolves. No randomness:
/// ties go to pool order.
pub fn choose_action<'a>(
    demon: &DemonDef,
    ctx: AiContext,
    skills: &'a SkillRegistry,
) -> Option<&'a SkillDef> {
    let pool: Vec<&SkillDef> = demon
        .moves_at(ctx.demon_hp_pct)
        .iter()
        .filter_map(|id| skills.get(id))
        .collect();

    let first = *pool.first()?;

    let preferred = match demon.ai {
        AiProfile::Aggressive => pool.iter().find(|s| s.has_tag(SkillTag::Single)),
        AiProfile::Defensive if ctx.demon_hp_pct < DEFENSIVE_GUARD_HP_RATIO => {
            pool.iter().find(|s| s.effect_key == EffectKey::Guard)
        }
        AiProfile::Defensive => None,
        AiProfile::Tricky if ctx.demon_hp_pct > TRICKY_DEBUFF_HP_RATIO => {
            pool.iter().find(|s| s.has_tag(SkillTag::Debuff))
        }
        AiProfile::Tricky => None,
    };

    Some(preferred.copied().unwrap_or(first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::types::{Element, Stats};
    use std::collections::HashMap;

    fn skill(id: &str, tags: Vec<SkillTag>, effect_key: EffectKey) -> SkillDef {
        SkillDef {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            cost: 0,
            cooldown: 0,
            tags,
            effect_key,
        }
    }

    fn registry() -> SkillRegistry {
        SkillRegistry::from_skills(vec![
            skill("sweep", vec![SkillTag::Multi], EffectKey::None),
            skill("bite", vec![SkillTag::Single], EffectKey::None),
            skill("shell", vec![SkillTag::Buff], EffectKey::Guard),
            skill("hex", vec![SkillTag::Debuff], EffectKey::None),
        ])
        .unwrap()
    }

    fn demon(ai: AiProfile, moves: &[&str]) -> DemonDef {
        DemonDef {
            id: "d".to_string(),
            name: "Demon".to_string(),
            level: 1,
            stats: Stats {
                hp: 10,
                max_hp: 10,
                resolve: 0,
                atk: 5,
                def: 1,
                spd: 1,
                crit_chance: 0.0,
                crit_mult: None,
                element: Element::None,
            },
            affinities: HashMap::new(),
            ai,
            moves: moves.iter().map(|m| m.to_string()).collect(),
            phases: vec![],
            loot_table: None,
        }
    }

    fn ctx(demon_hp_pct: f64) -> AiContext {
        AiContext {
            player_hp_pct: 1.0,
            demon_hp_pct,
            turn: 1,
        }
    }

    #[test]
    fn test_empty_pool_returns_none() {
        let skills = registry();
        let d = demon(AiProfile::Aggressive, &["missing", "also_missing"]);
        assert!(choose_action(&d, ctx(1.0), &skills).is_none());
    }

    #[test]
    fn test_aggressive_prefers_single_target() {
        let skills = registry();
        let d = demon(AiProfile::Aggressive, &["sweep", "bite"]);
        assert_eq!(choose_action(&d, ctx(1.0), &skills).unwrap().id, "bite");
        assert_eq!(choose_action(&d, ctx(0.1), &skills).unwrap().id, "bite");
    }

    #[test]
    fn test_aggressive_falls_back_to_first() {
        let skills = registry();
        let d = demon(AiProfile::Aggressive, &["sweep", "hex"]);
        assert_eq!(choose_action(&d, ctx(1.0), &skills).unwrap().id, "sweep");
    }

    #[test]
    fn test_defensive_guards_when_low() {
        let skills = registry();
        let d = demon(AiProfile::Defensive, &["bite", "shell"]);
        assert_eq!(choose_action(&d, ctx(0.39), &skills).unwrap().id, "shell");
        assert_eq!(choose_action(&d, ctx(0.4), &skills).unwrap().id, "bite");
    }

    #[test]
    fn test_defensive_without_guard_skill_uses_first() {
        let skills = registry();
        let d = demon(AiProfile::Defensive, &["hex", "bite"]);
        assert_eq!(choose_action(&d, ctx(0.1), &skills).unwrap().id, "hex");
    }

    #[test]
    fn test_tricky_debuffs_when_healthy() {
        let skills = registry();
        let d = demon(AiProfile::Tricky, &["bite", "hex"]);
        assert_eq!(choose_action(&d, ctx(0.61), &skills).unwrap().id, "hex");
        assert_eq!(choose_action(&d, ctx(0.6), &skills).unwrap().id, "bite");
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let skills = registry();
        let d = demon(AiProfile::Tricky, &["ghost", "sweep"]);
        assert_eq!(choose_action(&d, ctx(0.1), &skills).unwrap().id, "sweep");
    }
}
