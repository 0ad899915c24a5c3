use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Elemental affinity of a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    #[default]
    None,
    Fire,
    Ice,
    Storm,
    Shadow,
    Radiant,
}

/// Combat stats shared by the player and demons.
///
/// HP is unsigned so it can never go negative; damage is applied with
/// saturating subtraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub max_hp: u32,
    /// Secondary pool. Not consumed by any current skill.
    #[serde(default)]
    pub resolve: u32,
    pub atk: u32,
    pub def: u32,
    pub spd: u32,
    /// Probability in 0..=1.
    #[serde(default)]
    pub crit_chance: f64,
    /// `None` uses the global default.
    #[serde(default)]
    pub crit_mult: Option<f64>,
    #[serde(default)]
    pub element: Element,
}

impl Stats {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    /// Current HP as a fraction of max HP. Zero when max HP is zero.
    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f64 / self.max_hp as f64
        }
    }
}

/// Descriptive skill tags. Only `Single` and `Debuff` steer the AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillTag {
    Single,
    Multi,
    Buff,
    Debuff,
    Dot,
    Heal,
}

/// Mechanical effect a skill triggers.
///
/// Keys the engine does not know deserialize to `Unknown` and resolve to
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKey {
    #[default]
    None,
    Guard,
    ElementIceDot,
    ArmorPierce,
    #[serde(other)]
    Unknown,
}

/// Immutable skill reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub tags: Vec<SkillTag>,
    #[serde(default)]
    pub effect_key: EffectKey,
}

impl SkillDef {
    pub fn has_tag(&self, tag: SkillTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Synthetic skill used by the plain guard action.
    pub fn guard() -> Self {
        Self {
            id: "guard".to_string(),
            name: "Guard".to_string(),
            description: "Brace against the next hit.".to_string(),
            cost: 0,
            cooldown: 0,
            tags: vec![SkillTag::Buff],
            effect_key: EffectKey::Guard,
        }
    }
}

/// How a demon picks its next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProfile {
    Aggressive,
    Defensive,
    #[default]
    Tricky,
}

/// Move-set change that kicks in once a demon drops below an HP ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub below_hp_ratio: f64,
    #[serde(default)]
    pub add_moves: Vec<String>,
    #[serde(default)]
    pub remove_moves: Vec<String>,
}

/// Enemy definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemonDef {
    pub id: String,
    pub name: String,
    pub level: u32,
    #[serde(flatten)]
    pub stats: Stats,
    /// Incoming-element multipliers layered over the global matrix.
    #[serde(default)]
    pub affinities: HashMap<Element, f64>,
    #[serde(default)]
    pub ai: AiProfile,
    pub moves: Vec<String>,
    #[serde(default)]
    pub phases: Vec<PhaseTransition>,
    #[serde(default)]
    pub loot_table: Option<String>,
}

impl DemonDef {
    /// Move-set after applying every phase whose threshold `hp_ratio` is under.
    ///
    /// Phases apply in declaration order, so a later phase can remove a move an
    /// earlier one added.
    pub fn moves_at(&self, hp_ratio: f64) -> Vec<String> {
        let mut moves = self.moves.clone();
        for phase in self.phases.iter().filter(|p| hp_ratio < p.below_hp_ratio) {
            moves.retain(|id| !phase.remove_moves.contains(id));
            for id in &phase.add_moves {
                if !moves.contains(id) {
                    moves.push(id.clone());
                }
            }
        }
        moves
    }

    /// Every skill id this demon can ever use, base set first.
    pub fn all_move_ids(&self) -> impl Iterator<Item = &String> {
        self.moves
            .iter()
            .chain(self.phases.iter().flat_map(|p| p.add_moves.iter()))
    }
}

/// One side of the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Demon,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Demon,
            Side::Demon => Side::Player,
        }
    }
}

/// Active damage-over-time effect.
#[derive(Debug, Clone, PartialEq)]
pub struct DotEffect {
    pub target: Side,
    pub damage: u32,
    pub remaining_ticks: u32,
}

/// Engine state for one battle.
///
/// Transition functions consume a state and return the next one; nothing is
/// shared between states.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub seed: u32,
    /// Side that acts first each round.
    pub turn: Side,
    pub round: u32,
    pub player: Stats,
    pub demon: Stats,
    pub player_guard: bool,
    pub demon_guard: bool,
    pub dots: Vec<DotEffect>,
    /// Newest entry first.
    pub log: VecDeque<String>,
    pub fled: bool,
}

impl EngineState {
    pub fn stats(&self, side: Side) -> &Stats {
        match side {
            Side::Player => &self.player,
            Side::Demon => &self.demon,
        }
    }

    pub fn stats_mut(&mut self, side: Side) -> &mut Stats {
        match side {
            Side::Player => &mut self.player,
            Side::Demon => &mut self.demon,
        }
    }

    pub fn guard(&self, side: Side) -> bool {
        match side {
            Side::Player => self.player_guard,
            Side::Demon => self.demon_guard,
        }
    }

    pub fn set_guard(&mut self, side: Side, value: bool) {
        match side {
            Side::Player => self.player_guard = value,
            Side::Demon => self.demon_guard = value,
        }
    }

    pub fn push_log(&mut self, line: String) {
        self.log.push_front(line);
    }

    /// Side that acts second each round.
    pub fn second(&self) -> Side {
        self.turn.opponent()
    }
}

/// Action chosen by the player for their turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlayerAction {
    Attack { skill: Option<String> },
    Guard,
    Flee,
}

impl PlayerAction {
    pub fn basic_attack() -> Self {
        PlayerAction::Attack { skill: None }
    }

    pub fn skill(id: impl Into<String>) -> Self {
        PlayerAction::Attack {
            skill: Some(id.into()),
        }
    }
}

/// Terminal result of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleOutcome {
    Win,
    Lose,
    Flee,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demon_with_phases() -> DemonDef {
        DemonDef {
            id: "late_fee".to_string(),
            name: "Late Fee".to_string(),
            level: 2,
            stats: Stats {
                hp: 40,
                max_hp: 40,
                resolve: 0,
                atk: 8,
                def: 2,
                spd: 5,
                crit_chance: 0.0,
                crit_mult: None,
                element: Element::None,
            },
            affinities: HashMap::new(),
            ai: AiProfile::Aggressive,
            moves: vec!["claw".to_string(), "hiss".to_string()],
            phases: vec![
                PhaseTransition {
                    below_hp_ratio: 0.5,
                    add_moves: vec!["frenzy".to_string()],
                    remove_moves: vec!["hiss".to_string()],
                },
                PhaseTransition {
                    below_hp_ratio: 0.2,
                    add_moves: vec![],
                    remove_moves: vec!["frenzy".to_string()],
                },
            ],
            loot_table: None,
        }
    }

    #[test]
    fn test_take_damage_saturates() {
        let mut demon = demon_with_phases();
        demon.stats.take_damage(100);
        assert_eq!(demon.stats.hp, 0);
        assert!(!demon.stats.is_alive());
    }

    #[test]
    fn test_hp_ratio_handles_zero_max() {
        let mut stats = demon_with_phases().stats;
        assert_eq!(stats.hp_ratio(), 1.0);
        stats.max_hp = 0;
        assert_eq!(stats.hp_ratio(), 0.0);
    }

    #[test]
    fn test_moves_at_applies_phases_in_order() {
        let demon = demon_with_phases();
        assert_eq!(demon.moves_at(1.0), vec!["claw", "hiss"]);
        assert_eq!(demon.moves_at(0.4), vec!["claw", "frenzy"]);
        assert_eq!(demon.moves_at(0.1), vec!["claw"]);
    }

    #[test]
    fn test_all_move_ids_includes_phase_moves() {
        let demon = demon_with_phases();
        let ids: Vec<&String> = demon.all_move_ids().collect();
        assert_eq!(ids, vec!["claw", "hiss", "frenzy"]);
    }

    #[test]
    fn test_unknown_effect_key_deserializes() {
        let skill: SkillDef = serde_json::from_str(
            r#"{"id":"sing","name":"Sing","effect_key":"serenade"}"#,
        )
        .unwrap();
        assert_eq!(skill.effect_key, EffectKey::Unknown);

        let skill: SkillDef = serde_json::from_str(
            r#"{"id":"frost","name":"Frost","effect_key":"element_ice_dot","tags":["dot"]}"#,
        )
        .unwrap();
        assert_eq!(skill.effect_key, EffectKey::ElementIceDot);
        assert!(skill.has_tag(SkillTag::Dot));
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Demon);
        assert_eq!(Side::Demon.opponent(), Side::Player);
    }
}
