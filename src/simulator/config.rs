//! Simulation configuration.

use crate::combat::types::{Element, EngineState, PlayerAction, Stats};
use serde::Serialize;

/// HP ratio under which the cautious policy guards.
const CAUTIOUS_GUARD_HP_RATIO: f64 = 0.3;

/// Scripted player behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimPolicy {
    /// Basic attack every round.
    AttackOnly,
    /// Basic attack, but guard below 30% HP.
    Cautious,
    /// Always use this skill.
    Skill(String),
}

impl SimPolicy {
    /// Pick the player's action for the coming round.
    pub fn choose(&self, state: &EngineState) -> PlayerAction {
        match self {
            SimPolicy::AttackOnly => PlayerAction::basic_attack(),
            SimPolicy::Cautious if state.player.hp_ratio() < CAUTIOUS_GUARD_HP_RATIO => {
                PlayerAction::Guard
            }
            SimPolicy::Cautious => PlayerAction::basic_attack(),
            SimPolicy::Skill(id) => PlayerAction::skill(id.clone()),
        }
    }

    /// Parse a CLI policy name: `attack`, `cautious`, or `skill:<id>`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "attack" => Some(SimPolicy::AttackOnly),
            "cautious" => Some(SimPolicy::Cautious),
            _ => s
                .strip_prefix("skill:")
                .filter(|id| !id.is_empty())
                .map(|id| SimPolicy::Skill(id.to_string())),
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of battles to play
    pub num_runs: u32,

    /// Master seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Demon to fight
    pub demon_id: String,

    /// Player stats at the start of every battle
    pub player: Stats,

    /// Player level (drives rewards)
    pub player_level: u32,

    /// Rounds before a battle counts as timed out
    pub max_rounds: u32,

    /// How the player picks actions
    pub policy: SimPolicy,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            demon_id: "minimum_payment_imp".to_string(),
            player: default_player(),
            player_level: 1,
            max_rounds: 200,
            policy: SimPolicy::AttackOnly,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Default log filter for the verbosity: `-v` adds info, `-v -v` debug.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 | 1 => "warn",
            2 => "info",
            _ => "debug",
        }
    }

    /// Whether to print the banner and configuration block.
    pub fn shows_banner(&self) -> bool {
        self.verbosity > 0
    }

    /// Quick config for checking one demon's balance
    pub fn demon_balance_test(demon_id: &str) -> Self {
        Self {
            num_runs: 100,
            demon_id: demon_id.to_string(),
            ..Default::default()
        }
    }

    /// Geared-up player against the boss
    pub fn boss_test() -> Self {
        Self {
            num_runs: 200,
            demon_id: "mortgage_wyrm".to_string(),
            player: Stats {
                hp: 220,
                max_hp: 220,
                resolve: 20,
                atk: 40,
                def: 16,
                spd: 12,
                crit_chance: 0.2,
                crit_mult: Some(1.75),
                element: Element::Radiant,
            },
            player_level: 10,
            policy: SimPolicy::Cautious,
            ..Default::default()
        }
    }
}

/// Level-1 player used when no stats are given.
pub fn default_player() -> Stats {
    Stats {
        hp: 100,
        max_hp: 100,
        resolve: 10,
        atk: 20,
        def: 8,
        spd: 10,
        crit_chance: 0.1,
        crit_mult: None,
        element: Element::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::logic::init_engine;

    #[test]
    fn test_parse_policy() {
        assert_eq!(SimPolicy::parse("attack"), Some(SimPolicy::AttackOnly));
        assert_eq!(SimPolicy::parse("cautious"), Some(SimPolicy::Cautious));
        assert_eq!(
            SimPolicy::parse("skill:spending_freeze"),
            Some(SimPolicy::Skill("spending_freeze".to_string()))
        );
        assert_eq!(SimPolicy::parse("skill:"), None);
        assert_eq!(SimPolicy::parse("dance"), None);
    }

    #[test]
    fn test_verbosity_levels() {
        let mut config = SimConfig::default();
        assert_eq!(config.log_level(), "warn");
        assert!(config.shows_banner());

        config.verbosity = 2;
        assert_eq!(config.log_level(), "info");
        config.verbosity = 3;
        assert_eq!(config.log_level(), "debug");

        config.verbosity = 0;
        assert_eq!(config.log_level(), "warn");
        assert!(!config.shows_banner());
    }

    #[test]
    fn test_cautious_guards_when_low() {
        let mut state = init_engine(default_player(), default_player(), 1);
        assert_eq!(
            SimPolicy::Cautious.choose(&state),
            PlayerAction::basic_attack()
        );
        state.player.hp = 29;
        assert_eq!(SimPolicy::Cautious.choose(&state), PlayerAction::Guard);
        assert_eq!(
            SimPolicy::AttackOnly.choose(&state),
            PlayerAction::basic_attack()
        );
    }
}
