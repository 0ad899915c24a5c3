//! Battle session orchestration.
//!
//! `BattleSession` owns the one mutable copy of a battle: the engine state,
//! the phase, and the outcome. Everything it calls into is pure.

mod clock;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{BattleEntities, BattleSession, SessionConfig};

use crate::combat::types::BattleOutcome;
use serde::{Deserialize, Serialize};

/// Phases of a battle, in the order a battle moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattlePhase {
    #[default]
    Idle,
    Starting,
    PlayerTurn,
    DemonTurn,
    Resolve,
    CheckEnd,
    OutcomeEmitted,
    Results,
}

impl BattlePhase {
    /// Whether the player may act.
    pub fn accepts_input(self) -> bool {
        self == BattlePhase::PlayerTurn
    }

    /// Phases between start and outcome.
    pub fn in_battle(self) -> bool {
        matches!(
            self,
            BattlePhase::PlayerTurn
                | BattlePhase::DemonTurn
                | BattlePhase::Resolve
                | BattlePhase::CheckEnd
        )
    }
}

/// Screen to show once the player leaves the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Summary,
    Recovery,
    Episodes,
}

impl Route {
    pub fn for_outcome(outcome: BattleOutcome) -> Self {
        match outcome {
            BattleOutcome::Win => Route::Summary,
            BattleOutcome::Lose => Route::Recovery,
            BattleOutcome::Flee => Route::Episodes,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Summary => "/battle/summary",
            Route::Recovery => "/recovery",
            Route::Episodes => "/episodes",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_for_outcomes() {
        assert_eq!(
            Route::for_outcome(BattleOutcome::Win).path(),
            "/battle/summary"
        );
        assert_eq!(Route::for_outcome(BattleOutcome::Lose).path(), "/recovery");
        assert_eq!(Route::for_outcome(BattleOutcome::Flee).path(), "/episodes");
    }

    #[test]
    fn test_only_player_turn_accepts_input() {
        let phases = [
            BattlePhase::Idle,
            BattlePhase::Starting,
            BattlePhase::PlayerTurn,
            BattlePhase::DemonTurn,
            BattlePhase::Resolve,
            BattlePhase::CheckEnd,
            BattlePhase::OutcomeEmitted,
            BattlePhase::Results,
        ];
        let accepting: Vec<BattlePhase> =
            phases.into_iter().filter(|p| p.accepts_input()).collect();
        assert_eq!(accepting, vec![BattlePhase::PlayerTurn]);
    }
}
