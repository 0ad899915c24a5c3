use super::clock::Clock;
use super::{BattlePhase, Route};
use crate::catalog::{validate_stats, Catalog};
use crate::combat::logic::{
    apply_demon_action, apply_dot, apply_player_action, check_outcome, init_engine,
};
use crate::combat::types::{BattleOutcome, DemonDef, EngineState, PlayerAction, Side, Stats};
use crate::core::balance::{BASE_SEED, RESULTS_DELAY_MS};
use crate::error::{BattleError, ConfigError};
use crate::rewards::{rewards_for_level, Rewards};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Session tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Pause between OUTCOME_EMITTED and RESULTS.
    pub results_delay_ms: u64,
    /// Seed for battles started without one.
    pub default_seed: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            results_delay_ms: RESULTS_DELAY_MS,
            default_seed: BASE_SEED,
        }
    }
}

impl SessionConfig {
    /// No results delay; the outcome goes straight to RESULTS.
    pub fn headless() -> Self {
        Self {
            results_delay_ms: 0,
            ..Default::default()
        }
    }
}

/// Player side of a new battle.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleEntities {
    pub player: Stats,
    pub player_level: u32,
    /// `None` uses the session's default seed.
    pub seed: Option<u32>,
}

/// One battle at a time, driven by a single caller.
///
/// Outcome emission is idempotent per battle: once an outcome is recorded,
/// later emissions are ignored and rewards are never recomputed.
pub struct BattleSession {
    catalog: Arc<Catalog>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,

    phase: BattlePhase,
    battle_id: Option<Uuid>,
    demon: Option<DemonDef>,
    player_level: u32,
    engine: Option<EngineState>,
    outcome: Option<BattleOutcome>,
    rewards: Option<Rewards>,
    next_route: Option<Route>,
    ui_locked: bool,
    results_due: Option<DateTime<Utc>>,
}

impl BattleSession {
    pub fn new(catalog: Arc<Catalog>, clock: Arc<dyn Clock>, config: SessionConfig) -> Self {
        Self {
            catalog,
            clock,
            config,
            phase: BattlePhase::Idle,
            battle_id: None,
            demon: None,
            player_level: 1,
            engine: None,
            outcome: None,
            rewards: None,
            next_route: None,
            ui_locked: true,
            results_due: None,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn battle_id(&self) -> Option<Uuid> {
        self.battle_id
    }

    pub fn demon(&self) -> Option<&DemonDef> {
        self.demon.as_ref()
    }

    pub fn engine(&self) -> Option<&EngineState> {
        self.engine.as_ref()
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn rewards(&self) -> Option<&Rewards> {
        self.rewards.as_ref()
    }

    pub fn is_input_locked(&self) -> bool {
        self.ui_locked
    }

    /// Whether the UI should accept a player action right now.
    pub fn input_enabled(&self) -> bool {
        !self.ui_locked && self.phase.accepts_input()
    }

    /// Start a new battle against `demon_id`.
    ///
    /// Allowed from IDLE or RESULTS. Clears any previous outcome.
    pub fn start_battle(
        &mut self,
        demon_id: &str,
        entities: BattleEntities,
    ) -> Result<Uuid, BattleError> {
        if !matches!(self.phase, BattlePhase::Idle | BattlePhase::Results) {
            return Err(self.reject("start_battle"));
        }

        let demon = self
            .catalog
            .demons
            .get(demon_id)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownDemon(demon_id.to_string()))?;
        validate_stats("player", &entities.player)?;

        self.clear();
        self.phase = BattlePhase::Starting;

        let seed = entities.seed.unwrap_or(self.config.default_seed);
        let battle_id = Uuid::new_v4();
        self.engine = Some(init_engine(entities.player, demon.stats.clone(), seed));
        self.player_level = entities.player_level.max(1);
        self.battle_id = Some(battle_id);
        info!(%battle_id, demon = %demon.id, seed, "battle started");
        self.demon = Some(demon);

        self.set_phase(BattlePhase::PlayerTurn);
        self.ui_locked = false;
        Ok(battle_id)
    }

    /// Resolve one full round with the player's chosen action.
    ///
    /// Both sides act in the order settled at battle start. A side at 0 HP
    /// does not act, and a successful flee ends the round's actions. DoTs tick
    /// once, then the outcome is checked. Returns the outcome if the battle
    /// ended this round.
    pub fn submit(&mut self, action: PlayerAction) -> Result<Option<BattleOutcome>, BattleError> {
        if self.phase == BattlePhase::Idle {
            return Err(BattleError::NoActiveBattle);
        }
        if !self.phase.accepts_input() {
            return Err(self.reject("submit"));
        }
        if self.ui_locked {
            return Err(BattleError::InputLocked);
        }
        let Some(demon) = self.demon.clone() else {
            return Err(BattleError::NoActiveBattle);
        };
        let Some(mut engine) = self.engine.take() else {
            return Err(BattleError::NoActiveBattle);
        };

        self.ui_locked = true;
        let catalog = Arc::clone(&self.catalog);
        let skills = &catalog.skills;

        for side in [engine.turn, engine.second()] {
            if engine.fled || !engine.player.is_alive() || !engine.demon.is_alive() {
                break;
            }
            match side {
                Side::Player => {
                    self.set_phase(BattlePhase::PlayerTurn);
                    engine = apply_player_action(engine, &action, skills, &demon);
                }
                Side::Demon => {
                    self.set_phase(BattlePhase::DemonTurn);
                    engine = apply_demon_action(engine, skills, &demon);
                }
            }
        }

        self.set_phase(BattlePhase::Resolve);
        engine = apply_dot(engine);

        self.set_phase(BattlePhase::CheckEnd);
        let outcome = check_outcome(&engine);
        if outcome.is_none() {
            engine.round += 1;
        }
        self.engine = Some(engine);

        match outcome {
            Some(outcome) => {
                let rewards = match outcome {
                    BattleOutcome::Win => rewards_for_level(self.player_level),
                    BattleOutcome::Lose | BattleOutcome::Flee => Rewards::none(),
                };
                self.emit_outcome(outcome, Some(rewards))?;
            }
            None => {
                self.set_phase(BattlePhase::PlayerTurn);
                self.ui_locked = false;
            }
        }
        Ok(outcome)
    }

    /// Record the battle's outcome. Only the first call per battle counts.
    ///
    /// Missing rewards fall back to the level-1 payout. The results screen
    /// follows after the configured delay; see `poll`.
    pub fn emit_outcome(
        &mut self,
        outcome: BattleOutcome,
        rewards: Option<Rewards>,
    ) -> Result<(), BattleError> {
        if let Some(existing) = self.outcome {
            warn!(
                battle_id = ?self.battle_id,
                ?existing,
                ignored = ?outcome,
                "outcome already emitted"
            );
            return Ok(());
        }
        if !self.phase.in_battle() {
            return Err(self.reject("emit_outcome"));
        }

        let results_due = self.results_deadline();
        if results_due.is_none() {
            warn!(
                delay_ms = self.config.results_delay_ms,
                "results delay out of range, waiting for reset"
            );
        }

        self.ui_locked = true;
        let rewards = rewards.unwrap_or_else(|| rewards_for_level(1));
        let route = Route::for_outcome(outcome);
        info!(
            battle_id = ?self.battle_id,
            ?outcome,
            xp = rewards.xp,
            gold = rewards.gold,
            route = route.path(),
            "outcome emitted"
        );
        self.outcome = Some(outcome);
        self.rewards = Some(rewards);
        self.next_route = Some(route);
        self.set_phase(BattlePhase::OutcomeEmitted);

        self.results_due = results_due;
        self.poll();
        Ok(())
    }

    /// Advance OUTCOME_EMITTED to RESULTS once the delay has passed.
    pub fn poll(&mut self) -> BattlePhase {
        if self.phase == BattlePhase::OutcomeEmitted
            && self.results_due.is_some_and(|due| self.clock.now() >= due)
        {
            self.results_due = None;
            self.set_phase(BattlePhase::Results);
        }
        self.phase
    }

    /// Where to navigate after the results screen.
    ///
    /// Safe to call repeatedly; it never touches rewards.
    pub fn continue_route(&self) -> Route {
        self.next_route.unwrap_or(Route::Episodes)
    }

    /// Drop everything and return to IDLE. Abandoning a battle grants nothing.
    pub fn reset_battle(&mut self) {
        if self.phase.in_battle() {
            info!(battle_id = ?self.battle_id, "battle abandoned");
        }
        self.clear();
    }

    fn clear(&mut self) {
        self.phase = BattlePhase::Idle;
        self.battle_id = None;
        self.demon = None;
        self.player_level = 1;
        self.engine = None;
        self.outcome = None;
        self.rewards = None;
        self.next_route = None;
        self.ui_locked = true;
        self.results_due = None;
    }

    /// When RESULTS becomes due. `None` if the delay cannot be represented.
    fn results_deadline(&self) -> Option<DateTime<Utc>> {
        let delay = i64::try_from(self.config.results_delay_ms)
            .ok()
            .and_then(Duration::try_milliseconds)?;
        self.clock.now().checked_add_signed(delay)
    }

    fn set_phase(&mut self, phase: BattlePhase) {
        debug!(from = ?self.phase, to = ?phase, "phase change");
        self.phase = phase;
    }

    fn reject(&self, operation: &'static str) -> BattleError {
        warn!(operation, phase = ?self.phase, "rejected phase transition");
        BattleError::invalid_phase(operation, self.phase)
    }
}
