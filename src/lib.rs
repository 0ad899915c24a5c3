//! Demon Duel - deterministic turn-based battle engine.
//!
//! Debts are demons; paying them down is a fight. This crate holds the combat
//! rules (damage, elements, guard, damage-over-time, flee), the demon AI, the
//! reward curve, and the session store that walks a battle through its phases
//! and emits its outcome exactly once.
//!
//! Everything below `session` is pure: a battle replays exactly from its seed.

pub mod catalog;
pub mod combat;
pub mod core;
pub mod error;
pub mod rewards;
pub mod session;
pub mod simulator;

pub use catalog::{Catalog, DemonRegistry, SkillRegistry};
pub use combat::types::{
    BattleOutcome, DemonDef, Element, EngineState, PlayerAction, Side, SkillDef, Stats,
};
pub use error::{BattleError, ConfigError};
pub use rewards::{rewards_for_level, Rewards};
pub use session::{BattleEntities, BattlePhase, BattleSession, Route, SessionConfig};
